// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod api;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod orchestrator;
pub mod registry;
pub mod server;
pub mod sync_guard;
pub mod telemetry;
