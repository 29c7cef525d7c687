// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod build;
pub mod check;
pub mod inspect;
pub mod proof;
