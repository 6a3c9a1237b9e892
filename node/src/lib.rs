// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod api;
pub mod chain;
pub mod devchain;
pub mod network;
pub mod gateway;
pub mod viewer;
pub mod form;
pub mod server;
pub mod telemetry;
