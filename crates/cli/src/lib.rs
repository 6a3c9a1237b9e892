// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Command implementations behind the `poe` binary. Each takes the chain
//! client it talks to, so tests run them against an in-process chain.

pub mod commands;
