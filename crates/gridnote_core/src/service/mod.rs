//! Use-case services over the parser, validator and store.
//!
//! # Responsibility
//! - Orchestrate board configuration, layout validation and section lookup
//!   into host-facing resolution APIs.
//! - Keep host/UI layers decoupled from parsing and grid details.

pub mod board_service;
