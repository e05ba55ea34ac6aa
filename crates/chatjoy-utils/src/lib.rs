//! Shared utilities for chatjoy
//!
//! This crate provides common functionality used across the chatjoy workspace:
//! tracing setup and small helpers for reading configuration from the
//! environment (including an optional `.env` file).

pub mod env;
pub mod logging;

pub use env::{load_dotenv, var_opt, var_parse};
pub use logging::{DEFAULT_FILTER, init_tracing};
