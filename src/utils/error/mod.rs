//! Error handling utilities
//!
//! This module provides the gateway error taxonomy and its HTTP mapping.

pub mod error;

pub use error::{GatewayError, Result};
