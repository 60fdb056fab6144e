//! Unit tests for configuration loading and validation.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `token`: Token resolution tests
//! - `validation`: Validation into typed settings

mod helpers;
mod validation;
