//! Test utilities for use case and HTTP tests.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - A builder for constructing `AppState` with test dependencies

mod api_key_mocks;

pub use api_key_mocks::*;
pub use app_state_builder::*;
pub use factories::*;
