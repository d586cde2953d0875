//! Test utilities
//!
//! Manual in-memory port implementations and test fixtures for unit testing.
//! The payment gateway is mocked with mockall instead (see
//! `domain::ports::payments::MockPaymentGateway`): its expectations check
//! exactly what is sent to the provider.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
