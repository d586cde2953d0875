//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod catalog_service;
pub mod circulation_service;
pub mod fee_calculator;
pub mod payment_service;
pub mod policy;

pub use catalog_service::CatalogService;
pub use circulation_service::{CirculationService, PatronStatus};
pub use payment_service::{PaymentReceipt, PaymentService, RefundReceipt};
