//! Core types shared across kdev crates
//!
//! - **Correlation**: `RequestId` attached to every CLI or menu invocation
//! - **Sensitive data**: `Sensitive<T>` wrapper for credential defaults
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
