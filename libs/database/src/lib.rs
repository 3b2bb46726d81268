//! Document-store access layer for the catalog services.
//!
//! The managed key-value/document store is abstracted behind the
//! [`DocumentStore`] trait so domain query layers stay independent of the
//! concrete binding. [`InMemoryStore`] backs local development and tests;
//! [`RetryingStore`] wraps any store with the transient-error retry policy.

pub mod error;
pub mod memory;
pub mod retry;
pub mod retrying;
pub mod store;

pub use error::{StoreError, StoreErrorKind};
pub use memory::InMemoryStore;
pub use retry::{retry_with_backoff, RetryConfig};
pub use retrying::RetryingStore;
pub use store::{
    Comparand, CompareOp, Condition, Document, DocumentStore, QueryOutput, ReadParams,
};
