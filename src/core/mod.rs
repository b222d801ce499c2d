//! Core business logic abstractions

pub mod aggregate;
pub mod log;
pub mod quote;
pub mod ranking;
pub mod spike;

// Re-export main types for cleaner imports
pub use aggregate::Aggregator;
pub use quote::{Quote, QuoteProvider};
pub use spike::{Direction, SpikeCheck, SpikeDetector, SpikeEvent};
