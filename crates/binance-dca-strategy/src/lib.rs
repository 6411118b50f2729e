/*
[INPUT]:  Public API exports for binance-dca-strategy crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod executor;
pub mod normalize;
pub mod scheduler;
pub mod state;
pub mod validate;

// Re-export main types for convenience
pub use config::{Amount, PurchaseRule, RuleBook};
pub use executor::OrderExecutor;
pub use normalize::QuantityNormalizer;
pub use scheduler::SchedulerLoop;
pub use state::StateStore;
pub use validate::{ValidationReport, validate_document};
