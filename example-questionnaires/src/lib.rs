pub mod supplier_selection;

// Re-export supplier_selection constructors
pub use supplier_selection::{full, pilot, validate_email};
