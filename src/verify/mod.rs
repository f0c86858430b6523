//! Validation and verification before toggling or running the pipeline.

pub mod preflight;
pub mod rules;

pub use preflight::preflight_checks;
pub use rules::validate_dependency_name;
