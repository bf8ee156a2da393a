// Domain-specific error types
pub mod errors;

// Feature schema, classifier port and prediction types
pub mod ml;
