// Model loading and inference
pub mod ml;

// Request validation and response shaping
pub mod scoring;
