//! Domain layer - Pure business logic.

// Job definitions and the transformation state machine
pub mod jobs;

// Stored video records and naming rules
pub mod video;
