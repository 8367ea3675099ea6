//! Ports - Trait definitions the application layer depends on.

pub mod executor;
pub mod storage;
