//! Application layer - Generic services that use ports.

// Uploads and directory listings
pub mod library;

// Trim and concat orchestration
pub mod transform;
