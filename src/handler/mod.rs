//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing.
//! Dispatches between the exam API endpoint and static file serving.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
