//! Command handlers for the IntelliRAG CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod cite;
pub mod upload;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use cite::CiteCommand;
pub use upload::UploadCommand;
