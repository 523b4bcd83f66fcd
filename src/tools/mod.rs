//! Tools module - tool registry and executors
//!
//! Contains the registry the loop dispatches through plus the weather and
//! email executors and their schema contracts.

pub mod email;
pub mod registry;
pub mod schema;
pub mod weather;

pub use registry::ToolRegistry;
