//! Core module - shared infrastructure for Skybrief
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, MailConfig, MailSettings};
pub use error::{Result, SkybriefError};
pub use types::*;
