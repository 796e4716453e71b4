//! # studyhub-core
//!
//! Core crate for StudyHub. Contains configuration schemas, typed
//! identifiers, the session context, and the unified error system.
//!
//! This crate has **no** internal dependencies on other StudyHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod session;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
