//! gymtrack-core - Core library for gymtrack
//!
//! This crate provides the workout tracking logic: the session model, the
//! exercise catalog, identifier assignment, legacy import and the persisted
//! session store.

pub mod error;
pub mod types;
pub mod config;
pub mod catalog;
pub mod identity;
pub mod session;

pub use error::{GymError, Result};
pub use types::*;
