//! Core types for Wildberry.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod password;
pub mod version;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
pub use password::{Password, PasswordError};
pub use version::Version;
