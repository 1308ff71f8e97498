//! Wildberry Storefront core library.
//!
//! This crate provides the non-visual core of the storefront as a
//! library: the commerce API client, the observable catalog and session
//! stores, and the sign-up form validation. A presentation layer renders
//! store state and dispatches user intents; it is not part of this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commercetools;
pub mod config;
pub mod storage;
pub mod stores;
pub mod validation;
