//! Utility functions shared across layers.
//!
//! - [`template`] - `{*}` placeholder substitution and path segment splitting
//! - [`validation`] - Keyword and destination syntax rules for link input

pub mod template;
pub mod validation;
