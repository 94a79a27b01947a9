//! Core domain entities.
//!
//! Entities are plain data structures without business logic. Creation and
//! partial-update inputs live next to the entity they produce:
//!
//! - [`Link`] - A stored keyword → destination mapping
//! - [`NewLink`] - Input for creating a link
//! - [`LinkPatch`] - Partial update of an existing link
//! - [`LinkQuery`] - Listing filter and ordering

pub mod link;

pub use link::{
    Link, LinkPatch, LinkQuery, NewLink, PLACEHOLDER, SortField, SortOrder, normalize_tags,
};
