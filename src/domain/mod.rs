//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`view_event`] - View tracking event model and its queue
//! - [`view_worker`] - Asynchronous view counter worker
//!
//! # View Processing Flow
//!
//! 1. The keyword resolver confirms a match
//! 2. A [`view_event::ViewEvent`] is pushed onto the bounded queue (never awaited)
//! 3. [`view_worker::run_view_worker`] applies the increment with retry logic
//! 4. The counter is bumped via [`repositories::LinkRepository::increment_views`]

pub mod entities;
pub mod repositories;
pub mod view_event;
pub mod view_worker;
