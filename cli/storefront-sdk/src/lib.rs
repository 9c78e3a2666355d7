//! Session state for browsing and managing the storefront catalog.
//!
//! The sessions in this crate hold what a catalog view shows and translate
//! user intents into catalog requests. They are independent of any UI:
//! a presentation layer renders their state and forwards intents.

pub mod categories;
pub mod controller;
pub mod deferred;
pub mod entity;
pub mod form;
pub mod listing;
pub mod status;

pub use categories::{ALL_CATEGORIES_LABEL, CategoryDirectory, CategoryOption};
pub use controller::{CatalogController, ControllerOptions};
pub use deferred::DeferredAction;
pub use entity::{EntityError, EntityMode, EntitySession, NAVIGATE_AWAY_DELAY};
pub use form::{ProductForm, ValidationError, parse_images};
pub use listing::{FetchOutcome, FetchTicket, ListingSession};
pub use status::{Notice, SessionStatus, StatusNotifier};
