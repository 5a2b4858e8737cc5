//! Status effect table view engine
//!
//! Owns an in-memory list of status effect records and derives, on every
//! mutation, the visible subset, the current page, the category navigation
//! index and a render plan for the host to draw.

pub mod error;
pub mod export;
pub mod model;
pub mod nav;
pub mod query;
pub mod settings;
pub mod source;
pub mod store;
pub mod theme;
pub mod view;

mod session;

pub use error::Error;
pub use session::Session;
