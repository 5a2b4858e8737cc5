//! Data model types

mod description;
mod record;

pub use description::*;
pub use record::*;
