//! Navigation index.
//!
//! A directory of every category in the data, grouped and alphabetized, with
//! availability derived from the current visible set.

mod config;
mod index;
mod state;

pub use config::{GroupRule, Matcher, NavConfig};
pub use index::{NavEntry, NavGroup, NavLink, NavTree, build_index};
pub use state::NavigationState;
