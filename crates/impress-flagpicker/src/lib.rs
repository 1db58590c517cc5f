//! impress-flagpicker: flag-selection widget model.
//!
//! Lets a user pick zero or more members of a bitmask enumeration through a
//! set of toggles, keeping the toggles and the single composite value in sync
//! in both directions.
//!
//! # Pieces
//!
//! - [`FlagType`] / [`FlagValue`]: runtime-described bitmask types and their
//!   composite values (or any `bitflags` type via [`FlagType::of`])
//! - [`FlagSetModel`]: type validation and the toggle transition rules,
//!   including the zero-member ("no selection") policy
//! - [`ToggleCollection`]: one toggle per non-zero member, with feedback
//!   suppression while the value is projected onto the toggles
//! - [`DisplayNameCache`] / [`NameResolver`]: memoized, pluggable labels
//! - [`FlagSelector`]: the control itself, as a check list or a radio group
//!
//! # Example
//!
//! ```
//! use impress_flagpicker::{FlagSelector, FlagType};
//!
//! let ty = FlagType::new("Permissions", [("None", 0), ("Read", 1), ("Write", 2)]).unwrap();
//! let mut selector = FlagSelector::check_list();
//! selector.set_flag_type(Some(ty)).unwrap();
//!
//! selector.toggle_by_name("Read", true).unwrap();
//! selector.toggle_by_name("Write", true).unwrap();
//! assert_eq!(selector.value().unwrap().to_string(), "Read, Write");
//! ```

#[cfg(feature = "native")]
uniffi::setup_scaffolding!();

mod bitflags_support;
pub mod config;
pub mod error;
pub mod flag;
pub mod model;
pub mod names;
mod parse;
pub mod selector;
pub mod toggles;

pub use config::*;
pub use error::{FlagError, Result};
pub use flag::*;
pub use model::*;
pub use names::*;
pub use selector::*;
pub use toggles::*;
