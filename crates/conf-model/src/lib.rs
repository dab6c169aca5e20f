//! Data model for the configuration reconciler
//!
//! This crate defines everything the reconciliation engine diffs and
//! iterates over, with no knowledge of any storage backend:
//!
//! - [`AttrValue`]: the tagged attribute value (scalar, list, nested map)
//! - [`weak_eq`]: the documented loose-equality comparison used for diffing
//! - [`DesiredStateDocument`] / [`EntitySpec`]: parsed desired state with
//!   reserved keys (`version`, `stores`/`scopes`, `source`) extracted
//!
//! The engine itself lives in `conf-core`.

pub mod document;
pub mod error;
pub mod value;

pub use document::{DesiredStateDocument, DocumentEntry, EntitySpec, is_reserved_key};
pub use error::{Error, Result};
pub use value::{AttrValue, weak_eq};
