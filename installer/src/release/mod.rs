//! Release table configuration.
//!
//! - [`table`] - Parsing, validation, and target resolution
//! - [`source`] - Choosing which table to load
//! - [`checksums`] - Pinning a table from a published checksums file
//! - [`target`] - The resolved download for one platform
//! - [`version`] - Release version newtype
//! - [`error`] - Release configuration errors

pub mod checksums;
pub mod error;
pub mod source;
pub mod table;
pub mod target;
pub mod version;
