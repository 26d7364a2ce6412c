//! # dedupestore
//!
//! Helpers shared by the dedupestore backup commands.
//!
//! ## Contents
//!
//! - **Locations**: parse and validate `[user@]host:path[::archive]` strings
//! - **Identities**: cached user/group name <-> id lookups
//! - **Diagnostics**: a `tracing` layer counting records per level
//! - **Sizes**: human readable byte counts
//!
//! ## Quick Start
//!
//! ```
//! use dedupestore::helpers::location::{validate, ArchiveRequirement, Location};
//! use dedupestore::helpers::size::human_readable_size;
//!
//! let location = Location::parse("backup@nas:/srv/repo::monday")?;
//! assert_eq!(location.host(), Some("nas"));
//! assert_eq!(location.archive(), Some("monday"));
//!
//! let location = validate(location, ArchiveRequirement::Required)?;
//! assert_eq!(location.to_string(), "backup@nas:/srv/repo::monday");
//!
//! assert_eq!(human_readable_size(2147483648), "2.00 GB");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod helpers;
