//! Backup location strings of the form `[user@]host:path[::archive]`.
//!
//! A location names an optional remote user and host, a path (local, or on
//! that host) and optionally one archive inside the repository at that path.
//!
//! Parsing is done by hand rather than with a pattern so the precedence
//! between `@`, `:` and `::` stays visible:
//!
//! 1. The host segment is everything before the first `:`. It must be
//!    non-empty and the rest of the text must itself be a valid
//!    `path[::archive]`, otherwise the text is read as having no host.
//! 2. Inside the host segment, `user@` binds up to the first `@` when both
//!    sides of it are non-empty.
//! 3. The path runs up to the next `:`, which must open a `::` followed by a
//!    colon-free, non-empty archive name.
//! 4. A location without a host needs a non-empty path.

use clap::ValueEnum;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt::{Formatter, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning text into a [`Location`].
///
/// Every variant carries the offending input verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Invalid location format: {0:?}")]
    InvalidLocationFormat(String),
    #[error("{0:?}: No archive specified")]
    MissingArchive(String),
    #[error("{0:?}: No archive can be specified")]
    UnexpectedArchive(String),
}

/// A parsed location. Only obtainable through parsing, so it always has a
/// host or a non-empty path.
///
/// `Display` is the round-trip serializer: `parse(location.to_string())` yields a
/// location equal to `location`. Equality ignores the original text. See
/// [`Location::canonical`] for the `host::path:archive` form.
#[derive(Clone, Debug, SerializeDisplay, DeserializeFromStr)]
pub struct Location {
    user: Option<String>,
    host: Option<String>,
    path: String,
    archive: Option<String>,
    text: String,
}

impl Location {
    pub fn parse<S: AsRef<str>>(text: S) -> Result<Self, LocationError> {
        let text = text.as_ref();
        let invalid = || LocationError::InvalidLocationFormat(text.to_owned());

        let (host_segment, path, archive) = split_location(text).ok_or_else(invalid)?;
        let (user, host) = match host_segment {
            Some(segment) => {
                let (user, host) = split_user(segment);
                (user, Some(host))
            }
            None => (None, None),
        };

        if host.is_none() && path.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            user: user.map(str::to_owned),
            host: host.map(str::to_owned),
            path: path.to_owned(),
            archive: archive.map(str::to_owned),
            text: text.to_owned(),
        })
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn archive(&self) -> Option<&str> {
        self.archive.as_deref()
    }

    /// The text this location was parsed from.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_remote(&self) -> bool {
        self.host.is_some()
    }

    /// The canonical form `user@host::path:archive`, with absent parts
    /// left out. It does not parse back to the same location; use `Display`
    /// for text that has to round-trip.
    pub fn canonical(&self) -> String {
        let mut text = String::new();
        if let Some(user) = &self.user {
            text.push_str(user);
            text.push('@');
        }
        if let Some(host) = &self.host {
            text.push_str(host);
            text.push_str("::");
        }
        text.push_str(&self.path);
        if let Some(archive) = &self.archive {
            text.push(':');
            text.push_str(archive);
        }
        text
    }

    fn parts(&self) -> (Option<&str>, Option<&str>, &str, Option<&str>) {
        (self.user(), self.host(), self.path(), self.archive())
    }
}

/// `(host segment, path, archive)`, or `None` when the text matches no
/// reading of the grammar.
fn split_location(text: &str) -> Option<(Option<&str>, &str, Option<&str>)> {
    if let Some((host, rest)) = text.split_once(':') {
        if !host.is_empty() {
            if let Some((path, archive)) = split_archive(rest) {
                return Some((Some(host), path, archive));
            }
        }
    }
    split_archive(text).map(|(path, archive)| (None, path, archive))
}

fn split_archive(text: &str) -> Option<(&str, Option<&str>)> {
    match text.split_once(':') {
        None => Some((text, None)),
        Some((path, rest)) => rest
            .strip_prefix(':')
            .filter(|archive| !archive.is_empty() && !archive.contains(':'))
            .map(|archive| (path, Some(archive))),
    }
}

fn split_user(host_segment: &str) -> (Option<&str>, &str) {
    match host_segment.split_once('@') {
        Some((user, host)) if !user.is_empty() && !host.is_empty() => (Some(user), host),
        _ => (None, host_segment),
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(user) = &self.user {
            f.write_str(user)?;
            f.write_char('@')?;
        }
        if let Some(host) = &self.host {
            f.write_str(host)?;
            f.write_char(':')?;
        }
        f.write_str(&self.path)?;
        if let Some(archive) = &self.archive {
            f.write_str("::")?;
            f.write_str(archive)?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Location {
    type Error = LocationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts().hash(state)
    }
}

/// Whether a location handed to a command may, must, or must not name an
/// archive.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveRequirement {
    #[default]
    #[display("any")]
    Any,
    #[display("required")]
    Required,
    #[display("forbidden")]
    Forbidden,
}

impl ArchiveRequirement {
    pub fn check(&self, location: &Location) -> Result<(), LocationError> {
        match (self, location.archive()) {
            (ArchiveRequirement::Required, None) => {
                Err(LocationError::MissingArchive(location.as_str().to_owned()))
            }
            (ArchiveRequirement::Forbidden, Some(_)) => {
                Err(LocationError::UnexpectedArchive(location.as_str().to_owned()))
            }
            _ => Ok(()),
        }
    }
}

pub fn validate(
    location: Location,
    requirement: ArchiveRequirement,
) -> Result<Location, LocationError> {
    requirement.check(&location).map(|_| location)
}

/// Value parser for `clap` arguments holding a location.
///
/// ```
/// use clap::Parser;
/// use dedupestore::helpers::location::{location_validator, ArchiveRequirement, Location};
///
/// #[derive(Parser)]
/// struct Args {
///     #[arg(value_parser = location_validator(ArchiveRequirement::Required))]
///     archive: Location,
/// }
///
/// let args = Args::try_parse_from(["prog", "nas:/srv/repo::monday"]).unwrap();
/// assert_eq!(args.archive.archive(), Some("monday"));
/// assert!(Args::try_parse_from(["prog", "nas:/srv/repo"]).is_err());
/// ```
pub fn location_validator(
    requirement: ArchiveRequirement,
) -> impl Fn(&str) -> Result<Location, LocationError> + Clone + Send + Sync + 'static {
    move |text: &str| {
        let location = Location::parse(text).and_then(|l| validate(l, requirement))?;
        debug!("Accepted location {location} ({requirement} archive)");
        Ok(location)
    }
}
