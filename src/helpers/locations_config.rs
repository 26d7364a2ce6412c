//! YAML description of locations to check in one go.
//!
//! ```yaml
//! locations:
//!   - location: "backup@nas:/srv/repo::monday"
//!     archive: required
//!   - location: /srv/repo
//!     archive: forbidden
//!   - location: /mnt/usb/repo   # archive defaults to `any`
//! ```

use crate::helpers::function_path;
use crate::helpers::location::{ArchiveRequirement, Location, LocationError};
use crate::helpers::result_error::error::Error;
use crate::helpers::result_error::result::{collect_all, Result};
use crate::helpers::result_error::{WithDebugObjectAndFnName, WithMsg};
use bon::Builder;
use function_name::named;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize, Builder, Getters)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct LocationEntry {
    location: Location,
    #[serde(default)]
    #[builder(default)]
    archive: ArchiveRequirement,
}

impl LocationEntry {
    pub fn check(&self) -> std::result::Result<&Location, LocationError> {
        self.archive.check(&self.location).map(|_| &self.location)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, Getters)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct LocationsConfig {
    #[validate(length(min = 1))]
    #[builder(into)]
    locations: Vec<LocationEntry>,
}

impl LocationsConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        File::open(path)
            .map_err(Error::from)
            .and_then(|f| {
                serde_yml::from_reader::<_, LocationsConfig>(f)
                    .map_err(Error::from)
                    .with_msg(format!("Parse YAML config failed: {:?}", path))
            })
            .and_then(|config| {
                config
                    .validate()
                    .map_err(Error::from)
                    .map(|_| config)
                    .with_msg(format!("Config validation failed: {:?}", path))
            })
    }

    /// Checks every entry against its archive requirement, reporting all
    /// failing entries together.
    #[named]
    pub fn check(&self) -> Result<Vec<&Location>> {
        collect_all(self.locations.iter().enumerate().map(|(idx, entry)| -> Result<&Location> {
            let location = entry
                .check()
                .map_err(Error::from)
                .with_debug_object_and_fn_name(entry.clone(), function_path!())
                .with_msg(format!("locations[{idx}] rejected"))?;
            info!("locations[{idx}] {location} ok");
            Ok(location)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = write_config(
            r#"
locations:
  - location: "backup@nas:/srv/repo::monday"
    archive: required
  - location: /srv/repo
    archive: forbidden
  - location: /mnt/usb/repo
"#,
        );
        let config = LocationsConfig::load(file.path()).unwrap();
        assert_eq!(config.locations().len(), 3);
        assert_eq!(config.locations()[0].location().user(), Some("backup"));
        assert_eq!(*config.locations()[1].archive(), ArchiveRequirement::Forbidden);
        assert_eq!(*config.locations()[2].archive(), ArchiveRequirement::Any);
        assert_eq!(config.check().unwrap().len(), 3);
    }

    #[test]
    fn test_load_rejects_bad_location_string() {
        let file = write_config("locations:\n  - location: \"a:b:c\"\n");
        let err = LocationsConfig::load(file.path()).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Parse YAML config failed"));
        assert!(text.contains(r#"Invalid location format: "a:b:c""#));
    }

    #[test]
    fn test_load_rejects_empty_list() {
        let file = write_config("locations: []\n");
        let err = LocationsConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Config validation failed"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocationsConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_check_reports_every_failure() {
        let config = LocationsConfig::builder()
            .locations(vec![
                LocationEntry::builder()
                    .location(Location::parse("host:/data").unwrap())
                    .archive(ArchiveRequirement::Required)
                    .build(),
                LocationEntry::builder()
                    .location(Location::parse("/ok").unwrap())
                    .build(),
                LocationEntry::builder()
                    .location(Location::parse("/repo::mon").unwrap())
                    .archive(ArchiveRequirement::Forbidden)
                    .build(),
            ])
            .build();

        let err = config.check().unwrap_err();
        assert!(err.is_location_error());
        let text = err.to_string();
        assert!(text.contains("locations[0] rejected"));
        assert!(text.contains(r#""host:/data": No archive specified"#));
        assert!(text.contains("locations[2] rejected"));
        assert!(text.contains(r#""/repo::mon": No archive can be specified"#));
        match err {
            Error::LotsOfError(errors) => assert_eq!(errors.len(), 2),
            _ => panic!("Expected LotsOfError"),
        }
    }

    #[test]
    fn test_serializes_back_to_yaml() {
        let config = LocationsConfig::builder()
            .locations(vec![LocationEntry::builder()
                .location(Location::parse("u@h:/p::a").unwrap())
                .build()])
            .build();
        let yaml = serde_yml::to_string(&config).unwrap();
        let back: LocationsConfig = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back.locations()[0].location(), config.locations()[0].location());
    }
}
