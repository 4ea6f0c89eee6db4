//! Where to look for drives and where extracted files go.
//!
//! ```toml
//! hard_drive_paths = ["/dev/sd?", "~/images/xbox-hdd.bin"]
//! removable_paths = ["/media/*/*/Xbox360"]
//! export_dir = "~/Desktop"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref DEFAULT_HARD_DRIVE_PATHS: Vec<String> = default_hard_drive_paths();
    static ref DEFAULT_REMOVABLE_PATHS: Vec<String> = default_removable_paths();
}

const DEFAULT_LOCATIONS: &[&str] = &["./xcontent.toml", "~/.config/xcontent/config.toml"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldnt read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldnt parse config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("couldnt expand {input:?}: {reason}")]
    Expand { input: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns of raw devices or disk images that may hold a FATX hard drive.
    pub hard_drive_paths: Vec<String>,

    /// Glob patterns of `Xbox360` folders on mounted removable drives.
    pub removable_paths: Vec<String>,

    /// Directory extracted packages are suggested to go into.
    pub export_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hard_drive_paths: DEFAULT_HARD_DRIVE_PATHS.clone(),
            removable_paths: DEFAULT_REMOVABLE_PATHS.clone(),
            export_dir: "~/Desktop".into(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;

        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.into(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Loads the first config found in the default locations, or the platform
    /// defaults if there is none. A config that exists but is broken is an error.
    pub fn load_from_default_locations() -> Result<Self, ConfigError> {
        for location in DEFAULT_LOCATIONS {
            let path = PathBuf::from(expand(location)?);
            if path.is_file() {
                log::debug!("loading config from {path:?}");
                return Self::load(path);
            }
        }

        log::debug!("no config found, using defaults");
        Ok(Self::default())
    }

    pub fn export_dir(&self) -> Result<PathBuf, ConfigError> {
        expand(&self.export_dir).map(PathBuf::from)
    }
}

/// Expands `~` and environment variables in a path or pattern.
pub fn expand(input: &str) -> Result<String, ConfigError> {
    shellexpand::full(input)
        .map(|s| s.into_owned())
        .map_err(|e| ConfigError::Expand {
            input: input.into(),
            reason: e.to_string(),
        })
}

fn default_hard_drive_paths() -> Vec<String> {
    if cfg!(windows) {
        (0..16).map(|i| format!(r"\\.\PhysicalDrive{i}")).collect()
    } else if cfg!(target_os = "macos") {
        vec!["/dev/disk?".into(), "/dev/disk??".into()]
    } else {
        vec!["/dev/sd?".into(), "/dev/mmcblk?".into()]
    }
}

fn default_removable_paths() -> Vec<String> {
    if cfg!(windows) {
        vec!["[A-Z]:/Xbox360".into()]
    } else if cfg!(target_os = "macos") {
        vec!["/Volumes/*/Xbox360".into()]
    } else {
        vec![
            "/media/*/*/Xbox360".into(),
            "/run/media/*/*/Xbox360".into(),
            "/mnt/*/Xbox360".into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() -> Result<(), toml::de::Error> {
        let cfg = Config::parse(r#"hard_drive_paths = ["/tmp/hdd.img"]"#)?;

        assert_eq!(cfg.hard_drive_paths, ["/tmp/hdd.img"]);
        assert_eq!(cfg.removable_paths, Config::default().removable_paths);
        assert_eq!(cfg.export_dir, "~/Desktop");

        Ok(())
    }

    #[test]
    fn load_reports_broken_files() -> io::Result<()> {
        let mut fp = tempfile::NamedTempFile::new()?;
        writeln!(fp, "export_dir = [")?;

        assert!(matches!(
            Config::load(fp.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Config::load(fp.path().with_extension("missing")),
            Err(ConfigError::Io { .. })
        ));

        Ok(())
    }

    #[test]
    fn round_trips_through_toml() -> Result<(), Box<dyn std::error::Error>> {
        let cfg = Config {
            hard_drive_paths: vec!["/dev/sdb".into()],
            removable_paths: vec![],
            export_dir: "/srv/dumps".into(),
        };

        let raw = toml::to_string(&cfg)?;
        assert_eq!(Config::parse(&raw)?, cfg);
        assert_eq!(cfg.export_dir()?, PathBuf::from("/srv/dumps"));

        Ok(())
    }
}
