//! Preset files: which layout to print and which feeds to overlay.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calprint_core::ImporterConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::layout::Mode;

static DEFAULT_OUTPUT: &str = "calendar.txt";

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

/// A preset, e.g. `weekly.toml`:
///
/// ```toml
/// mode = "weekly"
/// output = "calendar.txt"
///
/// [[importers]]
/// importer_type = "ics"
/// path = "https://example.com/team.ics"
/// ```
///
/// YAML presets are read the same way, by file extension.
#[derive(Debug, Deserialize)]
pub struct Preset {
    pub mode: Mode,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub importers: Vec<ImporterConfig>,
}

impl Preset {
    /// Load a preset file. `CALPRINT_MODE` / `CALPRINT_OUTPUT` override the file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Preset file not found at {}", path.display());
        }

        let preset: Preset = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("CALPRINT"))
            .build()
            .with_context(|| format!("Failed to read preset at {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse preset at {}", path.display()))?;

        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn preset_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_toml_preset_with_importers() {
        let file = preset_file(
            ".toml",
            r#"
mode = "monthly"
output = "out/march.txt"

[[importers]]
importer_type = "ics"
path = "https://example.com/team.ics"
"#,
        );

        let preset = Preset::load(file.path()).unwrap();

        assert_eq!(preset.mode, Mode::Monthly);
        assert_eq!(preset.output, PathBuf::from("out/march.txt"));
        assert_eq!(preset.importers.len(), 1);
        assert_eq!(preset.importers[0].importer_type, "ics");
    }

    #[test]
    fn loads_yaml_preset_with_defaults() {
        let file = preset_file(".yaml", "mode: weekly\n");

        let preset = Preset::load(file.path()).unwrap();

        assert_eq!(preset.mode, Mode::Weekly);
        assert_eq!(preset.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(preset.importers.is_empty());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let file = preset_file(".toml", "mode = \"daily\"\n");

        let err = Preset::load(file.path()).unwrap_err();

        assert!(format!("{:#}", err).contains("daily"));
    }

    #[test]
    fn missing_preset_is_reported() {
        let err = Preset::load(Path::new("/nonexistent/preset.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
