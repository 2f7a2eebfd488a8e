//! Building importers from preset entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CalPrintError, CalPrintResult};
use crate::importer::{IcsImporter, Importer};

/// One `[[importers]]` entry of a preset.
///
/// `importer_type` selects the variant; the remaining keys are read by
/// that variant (`path`, `user_agent` for `ics`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImporterConfig {
    pub importer_type: String,
    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl ImporterConfig {
    pub fn ics(path: &str) -> Self {
        let mut params = HashMap::new();
        params.insert("path".to_string(), toml::Value::String(path.to_string()));
        ImporterConfig {
            importer_type: "ics".to_string(),
            params,
        }
    }

    fn string_param(&self, key: &str) -> CalPrintResult<Option<&str>> {
        match self.params.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(CalPrintError::Config(format!(
                "`{}` for {} importer must be a string, got {}",
                key,
                self.importer_type,
                other.type_str()
            ))),
        }
    }
}

/// Construct one importer per entry, in order. Nothing is loaded yet.
///
/// Any bad entry fails the whole batch.
pub fn build_importers(configs: &[ImporterConfig]) -> CalPrintResult<Vec<Box<dyn Importer>>> {
    configs.iter().map(build_importer).collect()
}

fn build_importer(config: &ImporterConfig) -> CalPrintResult<Box<dyn Importer>> {
    match config.importer_type.as_str() {
        "ics" => {
            let path = config.string_param("path")?.ok_or_else(|| {
                CalPrintError::Config("ics importer requires a `path`".into())
            })?;

            let mut importer = IcsImporter::new(path)?;
            if let Some(user_agent) = config.string_param("user_agent")? {
                importer = importer.with_user_agent(user_agent);
            }

            Ok(Box::new(importer))
        }
        other => Err(CalPrintError::Config(format!(
            "Unsupported importer type: {}",
            other
        ))),
    }
}
