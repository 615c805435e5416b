use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::structure::{EngineOptions, SymbolListPolicy};
use crate::util::{read_json, write_json_pretty};

pub const DEFAULT_CONFIG_PATH: &str = "statute_structure_config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub preserve_amendments: bool,
    pub merge_dates: bool,
    pub symbol_list_policy: SymbolListPolicy,
    pub auto_verify: bool,
    pub min_page_text_chars: usize,
    pub default_output_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            preserve_amendments: true,
            merge_dates: true,
            symbol_list_policy: SymbolListPolicy::Heading,
            auto_verify: true,
            min_page_text_chars: 10,
            default_output_dir: None,
            log_level: "info".to_string(),
        }
    }
}

/// Where a loaded configuration came from. Reported by the caller once
/// logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Loaded,
    Created,
    Fallback { reason: String },
}

impl ConverterConfig {
    /// Loads the config at `path`, writing the defaults there first when the
    /// file does not exist. An unparseable file falls back to the defaults.
    pub fn load_or_create(path: &Path) -> Result<(Self, ConfigSource)> {
        if !path.exists() {
            let config = Self::default();
            write_json_pretty(path, &config)?;
            return Ok((config, ConfigSource::Created));
        }

        match read_json::<Self>(path) {
            Ok(config) => Ok((config, ConfigSource::Loaded)),
            Err(err) => Ok((
                Self::default(),
                ConfigSource::Fallback {
                    reason: format!("{err:#}"),
                },
            )),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            preserve_amendments: self.preserve_amendments,
            merge_dates: self.merge_dates,
            symbol_list_policy: self.symbol_list_policy,
        }
    }
}
