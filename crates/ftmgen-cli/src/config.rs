//! `ftmgen.toml` configuration file
//!
//! ```toml
//! input = "schema"
//! output = "src/main/java/org/icij/ftm"
//! mixins = ["Asset"]
//!
//! [generator]
//! attribute_mode = "featured"
//! package = "org.icij.ftm"
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ftmgen_codegen::GeneratorOptions;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory of schema YAML files
    pub input: Option<PathBuf>,
    /// Contents-API listing to fetch schemas from
    pub url: Option<String>,
    /// Directory the Java sources are written to
    pub output: Option<PathBuf>,
    /// Types that never hold state
    pub mixins: Option<Vec<String>>,
    pub generator: GeneratorOptions,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
