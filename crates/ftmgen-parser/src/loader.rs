//! Reading schema files from a local directory

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{ParserError, SchemaDocument};

/// Whether a file name looks like a YAML schema
pub fn is_schema_file(name: &str) -> bool {
    name.ends_with(".yaml") || name.ends_with(".yml")
}

/// Read every `*.yaml` / `*.yml` file directly inside `dir`, sorted by name.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<SchemaDocument>, ParserError> {
    let dir = dir.as_ref();
    let mut documents = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ParserError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_schema_file(&file_name) {
            debug!("Skipping {}", file_name);
            continue;
        }
        let content = fs::read_to_string(entry.path())?;
        documents.push(SchemaDocument::new(file_name, content));
    }

    info!("Loaded {} schema files from {:?}", documents.len(), dir);
    Ok(documents)
}
