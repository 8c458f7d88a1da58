//! The generation pipeline: load, resolve, generate, write

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use ftmgen_codegen::{GeneratedSource, GeneratorOptions, JavaCodegen};
use ftmgen_parser::{load_dir, SchemaCatalog, SchemaDocument, SchemaFetcher};
use tracing::{debug, info, warn};

/// Where schema documents come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Dir(PathBuf),
    Url(String),
}

pub async fn load_documents(source: &SchemaSource) -> Result<Vec<SchemaDocument>> {
    match source {
        SchemaSource::Dir(dir) => {
            load_dir(dir).with_context(|| format!("Failed to read schemas from {:?}", dir))
        }
        SchemaSource::Url(url) => {
            let fetcher = SchemaFetcher::new()?;
            fetcher
                .fetch_all(url)
                .await
                .with_context(|| format!("Failed to fetch schemas from {}", url))
        }
    }
}

/// Generate one source per schema of the catalog.
///
/// When `options.models` is unset, the catalog's own names are used.
pub fn generate_catalog(
    catalog: &SchemaCatalog,
    options: &GeneratorOptions,
    mixins: Option<&[String]>,
) -> Result<Vec<GeneratedSource>> {
    let parents = match mixins {
        Some(mixins) => catalog.closed_set_with_mixins(mixins.iter().cloned())?,
        None => catalog.closed_set()?,
    };
    let parents = Arc::new(parents);
    info!(
        "Resolved {} parent types out of {} schemas",
        parents.len(),
        catalog.len()
    );

    let mut options = options.clone();
    if options.models.is_none() {
        options.models = Some(catalog.names());
    }
    let codegen = JavaCodegen::new().with_options(options);

    catalog
        .nodes()
        .map(|node| {
            codegen
                .generate_node(node.clone(), &parents)
                .with_context(|| format!("Failed to generate {}", node.name))
        })
        .collect()
}

pub fn write_sources(sources: &[GeneratedSource], dir: &Path) -> Result<Vec<PathBuf>> {
    if sources.is_empty() {
        warn!("No schema to generate");
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let path = dir.join(&source.file_name);
        fs::write(&path, &source.source)
            .with_context(|| format!("Failed to write {:?}", path))?;
        debug!("Wrote {} {}", source.shape, path.display());
        written.push(path);
    }
    info!("Generated {} Java files in {:?}", written.len(), dir);
    Ok(written)
}
