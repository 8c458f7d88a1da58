//! Import collection for one generated file

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::CodegenError;

/// Fully qualified names a generated file needs, kept sorted and unique
#[derive(Debug, Default)]
pub struct ImportTracker {
    imports: BTreeSet<&'static str>,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, import: &'static str) {
        self.imports.insert(import);
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.imports.iter().copied()
    }

    /// Write the import block followed by a blank line, or nothing.
    pub fn render(&self, output: &mut String) -> Result<(), CodegenError> {
        if self.is_empty() {
            return Ok(());
        }
        for import in &self.imports {
            writeln!(output, "import {};", import)?;
        }
        writeln!(output)?;
        Ok(())
    }
}
