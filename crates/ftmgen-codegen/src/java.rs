//! Java source generator
//!
//! Every schema model becomes exactly one Java declaration:
//! - an `interface` for nodes that cannot hold state, or for every node when
//!   the run asks for interfaces only
//! - a `class` with constructor delegation for concrete nodes that take part
//!   in a concrete inheritance chain (they extend one, or someone extends them)
//! - a `record` for every other concrete node

use std::collections::BTreeSet;
use std::fmt::{self, Write};
use std::sync::Arc;

use ftmgen_core::{AttributeMode, NodeSet, SchemaModel, SchemaNode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::imports::ImportTracker;
use crate::naming::{field_name, is_java_identifier};
use crate::type_map::{java_type, JavaType};
use crate::{Codegen, CodegenError};

pub const DEFAULT_PACKAGE: &str = "org.icij.ftm";

/// Where the generated doc comments point to
pub const DEFAULT_SCHEMA_URL: &str =
    "https://github.com/alephdata/followthemoney/blob/main/followthemoney/schema";

/// Run-wide generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Attribute tier used when building models from nodes
    pub attribute_mode: AttributeMode,
    /// Emit every node as an interface with accessors
    pub interfaces: bool,
    /// Every type name known to the run. Entity references outside it are
    /// generated as text.
    pub models: Option<BTreeSet<String>>,
    pub package: String,
    pub schema_url: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            attribute_mode: AttributeMode::Required,
            interfaces: false,
            models: None,
            package: DEFAULT_PACKAGE.to_string(),
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
        }
    }
}

/// The kind of declaration generated for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Interface,
    Class,
    Record,
}

impl Shape {
    pub fn keyword(self) -> &'static str {
        match self {
            Shape::Interface => "interface",
            Shape::Class => "class",
            Shape::Record => "record",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One generated compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub type_name: String,
    /// `<Name>.java`
    pub file_name: String,
    pub shape: Shape,
    pub source: String,
}

/// An attribute ready for emission
struct Field {
    name: String,
    ty: JavaType,
}

impl Field {
    fn parameter(&self) -> String {
        format!("{} {}", self.ty.name, self.name)
    }
}

fn join_parameters(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::parameter)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_names(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Java code generator
pub struct JavaCodegen {
    options: GeneratorOptions,
    indent_size: usize,
}

impl JavaCodegen {
    pub fn new() -> Self {
        Self {
            options: GeneratorOptions::default(),
            indent_size: 4,
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_size)
    }

    /// Build a model for `node` with this generator's attribute mode
    pub fn model(&self, node: SchemaNode, parents: &Arc<NodeSet>) -> SchemaModel {
        SchemaModel::new(node, Arc::clone(parents), self.options.attribute_mode)
    }

    /// Which declaration `model` turns into
    pub fn shape(&self, model: &SchemaModel) -> Shape {
        if self.options.interfaces || !model.is_concrete() {
            Shape::Interface
        } else if model.is_registered_parent() || model.concrete_parent().is_some() {
            Shape::Class
        } else {
            Shape::Record
        }
    }

    /// Generate the source of a single parsed node
    pub fn generate_node(
        &self,
        node: SchemaNode,
        parents: &Arc<NodeSet>,
    ) -> Result<GeneratedSource, CodegenError> {
        self.generate_file(&self.model(node, parents))
    }

    #[instrument(skip(self, model), fields(name = %model.name()))]
    pub fn generate_file(&self, model: &SchemaModel) -> Result<GeneratedSource, CodegenError> {
        check_identifier("type name", model.name())?;
        for supertype in &model.node().extends {
            check_identifier(&format!("supertype of {}", model.name()), supertype)?;
        }

        let shape = self.shape(model);
        debug!("Generating {} {}", shape, model.name());

        let mut imports = ImportTracker::new();
        let mut body = String::new();
        match shape {
            Shape::Interface => self.write_interface(model, &mut imports, &mut body)?,
            Shape::Class => self.write_class(model, &mut imports, &mut body)?,
            Shape::Record => self.write_record(model, &mut imports, &mut body)?,
        }

        let mut source = String::new();
        writeln!(source, "package {};", self.options.package)?;
        writeln!(source)?;
        imports.render(&mut source)?;
        self.write_doc(model, shape, &mut source)?;
        source.push_str(&body);

        Ok(GeneratedSource {
            type_name: model.name().to_string(),
            file_name: format!("{}.java", model.name()),
            shape,
            source,
        })
    }

    /// Resolve names and types of `attributes`, recording needed imports
    fn fields(
        &self,
        model: &SchemaModel,
        attributes: &[String],
        imports: &mut ImportTracker,
    ) -> Result<Vec<Field>, CodegenError> {
        let fields = attributes
            .iter()
            .map(|attribute| {
                let name = field_name(attribute).into_owned();
                check_identifier(&format!("attribute of {}", model.name()), &name)?;
                let ty = java_type(
                    attribute,
                    model.resolved_property(attribute),
                    self.options.models.as_ref(),
                );
                if let Some(import) = ty.import {
                    imports.add(import);
                }
                Ok(Field { name, ty })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;
        check_unique(model, &fields)?;
        Ok(fields)
    }

    fn write_doc(
        &self,
        model: &SchemaModel,
        shape: Shape,
        output: &mut String,
    ) -> Result<(), CodegenError> {
        let node = model.node();
        writeln!(output, "/**")?;
        writeln!(
            output,
            " * Automatically generated {shape} for FtM model. Do not update this {shape}."
        )?;
        if node.label.is_some() || node.description.is_some() {
            writeln!(output, " * <p>")?;
        }
        if let Some(label) = &node.label {
            writeln!(output, " * <b>{}</b>", escape_doc(label))?;
        }
        if let Some(description) = &node.description {
            for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
                writeln!(output, " * {}", escape_doc(line))?;
            }
        }
        writeln!(
            output,
            " * @see <a href=\"{}/{name}.yaml\">{name}</a>.",
            self.options.schema_url.trim_end_matches('/'),
            name = model.name()
        )?;
        writeln!(output, " */")?;
        Ok(())
    }

    fn write_interface(
        &self,
        model: &SchemaModel,
        imports: &mut ImportTracker,
        output: &mut String,
    ) -> Result<(), CodegenError> {
        // In interfaces-only runs every supertype is itself an interface.
        let supertypes: Vec<&str> = if self.options.interfaces {
            model.node().extends.iter().map(String::as_str).collect()
        } else {
            model.implements_list()
        };

        write!(output, "public interface {}", model.name())?;
        if !supertypes.is_empty() {
            write!(output, " extends {}", supertypes.join(", "))?;
        }

        let accessors = if self.options.interfaces {
            self.fields(model, &model.attributes(), imports)?
        } else {
            Vec::new()
        };
        if accessors.is_empty() {
            writeln!(output, " {{}}")?;
            return Ok(());
        }

        writeln!(output, " {{")?;
        for accessor in &accessors {
            writeln!(
                output,
                "{}{} {}();",
                self.indent(1),
                accessor.ty.name,
                accessor.name
            )?;
        }
        writeln!(output, "}}")?;
        Ok(())
    }

    fn write_class(
        &self,
        model: &SchemaModel,
        imports: &mut ImportTracker,
        output: &mut String,
    ) -> Result<(), CodegenError> {
        let inherited = self.fields(model, &model.parents_attributes(), imports)?;
        let own = self.fields(model, &model.own_attributes(), imports)?;
        check_unique(model, inherited.iter().chain(own.iter()))?;
        let implements = model.implements_list();

        let modifier = if model.is_abstract() { "abstract " } else { "" };
        write!(output, "public {}class {}", modifier, model.name())?;
        if let Some(parent) = model.concrete_parent() {
            write!(output, " extends {}", parent)?;
        }
        if !implements.is_empty() {
            write!(output, " implements {}", implements.join(", "))?;
        }
        writeln!(output, " {{")?;

        for field in &own {
            writeln!(output, "{}final {};", self.indent(1), field.parameter())?;
        }
        if !own.is_empty() {
            writeln!(output)?;
        }

        let parameters: Vec<String> = inherited
            .iter()
            .chain(own.iter())
            .map(Field::parameter)
            .collect();
        writeln!(
            output,
            "{}public {}({}) {{",
            self.indent(1),
            model.name(),
            parameters.join(", ")
        )?;
        if !inherited.is_empty() {
            writeln!(output, "{}super({});", self.indent(2), join_names(&inherited))?;
        }
        for field in &own {
            writeln!(
                output,
                "{}this.{name} = {name};",
                self.indent(2),
                name = field.name
            )?;
        }
        writeln!(output, "{}}}", self.indent(1))?;
        writeln!(output, "}}")?;
        Ok(())
    }

    fn write_record(
        &self,
        model: &SchemaModel,
        imports: &mut ImportTracker,
        output: &mut String,
    ) -> Result<(), CodegenError> {
        let fields = self.fields(model, &model.attributes(), imports)?;
        let implements = model.implements_list();

        write!(
            output,
            "public record {}({})",
            model.name(),
            join_parameters(&fields)
        )?;
        if !implements.is_empty() {
            write!(output, " implements {}", implements.join(", "))?;
        }
        writeln!(output, " {{}}")?;
        Ok(())
    }
}

impl Default for JavaCodegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen for JavaCodegen {
    fn generate(&self, model: &SchemaModel) -> Result<String, CodegenError> {
        Ok(self.generate_file(model)?.source)
    }
}

fn check_identifier(context: &str, name: &str) -> Result<(), CodegenError> {
    if is_java_identifier(name) {
        Ok(())
    } else {
        Err(CodegenError::InvalidIdentifier {
            context: context.to_string(),
            name: name.to_string(),
        })
    }
}

/// Reserved-word renames can make two attributes collide
fn check_unique<'a>(
    model: &SchemaModel,
    fields: impl IntoIterator<Item = &'a Field>,
) -> Result<(), CodegenError> {
    let mut seen = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(CodegenError::DuplicateField {
                type_name: model.name().to_string(),
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn escape_doc(text: &str) -> String {
    text.replace("*/", "*&#47;")
}
