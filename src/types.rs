//! Core types shared across the TerraLens pipeline.
//!
//! The central types are:
//! - [`Document`]: one configuration file's raw text plus its path
//! - [`ConfigBlock`]: a structurally parsed top-level block
//! - [`AttrValue`] / [`AttrMap`]: the tagged attribute value tree
//! - [`Entity`]: a declared infrastructure construct
//! - [`ParseWarning`]: non-fatal per-document conditions
//! - [`ParseResult`]: the assembled graph plus its warnings

use crate::error::Result;
use crate::graph::Graph;
use clap::ValueEnum;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single configuration document: raw text tagged with its origin path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Originating path (provenance, not identity)
    pub path: PathBuf,
    /// Raw document text
    pub content: String,
}

impl Document {
    /// Create a document from a path and its raw content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// The coarse kind of an entity, used for identity scoping and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A provider configuration block
    Provider,
    /// A managed resource
    Resource,
    /// A data source
    Data,
    /// A module call
    Module,
    /// An input variable
    Variable,
    /// An output value
    Output,
}

impl Category {
    /// Map a top-level block keyword to its category.
    ///
    /// Returns `None` for keywords that declare no entity (`terraform`,
    /// `locals`, and anything unknown).
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "provider" => Some(Self::Provider),
            "resource" => Some(Self::Resource),
            "data" => Some(Self::Data),
            "module" => Some(Self::Module),
            "variable" => Some(Self::Variable),
            "output" => Some(Self::Output),
            _ => None,
        }
    }

    /// The lowercase name used in entity ids and the wire format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Resource => "resource",
            Self::Data => "data",
            Self::Module => "module",
            Self::Variable => "variable",
            Self::Output => "output",
        }
    }

    /// Whether entities of this category carry a type label in addition to
    /// their name (`resource` and `data` blocks have two labels).
    #[must_use]
    pub const fn is_typed(self) -> bool {
        matches!(self, Self::Resource | Self::Data)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically-shaped attribute value, as written in the source text.
///
/// Interpolation expressions are kept as literal strings (e.g.
/// `"${aws_vpc.main.id}"`), never evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Explicit null
    Null,
    /// Boolean literal
    Bool(bool),
    /// Numeric literal
    Number(f64),
    /// String literal or rendered expression text
    String(String),
    /// List of values
    List(Vec<AttrValue>),
    /// Nested attribute map (object or nested block)
    Map(AttrMap),
}

impl AttrValue {
    /// Returns the string content if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

/// An ordered attribute map preserving source declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMap(Vec<(String, AttrValue)>);

impl AttrMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a value, replacing an existing entry with the same key in
    /// place (declaration order of the first occurrence is kept).
    pub fn insert(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable lookup by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut AttrValue> {
        self.0.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for AttrMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl FromIterator<(String, AttrValue)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A structurally parsed top-level block, independent of semantic meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBlock {
    /// Block keyword (`resource`, `module`, `variable`, ...)
    pub keyword: String,
    /// Positional labels (type and/or name)
    pub labels: Vec<String>,
    /// Attribute tree, nested blocks included as nested maps
    pub attributes: AttrMap,
}

/// A declared infrastructure construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Canonical id: `<category>.<type>.<name>` for typed blocks,
    /// `<category>.<name>` otherwise. Unique within a parse run.
    pub id: String,
    /// Coarse kind of the entity
    pub category: Category,
    /// Declared type token (empty for untyped categories)
    pub block_type: String,
    /// Declared local name
    pub name: String,
    /// Provider hint derived from the type prefix (or the provider's own
    /// name for provider blocks)
    pub provider: Option<String>,
    /// Attribute tree, verbatim from the source
    pub attributes: AttrMap,
    /// Originating document path
    pub source_path: PathBuf,
    /// Resolved dependency ids, recomputed by the reference resolver
    pub dependencies: Vec<String>,
}

/// A non-fatal condition surfaced by a parse run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A document failed structural parsing and was skipped.
    Syntax {
        /// The failed document
        path: PathBuf,
        /// Parser diagnostic (names the approximate location)
        message: String,
        /// Approximate line, when the parser reports one
        line: Option<usize>,
    },
    /// Two blocks resolved to the same entity id; the first occurrence wins.
    DuplicateEntity {
        /// The colliding entity id
        id: String,
        /// Document declaring the losing occurrence
        path: PathBuf,
    },
}

impl ParseWarning {
    /// The document this warning points at.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Syntax { path, .. } | Self::DuplicateEntity { path, .. } => path,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { path, message, .. } => {
                write!(f, "syntax error in {}: {}", path.display(), message)
            }
            Self::DuplicateEntity { id, path } => {
                write!(
                    f,
                    "duplicate entity '{}' in {} (first occurrence kept)",
                    id,
                    path.display()
                )
            }
        }
    }
}

/// The result of one parse invocation: the assembled graph plus the
/// per-document warnings that accumulated along the way.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// The assembled entity graph
    pub graph: Graph,
    /// Syntax failures and duplicate-id reports
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    /// Whether any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether every document in the corpus failed structurally.
    ///
    /// Lets callers distinguish "empty graph because nothing was submitted"
    /// from "empty graph because everything failed to parse".
    #[must_use]
    pub fn all_documents_failed(&self) -> bool {
        self.graph.total_files() == 0
            && self
                .warnings
                .iter()
                .any(|w| matches!(w, ParseWarning::Syntax { .. }))
    }

    /// Render this result in the given report format.
    ///
    /// Uses default output options (pretty JSON, non-verbose text). Callers
    /// that need configured output should go through
    /// [`Reporter`](crate::reporter::Reporter) directly.
    ///
    /// # Errors
    ///
    /// Returns an error if report serialization fails.
    pub fn generate_report(&self, format: ReportFormat) -> Result<String> {
        let config = crate::Config::default();
        crate::reporter::Reporter::new(&config).generate(self, format)
    }
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary
    Text,
    /// Structured JSON report
    Json,
}

/// Output format for graph exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    /// Graphviz DOT
    Dot,
    /// Wire-format JSON (entities, relationships, metadata)
    Json,
    /// Mermaid diagram syntax
    Mermaid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_keyword() {
        assert_eq!(Category::from_keyword("resource"), Some(Category::Resource));
        assert_eq!(Category::from_keyword("data"), Some(Category::Data));
        assert_eq!(Category::from_keyword("variable"), Some(Category::Variable));
        assert_eq!(Category::from_keyword("locals"), None);
        assert_eq!(Category::from_keyword("terraform"), None);
    }

    #[test]
    fn test_attr_map_preserves_order() {
        let mut map = AttrMap::new();
        map.insert("zeta", AttrValue::Bool(true));
        map.insert("alpha", AttrValue::Number(1.0));
        map.insert("zeta", AttrValue::Bool(false));

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(map.get("zeta"), Some(&AttrValue::Bool(false)));
    }

    #[test]
    fn test_attr_value_serializes_to_json() {
        let mut map = AttrMap::new();
        map.insert("cidr", AttrValue::String("10.0.0.0/16".to_string()));
        map.insert("count", AttrValue::Number(2.0));
        map.insert("nullable", AttrValue::Null);

        let json = serde_json::to_value(AttrValue::Map(map)).unwrap();
        assert_eq!(json["cidr"], "10.0.0.0/16");
        assert_eq!(json["count"], 2.0);
        assert!(json["nullable"].is_null());
    }

    #[test]
    fn test_warning_display_names_document() {
        let w = ParseWarning::Syntax {
            path: PathBuf::from("broken.tf"),
            message: "unexpected token".to_string(),
            line: Some(4),
        };
        assert!(w.to_string().contains("broken.tf"));
    }

    #[test]
    fn test_generate_report_uses_default_output_options() {
        let result = ParseResult::default();
        let report = result.generate_report(ReportFormat::Json).unwrap();

        // Pretty JSON is the default on this convenience path.
        assert!(report.contains('\n'));
        assert!(report.contains("\"entities\""));
    }
}
