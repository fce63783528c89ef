//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::graph::wire_graph;
use crate::reporter::ReportGenerator;
use crate::types::{ParseResult, ParseWarning};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, result: &ParseResult) -> Result<String> {
        let report = JsonReport {
            meta: ReportMeta {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                files_parsed: result.graph.total_files(),
            },
            graph: wire_graph(&result.graph),
            warnings: &result.warnings,
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })
    }
}

/// JSON report structure.
#[derive(Serialize)]
struct JsonReport<'a> {
    /// Report metadata
    meta: ReportMeta,
    /// The assembled graph in its wire shape
    graph: crate::graph::WireGraph<'a>,
    /// Non-fatal warnings collected during parsing
    warnings: &'a [ParseWarning],
}

/// Report metadata.
#[derive(Serialize)]
struct ReportMeta {
    /// TerraLens version
    version: String,
    /// Report generation timestamp
    timestamp: String,
    /// Number of documents parsed successfully
    files_parsed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityExtractor;
    use crate::graph::{DocumentEntities, GraphAssembler};
    use crate::parser::{HclParser, Parser};
    use std::path::{Path, PathBuf};

    fn create_test_result() -> ParseResult {
        let content = r#"
resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
}
"#;
        let blocks = HclParser::new()
            .parse_content(content, Path::new("main.tf"))
            .unwrap();
        let entities = EntityExtractor::new().extract(&blocks, Path::new("main.tf"));
        GraphAssembler::new().assemble(
            vec![DocumentEntities {
                path: PathBuf::from("main.tf"),
                entities,
            }],
            vec![ParseWarning::Syntax {
                path: PathBuf::from("broken.tf"),
                message: "unexpected end of file".to_string(),
                line: None,
            }],
        )
    }

    #[test]
    fn test_json_report_generation() {
        let result = create_test_result();
        let config = Config::default();
        let reporter = JsonReporter::new(&config);

        let json = reporter.generate(&result).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(parsed["meta"]["version"].is_string());
        assert_eq!(parsed["meta"]["files_parsed"], 1);
        assert_eq!(parsed["graph"]["metadata"]["total_entities"], 1);
        assert_eq!(parsed["warnings"][0]["kind"], "syntax");
    }

    #[test]
    fn test_json_report_pretty() {
        let result = create_test_result();
        let mut config = Config::default();
        config.output.pretty = true;

        let reporter = JsonReporter::new(&config);
        let json = reporter.generate(&result).unwrap();

        // Pretty output should have newlines
        assert!(json.contains('\n'));
    }
}
