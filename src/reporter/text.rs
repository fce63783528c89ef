//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{Category, ParseResult};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to list every entity
    verbose: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            verbose: config.output.verbose,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, result: &ParseResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push_str(&self.format_summary(result));

        if !result.warnings.is_empty() {
            output.push_str(&self.format_warnings(result));
        }

        if self.verbose && !result.graph.is_empty() {
            output.push_str(&self.format_entities(result));
        }

        output.push_str(&self.format_footer(result));

        Ok(output)
    }
}

impl TextReporter {
    /// Format the report header.
    fn format_header(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        format!(
            "\nTerraLens v{} ({timestamp})\n{}\n",
            env!("CARGO_PKG_VERSION"),
            "=".repeat(72),
        )
    }

    /// Format the summary section.
    fn format_summary(&self, result: &ParseResult) -> String {
        let meta = result.graph.metadata();
        let mut output = format!(
            "\nSummary\n{}\n  {} files | {} entities | {} relationships\n",
            "-".repeat(72),
            meta.total_files,
            meta.total_entities,
            meta.total_relationships,
        );

        let categories = [
            Category::Resource,
            Category::Data,
            Category::Module,
            Category::Variable,
            Category::Output,
            Category::Provider,
        ];
        let counts: Vec<String> = categories
            .iter()
            .filter_map(|&category| {
                let count = result.graph.entities().filter(|e| e.category == category).count();
                (count > 0).then(|| format!("{count} {category}"))
            })
            .collect();

        if !counts.is_empty() {
            output.push_str(&format!("  {}\n", counts.join(" | ")));
        }

        output
    }

    /// Format the warnings section.
    fn format_warnings(&self, result: &ParseResult) -> String {
        let mut output = format!("\nWarnings\n{}\n", "-".repeat(72));

        for warning in &result.warnings {
            output.push_str(&format!("  [WARNING] {warning}\n"));
        }

        output
    }

    /// Format the entity list.
    fn format_entities(&self, result: &ParseResult) -> String {
        let mut output = format!("\nEntities\n{}\n", "-".repeat(72));

        for entity in result.graph.entities() {
            output.push_str(&format!(
                "  {} ({})\n",
                entity.id,
                entity.source_path.display()
            ));
            for dependency in &entity.dependencies {
                output.push_str(&format!("    -> {dependency}\n"));
            }
        }

        output
    }

    /// Format the report footer.
    fn format_footer(&self, result: &ParseResult) -> String {
        let status = if result.all_documents_failed() {
            "FAILED - No documents could be parsed"
        } else if result.has_warnings() {
            "PASSED with warnings"
        } else {
            "PASSED - No issues found"
        };

        format!("\n{status}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityExtractor;
    use crate::graph::{DocumentEntities, GraphAssembler};
    use crate::parser::{HclParser, Parser};
    use crate::types::ParseWarning;
    use std::path::{Path, PathBuf};

    fn create_test_result(warnings: Vec<ParseWarning>) -> ParseResult {
        let content = r#"
resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
}

variable "environment" {
  default = "dev"
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
            warnings,
        )
    }

    #[test]
    fn test_text_report_generation() {
        let result = create_test_result(Vec::new());
        let config = Config::default();
        let reporter = TextReporter::new(&config);

        let text = reporter.generate(&result).unwrap();

        assert!(text.contains("TerraLens"));
        assert!(text.contains("Summary"));
        assert!(text.contains("1 files | 2 entities"));
        assert!(text.contains("1 resource | 1 variable"));
        assert!(text.contains("PASSED - No issues found"));
    }

    #[test]
    fn test_text_report_lists_warnings() {
        let result = create_test_result(vec![ParseWarning::Syntax {
            path: PathBuf::from("broken.tf"),
            message: "unexpected end of file".to_string(),
            line: None,
        }]);
        let config = Config::default();
        let reporter = TextReporter::new(&config);

        let text = reporter.generate(&result).unwrap();

        assert!(text.contains("[WARNING]"));
        assert!(text.contains("broken.tf"));
        assert!(text.contains("PASSED with warnings"));
    }

    #[test]
    fn test_text_report_verbose_lists_entities() {
        let result = create_test_result(Vec::new());
        let mut config = Config::default();
        config.output.verbose = true;

        let reporter = TextReporter::new(&config);
        let text = reporter.generate(&result).unwrap();

        assert!(text.contains("resource.aws_vpc.main"));
        assert!(text.contains("variable.environment"));
    }
}
