//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let (files, outputs): (Vec<&ResultItem>, Vec<&ResultItem>) = result_set
            .items
            .iter()
            .partition(|item| item.kind == Kind::File);

        output.push_str("## Manifest\n\n");
        if files.is_empty() {
            output.push_str("_No weighted files._\n");
        }
        for item in files {
            let position = item.position.unwrap_or_default();
            match item.weight {
                Some(weight) => {
                    output.push_str(&format!("{}. `{}` (weight {})\n", position, item.path, weight))
                }
                None => output.push_str(&format!("{}. `{}` (unweighted)\n", position, item.path)),
            }
        }
        output.push('\n');

        for item in outputs {
            output.push_str("## Output\n\n");
            output.push_str(&format!("- path: `{}`\n", item.path));
            if let Some(files) = item.meta.files {
                output.push_str(&format!("- files: {}\n", files));
            }
            if let Some(skipped) = item.meta.skipped {
                output.push_str(&format!("- skipped: {}\n", skipped));
            }
            if let Some(size) = item.meta.size {
                output.push_str(&format!("- size: {} bytes\n", size));
            }
            if let Some(hash) = &item.meta.hash {
                output.push_str(&format!("- xxh3: `{}`\n", hash));
            }
            output.push('\n');
        }

        output
    }
}
