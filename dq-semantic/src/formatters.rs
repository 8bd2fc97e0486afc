//! Report formatting for column semantic profiles.
//!
//! Profiles produced by [`SemanticTypeAnalyzer`](crate::analyzers::SemanticTypeAnalyzer)
//! can be rendered as JSON for tooling, plain text for terminals, or
//! Markdown for documentation.
//!
//! # Examples
//!
//! ```rust
//! use dq_semantic::analyzers::ColumnSemanticProfile;
//! use dq_semantic::formatters::{HumanFormatter, ProfileFormatter};
//!
//! let profile = ColumnSemanticProfile {
//!     table: "customers".to_string(),
//!     column: "email".to_string(),
//!     suggested: None,
//!     categories: Vec::new(),
//!     samples: 0,
//!     empty_count: 0,
//! };
//! let output = HumanFormatter::new().format(&[profile]).unwrap();
//! assert!(output.contains("customers.email"));
//! ```

use std::fmt::Write;

use chrono::Utc;
use serde::Serialize;

use crate::analyzers::ColumnSemanticProfile;
use crate::error::{Result, SemanticError};
use crate::inference::SemanticCategory;

/// Options shared by all formatters.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Maximum number of categories per column (`None` for all)
    pub max_categories: Option<usize>,
    /// Include the null/blank bucket in category listings
    pub include_empty: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Add a generation timestamp
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            max_categories: None,
            include_empty: true,
            pretty: true,
            include_timestamps: false,
        }
    }
}

impl FormatterConfig {
    /// Top five non-empty categories, compact JSON.
    pub fn summary() -> Self {
        Self {
            max_categories: Some(5),
            include_empty: false,
            pretty: false,
            include_timestamps: false,
        }
    }

    /// Sets the category limit per column.
    pub fn with_max_categories(mut self, max: usize) -> Self {
        self.max_categories = Some(max);
        self
    }

    /// Sets whether the empty bucket is listed.
    pub fn with_empty(mut self, include: bool) -> Self {
        self.include_empty = include;
        self
    }

    /// Sets JSON pretty printing.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets whether a timestamp is emitted.
    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    fn categories<'a>(&self, profile: &'a ColumnSemanticProfile) -> Vec<&'a SemanticCategory> {
        let listed = profile
            .categories
            .iter()
            .filter(|c| self.include_empty || !c.id.is_empty());
        match self.max_categories {
            Some(max) => listed.take(max).collect(),
            None => listed.collect(),
        }
    }
}

/// Renders profiles into a textual report.
pub trait ProfileFormatter {
    /// Formats with the formatter's own configuration.
    fn format(&self, profiles: &[ColumnSemanticProfile]) -> Result<String>;

    /// Formats with an explicit configuration.
    fn format_with_config(
        &self,
        profiles: &[ColumnSemanticProfile],
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(profiles)
    }
}

fn write_error(e: std::fmt::Error) -> SemanticError {
    SemanticError::Internal(format!("Failed to write report: {e}"))
}

fn display_name(category: &SemanticCategory) -> &str {
    if category.id.is_empty() {
        "(empty)"
    } else {
        &category.name
    }
}

/// JSON output.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    config: FormatterConfig,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<String>,
    columns: Vec<JsonColumn<'a>>,
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    table: &'a str,
    column: &'a str,
    samples: u64,
    empty_count: u64,
    suggested: Option<&'a SemanticCategory>,
    categories: Vec<&'a SemanticCategory>,
}

impl JsonFormatter {
    /// Creates a formatter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter with `config`.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ProfileFormatter for JsonFormatter {
    fn format(&self, profiles: &[ColumnSemanticProfile]) -> Result<String> {
        self.format_with_config(profiles, &self.config)
    }

    fn format_with_config(
        &self,
        profiles: &[ColumnSemanticProfile],
        config: &FormatterConfig,
    ) -> Result<String> {
        let report = JsonReport {
            generated_at: config.include_timestamps.then(|| Utc::now().to_rfc3339()),
            columns: profiles
                .iter()
                .map(|p| JsonColumn {
                    table: &p.table,
                    column: &p.column,
                    samples: p.samples,
                    empty_count: p.empty_count,
                    suggested: p.suggested.as_ref(),
                    categories: config.categories(p),
                })
                .collect(),
        };

        let json = if config.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| SemanticError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

/// Plain text output for terminals.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a formatter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter with `config`.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn render(
        &self,
        out: &mut String,
        profiles: &[ColumnSemanticProfile],
        config: &FormatterConfig,
    ) -> std::fmt::Result {
        writeln!(out, "Semantic profile ({} columns)", profiles.len())?;
        if config.include_timestamps {
            writeln!(out, "Generated: {}", Utc::now().to_rfc3339())?;
        }

        for profile in profiles {
            writeln!(out)?;
            writeln!(out, "{}.{}", profile.table, profile.column)?;
            match &profile.suggested {
                Some(category) => writeln!(
                    out,
                    "  Suggested: {} ({:.2}%)",
                    category.name, category.frequency
                )?,
                None => writeln!(out, "  Suggested: none")?,
            }
            writeln!(
                out,
                "  Samples: {} ({} empty)",
                profile.samples, profile.empty_count
            )?;

            let categories = config.categories(profile);
            for category in &categories {
                writeln!(
                    out,
                    "    {:<24} {:>8} {:>7.2}%",
                    display_name(category),
                    category.count,
                    category.frequency
                )?;
            }
            let hidden = profile.categories.len() - categories.len();
            if hidden > 0 {
                writeln!(out, "    ... {hidden} more")?;
            }
        }
        Ok(())
    }
}

impl ProfileFormatter for HumanFormatter {
    fn format(&self, profiles: &[ColumnSemanticProfile]) -> Result<String> {
        self.format_with_config(profiles, &self.config)
    }

    fn format_with_config(
        &self,
        profiles: &[ColumnSemanticProfile],
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, profiles, config)
            .map_err(write_error)?;
        Ok(output)
    }
}

/// Markdown output with one table per column.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }
}

impl MarkdownFormatter {
    /// Creates a formatter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter with `config`.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the heading level of the report title, between 1 and 5.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }

    fn render(
        &self,
        out: &mut String,
        profiles: &[ColumnSemanticProfile],
        config: &FormatterConfig,
    ) -> std::fmt::Result {
        let h = "#".repeat(self.heading_level as usize);
        writeln!(out, "{h} Semantic Profile")?;
        if config.include_timestamps {
            writeln!(out)?;
            writeln!(out, "**Generated:** {}", Utc::now().to_rfc3339())?;
        }

        for profile in profiles {
            writeln!(out)?;
            writeln!(out, "{h}# `{}.{}`", profile.table, profile.column)?;
            writeln!(out)?;
            let suggested = profile
                .suggested
                .as_ref()
                .map_or_else(|| "none".to_string(), |c| format!("**{}**", c.name));
            writeln!(
                out,
                "Suggested: {suggested}, samples: {}, empty: {}",
                profile.samples, profile.empty_count
            )?;

            let categories = config.categories(profile);
            if categories.is_empty() {
                continue;
            }
            writeln!(out)?;
            writeln!(out, "| Category | Count | Frequency |")?;
            writeln!(out, "|----------|------:|----------:|")?;
            for category in categories {
                writeln!(
                    out,
                    "| {} | {} | {:.2}% |",
                    display_name(category),
                    category.count,
                    category.frequency
                )?;
            }
        }
        Ok(())
    }
}

impl ProfileFormatter for MarkdownFormatter {
    fn format(&self, profiles: &[ColumnSemanticProfile]) -> Result<String> {
        self.format_with_config(profiles, &self.config)
    }

    fn format_with_config(
        &self,
        profiles: &[ColumnSemanticProfile],
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        self.render(&mut output, profiles, config)
            .map_err(write_error)?;
        Ok(output)
    }
}
