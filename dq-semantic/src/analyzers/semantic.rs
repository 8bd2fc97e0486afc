//! Semantic category profiling of DataFusion table columns.
//!
//! Samples a column with a bounded query, streams the sampled values through
//! a fresh recognizer and reports the ranked categories.
//!
//! # Example
//!
//! ```rust,no_run
//! use dq_semantic::analyzers::SemanticTypeAnalyzer;
//! use dq_semantic::recognizer::CategoryRecognizerBuilder;
//! use datafusion::prelude::*;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let ctx = SessionContext::new();
//! ctx.register_csv("customers", "customers.csv", CsvReadOptions::new()).await.unwrap();
//!
//! let analyzer = SemanticTypeAnalyzer::new(CategoryRecognizerBuilder::builtin())
//!     .unwrap()
//!     .with_sample_size(500);
//! let profile = analyzer.analyze_column(&ctx, "customers", "email").await.unwrap();
//! if let Some(category) = &profile.suggested {
//!     println!("{} looks like {} ({:.2}%)", profile.column, category.name, category.frequency);
//! }
//! # })
//! ```

use arrow::array::{
    Array, BooleanArray, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
    StringViewArray,
};
use datafusion::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{Result, SemanticError};
use crate::inference::{suggested_category, SemanticCategory};
use crate::recognizer::{CategoryRecognizer, CategoryRecognizerBuilder};
use crate::security::InputSecurity;

/// Semantic profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSemanticProfile {
    /// Table name
    pub table: String,
    /// Column name
    pub column: String,
    /// Best category if its frequency reaches the suggestion threshold
    pub suggested: Option<SemanticCategory>,
    /// All categories, ranked
    pub categories: Vec<SemanticCategory>,
    /// Number of sampled rows
    pub samples: u64,
    /// Number of sampled null or blank values
    pub empty_count: u64,
}

impl ColumnSemanticProfile {
    /// Categories other than the empty bucket.
    pub fn non_empty_categories(&self) -> impl Iterator<Item = &SemanticCategory> {
        self.categories.iter().filter(|c| !c.id.is_empty())
    }
}

/// Profiles table columns with category recognizers.
#[derive(Debug, Clone)]
pub struct SemanticTypeAnalyzer {
    builder: CategoryRecognizerBuilder,
    sample_size: u64,
}

impl SemanticTypeAnalyzer {
    /// Default number of rows sampled per column.
    pub const DEFAULT_SAMPLE_SIZE: u64 = 1000;

    /// Creates an analyzer; the builder's sources are loaded once here.
    pub fn new(builder: CategoryRecognizerBuilder) -> Result<Self> {
        let builder = builder.resolve()?;
        builder.build()?;
        Ok(Self {
            builder,
            sample_size: Self::DEFAULT_SAMPLE_SIZE,
        })
    }

    /// Sets the number of rows sampled per column.
    pub fn with_sample_size(mut self, sample_size: u64) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Number of rows sampled per column.
    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    /// Profiles one column.
    #[instrument(skip(self, ctx))]
    pub async fn analyze_column(
        &self,
        ctx: &SessionContext,
        table_name: &str,
        column_name: &str,
    ) -> Result<ColumnSemanticProfile> {
        info!(
            table = table_name,
            column = column_name,
            sample_size = self.sample_size,
            "Starting semantic profiling"
        );

        let samples = self.collect_samples(ctx, table_name, column_name).await?;

        let mut recognizer = self.builder.build()?;
        for value in &samples {
            recognizer.process(value.as_deref())?;
        }
        let result = recognizer.result();
        recognizer.end();

        let threshold = self.builder.recognizer_config().suggestion_threshold;
        let profile = ColumnSemanticProfile {
            table: table_name.to_string(),
            column: column_name.to_string(),
            suggested: suggested_category(&result, threshold).map(SemanticCategory::from),
            categories: result.iter().map(SemanticCategory::from).collect(),
            samples: recognizer.total(),
            empty_count: recognizer.empty_count(),
        };

        info!(
            table = table_name,
            column = column_name,
            suggested = profile.suggested.as_ref().map(|c| c.name.as_str()),
            samples = profile.samples,
            "Completed semantic profiling"
        );
        Ok(profile)
    }

    /// Profiles several columns of one table concurrently.
    #[instrument(skip(self, ctx))]
    pub async fn analyze_columns(
        &self,
        ctx: &SessionContext,
        table_name: &str,
        column_names: &[String],
    ) -> Result<Vec<ColumnSemanticProfile>> {
        let mut handles = Vec::with_capacity(column_names.len());

        for column_name in column_names {
            let ctx = ctx.clone();
            let table_name = table_name.to_string();
            let column_name = column_name.clone();
            let analyzer = self.clone();

            handles.push(tokio::spawn(async move {
                analyzer
                    .analyze_column(&ctx, &table_name, &column_name)
                    .await
            }));
        }

        let mut profiles = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Ok(profile)) => profiles.push(profile),
                Ok(Err(e)) => return Err(e),
                Err(e) => return Err(SemanticError::Internal(format!("Task join error: {e}"))),
            }
        }
        Ok(profiles)
    }

    async fn collect_samples(
        &self,
        ctx: &SessionContext,
        table_name: &str,
        column_name: &str,
    ) -> Result<Vec<Option<String>>> {
        let sql = format!(
            "SELECT {} FROM {} LIMIT {}",
            InputSecurity::escape_identifier(column_name)?,
            qualified_identifier(table_name)?,
            self.sample_size
        );

        let batches = ctx.sql(&sql).await?.collect().await?;

        let mut samples = Vec::new();
        for batch in &batches {
            let column = batch.column(0);
            for row in 0..batch.num_rows() {
                samples.push(extract_string_value(column.as_ref(), row)?);
            }
        }
        Ok(samples)
    }
}

fn qualified_identifier(name: &str) -> Result<String> {
    InputSecurity::validate_identifier(name)?;
    let parts = name
        .split('.')
        .map(InputSecurity::escape_identifier)
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("."))
}

/// Reads one cell as text; `None` for SQL NULL.
fn extract_string_value(column: &dyn Array, row: usize) -> Result<Option<String>> {
    if column.is_null(row) {
        return Ok(None);
    }

    let any = column.as_any();
    let value = if let Some(arr) = any.downcast_ref::<StringArray>() {
        arr.value(row).to_string()
    } else if let Some(arr) = any.downcast_ref::<StringViewArray>() {
        arr.value(row).to_string()
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        arr.value(row).to_string()
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row).to_string()
    } else if let Some(arr) = any.downcast_ref::<BooleanArray>() {
        arr.value(row).to_string()
    } else {
        return Err(SemanticError::Internal(format!(
            "Unsupported column type for semantic profiling: {}",
            column.data_type()
        )));
    };
    Ok(Some(value))
}
