//! Infer's native report model.
//!
//! `report.json` is a flat array of findings. Fields not listed here
//! (procedure names, bug classes, visibility) are ignored.

use anyhow::{Context, Result};
use serde::Deserialize;

/// One defect reported by Infer.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Finding {
    pub(crate) bug_type: String,
    pub(crate) bug_type_hum: String,
    #[serde(default)]
    pub(crate) kind: String,
    pub(crate) qualifier: String,
    pub(crate) file: String,
    pub(crate) line: i64,
    #[serde(default)]
    pub(crate) column: i64,
    #[serde(default)]
    pub(crate) bug_trace: Vec<TraceItem>,
}

/// One point in a finding's bug trace.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TraceItem {
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) filename: String,
    pub(crate) line_number: i64,
    #[serde(default)]
    pub(crate) column_number: i64,
    #[serde(default)]
    pub(crate) node_tags: Vec<NodeTag>,
}

/// A tag/value pair attached to a trace step. The vocabulary is open; only
/// `kind` with values `procedure_start`, `procedure_end`, and `branch`
/// carries translation semantics.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct NodeTag {
    pub(crate) tag: String,
    pub(crate) value: String,
}

pub(crate) fn parse_report(input: &str) -> Result<Vec<Finding>> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    let findings: Vec<Finding> = serde_path_to_error::deserialize(&mut deserializer)
        .context("failed to parse Infer report")?;
    Ok(findings)
}
