//! SARIF 1.0.0 output model.
//!
//! Only the subset of the schema that an Infer conversion produces is
//! modeled here: one run with a rule dictionary, results with code flows,
//! and a file dictionary keyed by URI.

use std::collections::BTreeMap;

use serde::Serialize;

pub(crate) const SCHEMA_URL: &str = "http://json.schemastore.org/sarif-1.0.0";
pub(crate) const VERSION: &str = "1.0.0";

/// The top-level SARIF log object.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SarifLog {
    #[serde(rename = "$schema")]
    pub(crate) schema: &'static str,
    pub(crate) version: &'static str,
    pub(crate) runs: Vec<Run>,
}

impl SarifLog {
    pub(crate) fn new(run: Run) -> Self {
        Self {
            schema: SCHEMA_URL,
            version: VERSION,
            runs: vec![run],
        }
    }
}

/// A single analysis run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Run {
    pub(crate) tool: Tool,
    pub(crate) rules: BTreeMap<String, Rule>,
    pub(crate) results: Vec<Result>,
    pub(crate) files: BTreeMap<String, FileData>,
}

/// The analysis tool that produced the run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Tool {
    pub(crate) name: String,
}

/// A defect category descriptor, keyed by its id in the run's rule dictionary.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Rule {
    pub(crate) id: String,
    pub(crate) name: String,
}

/// One reported finding.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Result {
    pub(crate) message: String,
    pub(crate) level: Level,
    pub(crate) rule_key: String,
    pub(crate) rule_id: String,
    pub(crate) code_flows: Vec<CodeFlow>,
    pub(crate) locations: Vec<Location>,
}

/// Result severity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Level {
    Error,
    Warning,
}

/// A result location pointing into the analyzed sources.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Location {
    pub(crate) result_file: PhysicalLocation,
}

/// A file URI with a region inside it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PhysicalLocation {
    pub(crate) uri: String,
    pub(crate) region: Region,
}

/// 1-based start position of a region.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Region {
    pub(crate) start_line: i64,
    pub(crate) start_column: i64,
}

/// The translated representation of one bug trace.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CodeFlow {
    pub(crate) locations: Vec<AnnotatedCodeLocation>,
}

/// One step of a code flow.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotatedCodeLocation {
    pub(crate) step: i64,
    pub(crate) message: String,
    pub(crate) physical_location: PhysicalLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) kind: Option<FlowKind>,
}

/// Control-flow classification of a code flow step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum FlowKind {
    Call,
    CallReturn,
    FunctionEnter,
    FunctionExit,
    Branch,
}

/// Identity and content metadata for one referenced source file.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileData {
    pub(crate) uri: String,
    pub(crate) mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) hashes: Option<Vec<FileHash>>,
}

/// A content hash with its algorithm tag.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileHash {
    pub(crate) value: String,
    pub(crate) algorithm: String,
}
