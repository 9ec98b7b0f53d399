//! Report assembly.
//!
//! Turns one parsed Infer report into a SARIF run: a lazily built rule
//! dictionary keyed by bug type, one result per finding in input order, and
//! the file catalog accumulated while resolving locations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::files::FileRegistry;
use crate::flow::build_code_flow;
use crate::report::parse_report;
use crate::sarif::{
    Level, Location, PhysicalLocation, Region, Result as SarifResult, Rule, Run, Tool,
};

const TOOL_NAME: &str = "Infer";

pub(crate) struct Converter {
    project_root: PathBuf,
    compute_hashes: bool,
}

impl Converter {
    /// `project_root` must be absolute; the CLI resolves it before construction.
    pub(crate) fn new(project_root: PathBuf, compute_hashes: bool) -> Self {
        Self {
            project_root,
            compute_hashes,
        }
    }

    pub(crate) fn convert(&self, input: &str) -> Result<Run> {
        let findings = parse_report(input)?;
        debug!(findings = findings.len(), "parsed Infer report");
        // The file registry is scoped to one conversion; nothing carries
        // over between convert calls.
        let mut files = FileRegistry::new(&self.project_root, self.compute_hashes);
        let mut rules: BTreeMap<String, Rule> = BTreeMap::new();
        let mut results = Vec::with_capacity(findings.len());
        for finding in &findings {
            rules.entry(finding.bug_type.clone()).or_insert_with(|| Rule {
                id: finding.bug_type.clone(),
                name: finding.bug_type_hum.clone(),
            });
            let code_flow = build_code_flow(&finding.bug_trace, &mut files)?;
            let uri = files.resolve(&finding.file)?;
            results.push(SarifResult {
                message: finding.qualifier.clone(),
                level: kind_to_level(&finding.kind),
                rule_key: finding.bug_type.clone(),
                rule_id: finding.bug_type.clone(),
                code_flows: vec![code_flow],
                // An Infer finding carries a single location of its own.
                locations: vec![Location {
                    result_file: PhysicalLocation {
                        uri,
                        region: Region {
                            start_line: finding.line,
                            start_column: finding.column,
                        },
                    },
                }],
            });
        }
        Ok(Run {
            tool: Tool {
                name: TOOL_NAME.to_string(),
            },
            rules,
            results,
            files: files.into_entries(),
        })
    }
}

fn kind_to_level(kind: &str) -> Level {
    match kind {
        "ERROR" => Level::Error,
        _ => Level::Warning,
    }
}
