//! Bug trace to code flow translation.
//!
//! A trace step's `node_tags` classify it as a function entry, function
//! exit, or branch point. Classification is a single forward pass with two
//! pieces of carried state: a function exit arms a pending call-return that
//! decorates the next step, and a function entry retroactively rewrites the
//! previous step as the call site.

use anyhow::Result;

use crate::files::FileRegistry;
use crate::report::TraceItem;
use crate::sarif::{AnnotatedCodeLocation, CodeFlow, FlowKind, PhysicalLocation, Region};

pub(crate) fn build_code_flow(
    trace: &[TraceItem],
    files: &mut FileRegistry,
) -> Result<CodeFlow> {
    let mut locations: Vec<AnnotatedCodeLocation> = Vec::with_capacity(trace.len());
    let mut next_is_call_return = false;
    for (index, item) in trace.iter().enumerate() {
        let uri = files.resolve(&item.filename)?;
        let mut location = AnnotatedCodeLocation {
            step: index as i64 + 1,
            message: item.description.clone(),
            physical_location: PhysicalLocation {
                uri,
                region: Region {
                    start_line: item.line_number,
                    start_column: item.column_number,
                },
            },
            kind: None,
        };
        if next_is_call_return {
            location.kind = Some(FlowKind::CallReturn);
        }
        next_is_call_return = false;
        // Tags are not mutually exclusive; when several recognized values
        // appear on one step, the last one wins.
        for node_tag in &item.node_tags {
            if node_tag.tag != "kind" {
                continue;
            }
            match node_tag.value.as_str() {
                "procedure_end" => {
                    location.kind = Some(FlowKind::FunctionExit);
                    next_is_call_return = true;
                }
                "procedure_start" => {
                    location.kind = Some(FlowKind::FunctionEnter);
                    // The step before a function entry is its call site,
                    // whatever kind it carried until now.
                    if let Some(previous) = locations.last_mut() {
                        previous.kind = Some(FlowKind::Call);
                    }
                }
                "branch" => {
                    location.kind = Some(FlowKind::Branch);
                }
                _ => {}
            }
        }
        locations.push(location);
    }
    Ok(CodeFlow { locations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NodeTag;
    use tempfile::tempdir;

    fn step(description: &str, tags: &[(&str, &str)]) -> TraceItem {
        TraceItem {
            description: description.to_string(),
            filename: "src/main.c".to_string(),
            line_number: 10,
            column_number: 1,
            node_tags: tags
                .iter()
                .map(|(tag, value)| NodeTag {
                    tag: tag.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    fn build(trace: &[TraceItem]) -> CodeFlow {
        let dir = tempdir().expect("temp dir");
        let mut files = FileRegistry::new(dir.path(), false);
        build_code_flow(trace, &mut files).expect("build code flow")
    }

    fn kinds(flow: &CodeFlow) -> Vec<Option<FlowKind>> {
        flow.locations.iter().map(|location| location.kind).collect()
    }

    #[test]
    fn empty_trace_yields_empty_flow() {
        let flow = build(&[]);

        assert!(flow.locations.is_empty());
    }

    #[test]
    fn steps_are_numbered_contiguously_from_one() {
        let flow = build(&[step("a", &[]), step("b", &[]), step("c", &[])]);

        let steps: Vec<i64> = flow.locations.iter().map(|location| location.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
        assert_eq!(kinds(&flow), vec![None, None, None]);
    }

    #[test]
    fn function_enter_marks_previous_step_as_call() {
        let flow = build(&[
            step("call site", &[]),
            step("start of procedure f()", &[("kind", "procedure_start")]),
        ]);

        assert_eq!(
            kinds(&flow),
            vec![Some(FlowKind::Call), Some(FlowKind::FunctionEnter)]
        );
    }

    #[test]
    fn leading_function_enter_has_no_call_site_to_mark() {
        let flow = build(&[
            step("start of procedure main()", &[("kind", "procedure_start")]),
            step("after entry", &[]),
        ]);

        assert_eq!(kinds(&flow), vec![Some(FlowKind::FunctionEnter), None]);
    }

    #[test]
    fn function_exit_decorates_next_step_as_call_return_even_when_untagged() {
        let flow = build(&[
            step("return from f()", &[("kind", "procedure_end")]),
            step("back at the caller", &[]),
        ]);

        assert_eq!(
            kinds(&flow),
            vec![Some(FlowKind::FunctionExit), Some(FlowKind::CallReturn)]
        );
    }

    #[test]
    fn pending_call_return_only_reaches_the_immediate_next_step() {
        let flow = build(&[
            step("return from f()", &[("kind", "procedure_end")]),
            step("back at the caller", &[]),
            step("one more statement", &[]),
        ]);

        assert_eq!(
            kinds(&flow),
            vec![Some(FlowKind::FunctionExit), Some(FlowKind::CallReturn), None]
        );
    }

    #[test]
    fn trailing_function_exit_leaves_no_dangling_call_return() {
        let flow = build(&[step("return from f()", &[("kind", "procedure_end")])]);

        assert_eq!(kinds(&flow), vec![Some(FlowKind::FunctionExit)]);
    }

    #[test]
    fn call_rewrite_overrides_an_exit_marking() {
        let flow = build(&[
            step("return from f()", &[("kind", "procedure_end")]),
            step("start of procedure g()", &[("kind", "procedure_start")]),
        ]);

        // The exit step is the call site of g() and loses its functionExit
        // marking to the retroactive rewrite.
        assert_eq!(
            kinds(&flow),
            vec![Some(FlowKind::Call), Some(FlowKind::FunctionEnter)]
        );
    }

    #[test]
    fn call_rewrite_overrides_a_call_return_marking() {
        let flow = build(&[
            step("return from f()", &[("kind", "procedure_end")]),
            step("back at the caller", &[]),
            step("start of procedure g()", &[("kind", "procedure_start")]),
        ]);

        assert_eq!(
            kinds(&flow),
            vec![
                Some(FlowKind::FunctionExit),
                Some(FlowKind::Call),
                Some(FlowKind::FunctionEnter)
            ]
        );
    }

    #[test]
    fn branch_tag_applies_at_any_position() {
        let flow = build(&[
            step("condition is true", &[("kind", "branch")]),
            step("then branch", &[]),
            step("condition is false", &[("kind", "branch")]),
        ]);

        assert_eq!(
            kinds(&flow),
            vec![Some(FlowKind::Branch), None, Some(FlowKind::Branch)]
        );
    }

    #[test]
    fn unknown_tags_and_values_are_ignored() {
        let flow = build(&[
            step("annotated", &[("phase", "bcp"), ("kind", "exception_handler")]),
            step("plain", &[("kind", "unknown_value")]),
        ]);

        assert_eq!(kinds(&flow), vec![None, None]);
    }

    #[test]
    fn last_recognized_tag_on_a_step_wins() {
        let flow = build(&[step(
            "doubly tagged",
            &[("kind", "branch"), ("kind", "procedure_end")],
        )]);

        assert_eq!(kinds(&flow), vec![Some(FlowKind::FunctionExit)]);
    }

    #[test]
    fn messages_and_locations_carry_through() {
        let flow = build(&[step("start of procedure main()", &[])]);

        let location = &flow.locations[0];
        assert_eq!(location.message, "start of procedure main()");
        assert!(location.physical_location.uri.ends_with("src/main.c"));
        assert_eq!(location.physical_location.region.start_line, 10);
        assert_eq!(location.physical_location.region.start_column, 1);
    }
}
