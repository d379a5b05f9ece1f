//! Wire types and message builders for the stdin/stdout hook protocol.
//!
//! Each hook invocation reads one JSON document from stdin and writes one
//! JSON document to stdout. Output keys use `camelCase` for compatibility
//! with the assistant host.

use crate::marker::PendingSkill;
use serde::{Deserialize, Serialize};

/// Hook event payload. Only the fields the hooks consume are modeled;
/// everything else in the host payload is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    /// Tool invocation parameters (PostToolUse events).
    #[serde(default)]
    pub tool_input: ToolInput,
    /// The user's message (UserPromptSubmit events).
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    /// Name of the invoked skill, possibly namespaced.
    #[serde(default)]
    pub skill: String,
}

/// No-op response: `{}`.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// Acknowledgment shown to the user (`systemMessage` key).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMessage {
    pub system_message: String,
}

/// Follow-up instruction fed back to the model as additional context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOutput {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub additional_context: String,
}

impl ContextOutput {
    pub fn for_prompt_submit(additional_context: String) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: "UserPromptSubmit".to_string(),
                additional_context,
            },
        }
    }
}

/// Fixed format every learning summary file must follow.
const LEARNING_FORMAT: &str = "# Learning: [Brief title of what was learned]\n\n\
    ## DO\n\
    - [Specific actionable advice to follow]\n\
    - [Another do item]\n\n\
    ## DON'T\n\
    - [Specific pitfalls to avoid]\n\
    - [Another don't item]\n\n\
    ## Context\n\
    [Brief explanation of the situation and what led to these learnings]";

/// Acknowledgment emitted by the recorder after a skill use is stored.
pub fn record_message(skill_name: &str, pending: usize) -> String {
    format!(
        "Skill '{skill_name}' recorded for a learning summary \
         ({pending} pending this session)."
    )
}

/// Instruction emitted by the trigger once a satisfaction phrase consumes
/// the store: one line per pending skill, then the summary format.
pub fn trigger_instruction(pending: &[PendingSkill]) -> String {
    let names = pending
        .iter()
        .map(|p| format!("'{}'", p.display_name()))
        .collect::<Vec<_>>()
        .join(", ");
    let targets = pending
        .iter()
        .map(|p| format!("- '{}' -> {}", p.display_name(), p.learnings_path))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The user has indicated satisfaction. {} skill(s) pending: {names}.\n\n\
         NOW CREATE LEARNING SUMMARIES for each skill:\n{targets}\n\n\
         For EACH skill, create the learnings directory if needed, then write \
         a file with this format:\n\n```markdown\n{LEARNING_FORMAT}\n```\n\n\
         Base each learning on what was accomplished with that specific skill.",
        pending.len()
    )
}

/// Message emitted by cleanup when unconsumed entries are discarded.
pub fn cleanup_message(pending: &[PendingSkill]) -> String {
    let names = pending
        .iter()
        .map(|p| p.display_name().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Session ended with {} pending skill learning(s) ({names}). \
         Marker file cleaned up.",
        pending.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_tolerates_missing_fields() {
        let input: HookInput = serde_json::from_str("{}").unwrap();
        assert!(input.tool_input.skill.is_empty());
        assert!(input.prompt.is_empty());
    }

    #[test]
    fn input_reads_nested_skill() {
        let input: HookInput =
            serde_json::from_str(r#"{"tool_input": {"skill": "suite:pdf", "args": {}}}"#)
                .unwrap();
        assert_eq!(input.tool_input.skill, "suite:pdf");
    }

    #[test]
    fn system_message_uses_camel_case_key() {
        let json = serde_json::to_string(&SystemMessage {
            system_message: "hi".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"systemMessage":"hi"}"#);
    }

    #[test]
    fn context_output_shape() {
        let json = serde_json::to_value(ContextOutput::for_prompt_submit("ctx".into())).unwrap();
        assert_eq!(
            json["hookSpecificOutput"]["hookEventName"],
            "UserPromptSubmit"
        );
        assert_eq!(json["hookSpecificOutput"]["additionalContext"], "ctx");
    }

    #[test]
    fn trigger_instruction_lists_every_entry() {
        let pending = vec![PendingSkill::new("a:x"), PendingSkill::new("y")];
        let text = trigger_instruction(&pending);
        assert!(text.contains("2 skill(s) pending"));
        assert!(text.contains("- 'a:x' -> .claude/skills/x/learnings/"));
        assert!(text.contains("- 'y' -> .claude/skills/y/learnings/"));
        assert!(text.contains("## DO"));
        assert!(text.contains("## DON'T"));
        assert!(text.contains("## Context"));
    }

    #[test]
    fn cleanup_message_names_skills_and_count() {
        let pending = vec![PendingSkill::new("pdf"), PendingSkill::new("csv")];
        let text = cleanup_message(&pending);
        assert!(text.contains("2 pending skill learning(s)"));
        assert!(text.contains("pdf, csv"));
    }
}
