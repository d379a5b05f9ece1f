//! The three session lifecycle hooks. Each reads one JSON document from
//! stdin and writes one JSON document to stdout; diagnostics never touch
//! stdout, which belongs to the host protocol.

use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use skillkit_core::hook::{self, ContextOutput, Empty, HookInput, SystemMessage};
use skillkit_core::marker::MarkerStore;
use skillkit_core::phrases;
use std::path::Path;

#[derive(Subcommand)]
pub enum HookSubcommand {
    /// PostToolUse: record a skill use pending a learning summary
    Record,
    /// UserPromptSubmit: fire learning summaries on a satisfaction phrase
    Trigger,
    /// SessionEnd: discard any unconsumed pending entries
    Cleanup,
}

pub fn run(subcommand: HookSubcommand, marker: Option<&Path>) -> anyhow::Result<i32> {
    let store = resolve_store(marker)?;
    match subcommand {
        HookSubcommand::Record => record(&store),
        HookSubcommand::Trigger => trigger(&store),
        HookSubcommand::Cleanup => cleanup(&store),
    }
}

fn resolve_store(marker: Option<&Path>) -> anyhow::Result<MarkerStore> {
    match marker {
        Some(path) => Ok(MarkerStore::at(path)),
        None => MarkerStore::default_location().context("failed to resolve marker path"),
    }
}

/// Parse the hook payload from stdin. Malformed JSON yields `None`.
fn read_input() -> Option<HookInput> {
    serde_json::from_reader(std::io::stdin().lock()).ok()
}

fn record(store: &MarkerStore) -> anyhow::Result<i32> {
    // Malformed payload: nothing to record, exit quietly.
    let Some(input) = read_input() else {
        return Ok(0);
    };

    let skill = input.tool_input.skill.trim();
    if skill.is_empty() {
        print_json(&Empty {})?;
        return Ok(0);
    }

    let outcome = store
        .record(skill)
        .with_context(|| format!("failed to update marker at {}", store.path().display()))?;
    print_json(&SystemMessage {
        system_message: hook::record_message(skill, outcome.pending()),
    })?;
    Ok(0)
}

fn trigger(store: &MarkerStore) -> anyhow::Result<i32> {
    // The trigger is the one hook that refuses malformed input outright.
    let Some(input) = read_input() else {
        return Ok(1);
    };

    if !store.path().exists() {
        print_json(&Empty {})?;
        return Ok(0);
    }

    if input.prompt.is_empty() || !phrases::contains_satisfaction(&input.prompt) {
        print_json(&Empty {})?;
        return Ok(0);
    }

    // Unreadable or empty store: no-op, and leave whatever is on disk alone.
    if store.load().is_empty() {
        print_json(&Empty {})?;
        return Ok(0);
    }

    // One-shot consumption: the same entries can never trigger twice.
    let pending = store
        .take()
        .with_context(|| format!("failed to consume marker at {}", store.path().display()))?;
    print_json(&ContextOutput::for_prompt_submit(hook::trigger_instruction(
        &pending,
    )))?;
    Ok(0)
}

fn cleanup(store: &MarkerStore) -> anyhow::Result<i32> {
    // Payload content is unused; malformed JSON is tolerated here.
    let _ = read_input();

    if !store.path().exists() {
        print_json(&Empty {})?;
        return Ok(0);
    }

    let pending = store
        .take()
        .with_context(|| format!("failed to clear marker at {}", store.path().display()))?;
    if pending.is_empty() {
        print_json(&Empty {})?;
    } else {
        print_json(&SystemMessage {
            system_message: hook::cleanup_message(&pending),
        })?;
    }
    Ok(0)
}
