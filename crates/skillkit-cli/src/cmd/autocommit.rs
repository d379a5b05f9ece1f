//! Periodic sync of the skills repo: stash local changes, rebase on the
//! remote, resolve stash-pop conflicts with a headless assistant run when
//! needed, then commit and push.

use chrono::Utc;
use skillkit_core::git::Git;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Hard cap on the conflict-resolution agent run.
const AGENT_TIMEOUT: Duration = Duration::from_secs(120);

pub fn run(root: &Path) -> anyhow::Result<i32> {
    let git = Git::open(root)?;

    let local_changes = git.has_changes()?;
    let mut did_stash = false;

    if local_changes {
        did_stash = stash_local_changes(&git)?;
    }

    // Always rebase on the remote to stay in sync.
    let pull_ok = pull_rebase(&git)?;
    if !pull_ok && did_stash {
        tracing::warn!("rebase failed, recovering stash");
        let _ = git.run(&["stash", "pop"])?;
        did_stash = false;
    }

    if did_stash && !pop_stash(&git)? && !git.conflict_files()?.is_empty() {
        // Conflicts from the stash pop — hand them to the agent.
        if !resolve_conflicts_with_agent(&git)? {
            tracing::error!("could not resolve conflicts; dropping stash and keeping remote state");
            let _ = git.run(&["checkout", "--", "."])?;
            let _ = git.run(&["clean", "-fd"])?;
            // The stash is already (partially) applied, drop it.
            let _ = git.run(&["stash", "drop"])?;
            return Ok(1);
        }
    }

    if !git.has_changes()? {
        println!("No changes to commit after sync.");
        return Ok(0);
    }

    commit_and_push(&git)
}

/// Stash local changes. Returns true if something was stashed.
fn stash_local_changes(git: &Git) -> anyhow::Result<bool> {
    let out = git.run_ok(&["stash", "push", "-m", "auto-sync-stash", "--include-untracked"])?;
    // git reports "No local changes to save" when there was nothing to stash.
    let stashed = !out.stdout.contains("No local changes to save");
    if stashed {
        println!("Stashed local changes.");
    }
    Ok(stashed)
}

/// Pull with rebase. On failure the rebase is aborted so the tree is clean.
fn pull_rebase(git: &Git) -> anyhow::Result<bool> {
    let out = git.run(&["pull", "--rebase", "--autostash"])?;
    if !out.success {
        tracing::warn!("git pull --rebase failed: {}", out.stderr.trim());
        let lower = out.stderr.to_lowercase();
        if lower.contains("rebase") || lower.contains("conflict") {
            let _ = git.run(&["rebase", "--abort"])?;
        }
        return Ok(false);
    }
    println!("Pulled and rebased successfully.");
    Ok(true)
}

/// Pop the stash. Returns false on conflicts or failure.
fn pop_stash(git: &Git) -> anyhow::Result<bool> {
    let out = git.run(&["stash", "pop"])?;
    if !out.success {
        if out.stdout.to_lowercase().contains("conflict")
            || out.stderr.to_lowercase().contains("conflict")
        {
            tracing::warn!("stash pop produced conflicts");
        } else {
            tracing::error!("git stash pop failed: {}", out.stderr.trim());
        }
        return Ok(false);
    }
    println!("Popped stash successfully.");
    Ok(true)
}

/// Stage everything, commit with a timestamped message, push.
fn commit_and_push(git: &Git) -> anyhow::Result<i32> {
    git.run_ok(&["add", "-A"])?;

    // Anything actually staged?
    let staged = git.run(&["diff", "--cached", "--quiet"])?;
    if staged.success {
        println!("Nothing staged after git add, nothing to commit.");
        return Ok(0);
    }

    let message = format!("auto-sync: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    // Skip hooks — this is automated sync of symlinked content.
    git.run_ok(&["commit", "-m", &message, "--no-verify"])?;
    println!("Committed: {message}");

    git.run_ok(&["push"])?;
    println!("Pushed to origin.");
    Ok(0)
}

/// Run the assistant CLI headlessly to resolve stash-pop conflicts.
/// Returns true when no conflicts remain afterwards.
fn resolve_conflicts_with_agent(git: &Git) -> anyhow::Result<bool> {
    let conflict_files = git.conflict_files()?;
    if conflict_files.is_empty() {
        return Ok(true);
    }
    if which::which("claude").is_err() {
        tracing::error!("claude CLI not found on PATH; cannot resolve conflicts");
        return Ok(false);
    }

    let files_list = conflict_files
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "You are resolving merge conflicts in an auto-synced skills/config \
         repository. The following files have conflicts:\n{files_list}\n\n\
         For each conflicted file:\n\
         1. Read the file to understand both sides of the conflict\n\
         2. Resolve the conflict by keeping the most complete/recent version, \
         or merging both sides when they touch different parts\n\
         3. Remove all conflict markers (<<<<<<, ======, >>>>>>)\n\
         4. Stage the resolved file with git add\n\n\
         This is an automated sync - prefer keeping all content from both \
         sides when possible. If in doubt, prefer the incoming (remote) changes."
    );

    println!(
        "Invoking agent to resolve conflicts in: {}",
        conflict_files.join(", ")
    );

    let mut child = Command::new("claude")
        .args(["-p", "--dangerously-skip-permissions", "--model", "haiku"])
        .arg(&prompt)
        .current_dir(git.root())
        // Unset CLAUDECODE so the agent runs even from within a session.
        .env("CLAUDECODE", "")
        .stdin(Stdio::null())
        // Discard output rather than pipe it: nobody drains the pipe during
        // the wait loop, and a chatty agent would deadlock against it.
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() > AGENT_TIMEOUT {
            tracing::error!("agent timed out after {}s", AGENT_TIMEOUT.as_secs());
            let _ = child.kill();
            let _ = child.wait();
            return Ok(false);
        }
        std::thread::sleep(Duration::from_millis(250));
    };

    if !status.success() {
        tracing::error!("agent exited with {status}");
        return Ok(false);
    }

    // Verify nothing is left unresolved.
    Ok(git.conflict_files()?.is_empty())
}
