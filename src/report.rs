use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::build::BuildResult;
use crate::run::RunOutcome;

/// The structured record emitted once per run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub repo: String,
    pub operation: String,
    pub target_file: String,
    pub mutation: MutationRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_build: Option<BuildRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutated_build: Option<BuildRecord>,
    pub buildability_preserved: bool,
    pub verdict: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MutationRecord {
    pub file: String,
    pub old: Option<String>,
    pub new: Option<String>,
    pub changed: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub diff: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildRecord {
    pub success: bool,
    pub exit_code: i32,
    pub cmd: Vec<String>,
    pub stdout_head: String,
    pub stderr_head: String,
}

impl BuildRecord {
    pub fn from_build(build: &BuildResult, lines: usize) -> BuildRecord {
        BuildRecord {
            success: build.success,
            exit_code: build.exit_code,
            cmd: build.cmd.clone(),
            stdout_head: head(&build.stdout, lines),
            stderr_head: head(&build.stderr, lines),
        }
    }
}

/// First `n` lines of captured output; reports stay bounded no matter how
/// chatty the build was.
pub fn head(text: &str, n: usize) -> String {
    text.lines().take(n).collect::<Vec<_>>().join("\n")
}

fn relative_to(repo: &Path, file: &Path) -> String {
    file.strip_prefix(repo)
        .unwrap_or(file)
        .display()
        .to_string()
}

pub fn from_outcome(
    repo: &Path,
    operation: &str,
    outcome: &RunOutcome,
    diagnostics_lines: usize,
) -> RunReport {
    let target_file = outcome
        .target
        .as_ref()
        .map(|t| relative_to(repo, t))
        .unwrap_or_default();
    let mutation = match &outcome.mutation {
        Some(m) => MutationRecord {
            file: relative_to(repo, &m.file),
            old: m.old_name.clone(),
            new: m.new_name.clone(),
            changed: m.changed,
            diff: m.diff.clone(),
        },
        None => MutationRecord {
            file: target_file.clone(),
            old: None,
            new: None,
            changed: false,
            diff: String::new(),
        },
    };
    RunReport {
        repo: repo.display().to_string(),
        operation: operation.to_string(),
        target_file,
        mutation,
        baseline_build: Some(BuildRecord::from_build(&outcome.baseline, diagnostics_lines)),
        mutated_build: outcome
            .mutated
            .as_ref()
            .map(|b| BuildRecord::from_build(b, diagnostics_lines)),
        buildability_preserved: outcome.verdict.buildability_preserved(),
        verdict: outcome.verdict.as_str().to_string(),
    }
}

/// Report for a run that never got to a baseline build (no files matched).
pub fn empty(repo: &Path, operation: &str) -> RunReport {
    RunReport {
        repo: repo.display().to_string(),
        operation: operation.to_string(),
        target_file: String::new(),
        mutation: MutationRecord {
            file: String::new(),
            old: None,
            new: None,
            changed: false,
            diff: String::new(),
        },
        baseline_build: None,
        mutated_build: None,
        buildability_preserved: true,
        verdict: "no_mutation".to_string(),
    }
}

pub fn write(path: &Path, report: &RunReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}
