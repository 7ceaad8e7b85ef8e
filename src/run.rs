use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::build::{self, BuildResult};
use crate::candidates::PickPolicy;
use crate::mutation::MutationResult;
use crate::operators::{self, Operation};
use crate::output;
use crate::repo::RepoManager;

/// Final classification of one run. Exactly one is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    BaselineFailed,
    NoMutation,
    Ok,
    MutatedBuildFailed,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::BaselineFailed => "baseline_failed",
            Verdict::NoMutation => "no_mutation",
            Verdict::Ok => "ok",
            Verdict::MutatedBuildFailed => "mutated_build_failed",
        }
    }

    pub fn buildability_preserved(self) -> bool {
        matches!(self, Verdict::Ok | Verdict::NoMutation)
    }
}

pub struct RunConfig {
    pub operation: Operation,
    pub pick: PickPolicy,
    pub limit: usize,
    pub skip_tests: bool,
    pub build_timeout: Duration,
    pub diagnostics_lines: usize,
}

pub struct RunOutcome {
    pub verdict: Verdict,
    pub target: Option<PathBuf>,
    pub mutation: Option<MutationResult>,
    pub baseline: BuildResult,
    pub mutated: Option<BuildResult>,
}

/// Baseline build, then up to `limit` mutation attempts, then the mutated
/// build for the first attempt that actually edits a file. A failed baseline
/// aborts before any mutation so a pre-existing breakage is never blamed on
/// the mutation. Detection errors are the only hard failures.
pub fn run(
    repo: &Path,
    files: &[PathBuf],
    cfg: &RunConfig,
    manager: &mut RepoManager,
) -> Result<RunOutcome, String> {
    output::print_heading("Baseline build (pre-mutation)");
    let baseline = build::run_build(repo, cfg.skip_tests, cfg.build_timeout)?;
    output::print_build(&baseline, cfg.diagnostics_lines);

    if !baseline.success {
        return Ok(RunOutcome {
            verdict: Verdict::BaselineFailed,
            target: None,
            mutation: None,
            baseline,
            mutated: None,
        });
    }

    let attempted = files.len().min(cfg.limit);
    for target in files.iter().take(cfg.limit) {
        manager.remember(target);

        let result = match operators::apply(cfg.operation, target, &cfg.pick) {
            Ok(result) => result,
            Err(e) => {
                output::print_error(&format!("Failed to mutate {}: {}", target.display(), e));
                continue;
            }
        };
        if !result.changed {
            let rel = target.strip_prefix(repo).unwrap_or(target);
            println!(
                "No suitable {} found in {} — trying next file…",
                cfg.operation.label(),
                rel.display()
            );
            continue;
        }

        output::print_mutation(cfg.operation.verb(), &result, repo);

        output::print_heading("Mutated build (post-mutation)");
        let mutated = build::run_build(repo, cfg.skip_tests, cfg.build_timeout)?;
        output::print_build(&mutated, cfg.diagnostics_lines);

        let verdict = if mutated.success {
            Verdict::Ok
        } else {
            Verdict::MutatedBuildFailed
        };
        return Ok(RunOutcome {
            verdict,
            target: Some(target.clone()),
            mutation: Some(result),
            baseline,
            mutated: Some(mutated),
        });
    }

    println!(
        "Tried {} file(s), no suitable {} found.",
        attempted,
        cfg.operation.label()
    );
    let first = files.first().cloned();
    Ok(RunOutcome {
        verdict: Verdict::NoMutation,
        mutation: first.as_deref().map(MutationResult::unchanged),
        target: first,
        baseline,
        mutated: None,
    })
}
