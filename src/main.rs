use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use buildprobe::candidates::PickPolicy;
use buildprobe::operators::Operation;
use buildprobe::repo::RepoManager;
use buildprobe::run::{RunConfig, Verdict};
use buildprobe::{diagnostics, discover, output, report, run};

#[derive(Parser)]
#[command(
    name = "buildprobe",
    version,
    about = "Probe whether a single code mutation keeps a repository buildable"
)]
struct Cli {
    /// Repository to mutate
    repo: PathBuf,

    /// Mutation operator to apply
    #[arg(long, value_enum, default_value_t = Operation::RenameLocal)]
    operation: Operation,

    /// Candidate-file glob relative to the repo root (default: src/main/**/*.java)
    #[arg(long)]
    file_glob: Option<String>,

    /// Also search test sources
    #[arg(long)]
    include_tests: bool,

    /// Try at most this many candidate files
    #[arg(long, default_value_t = 1)]
    limit: usize,

    /// 0-based candidate index, clamped; takes precedence over --random-seed
    #[arg(long)]
    pick_index: Option<usize>,

    /// Seed for deterministic random candidate selection
    #[arg(long)]
    random_seed: Option<u64>,

    /// Build timeout in seconds
    #[arg(long, default_value_t = 1800)]
    build_timeout: u64,

    /// Run the project's tests during the builds (skipped by default)
    #[arg(long)]
    with_tests: bool,

    /// Leave the mutation on disk after the run
    #[arg(long)]
    keep_mutation: bool,

    /// Write the run report as JSON to this path
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Lines of captured build output kept in the report
    #[arg(long, default_value_t = 50)]
    diagnostics_lines: usize,

    /// Exit non-zero when the mutated build fails
    #[arg(long)]
    fail_on_build: bool,
}

fn main() {
    let cli = Cli::parse();
    process::exit(run_cli(cli));
}

fn run_cli(cli: Cli) -> i32 {
    if !cli.repo.is_dir() {
        output::print_error(&format!("Repo path not found: {}", cli.repo.display()));
        return 2;
    }
    let repo = cli.repo.canonicalize().unwrap_or_else(|_| cli.repo.clone());

    let patterns = match &cli.file_glob {
        Some(glob) => vec![glob.clone()],
        None => {
            let mut patterns = vec!["src/main/**/*.java".to_string()];
            if cli.include_tests {
                patterns.push("src/test/**/*.java".to_string());
            }
            patterns
        }
    };
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in &patterns {
        for file in discover::find(&repo, pattern) {
            if !files.contains(&file) {
                files.push(file);
            }
        }
    }

    if files.is_empty() {
        println!("No files matched.");
        if let Some(path) = &cli.json_out {
            let empty = report::empty(&repo, cli.operation.as_str());
            write_report(path, &empty);
        }
        return 1;
    }

    let mut manager = RepoManager::new(&repo);
    manager.snapshot();

    let cfg = RunConfig {
        operation: cli.operation,
        pick: PickPolicy {
            index: cli.pick_index,
            seed: cli.random_seed,
        },
        limit: cli.limit.max(1),
        skip_tests: !cli.with_tests,
        build_timeout: Duration::from_secs(cli.build_timeout),
        diagnostics_lines: cli.diagnostics_lines,
    };

    let code = match run::run(&repo, &files, &cfg, &mut manager) {
        Err(e) => {
            output::print_error(&e);
            2
        }
        Ok(outcome) => {
            // Diagnostics must render while the mutation is still on disk.
            if outcome.verdict == Verdict::MutatedBuildFailed {
                if let (Some(mutated), Some(mutation)) = (&outcome.mutated, &outcome.mutation) {
                    println!("\n{}", diagnostics::explain(mutated, mutation));
                }
            }
            if let Some(path) = &cli.json_out {
                let record = report::from_outcome(
                    &repo,
                    cli.operation.as_str(),
                    &outcome,
                    cli.diagnostics_lines,
                );
                write_report(path, &record);
            }
            match outcome.verdict {
                Verdict::BaselineFailed => {
                    output::print_error(
                        "Baseline build failed. Aborting mutation to avoid false signals.",
                    );
                    2
                }
                Verdict::NoMutation => 0,
                Verdict::Ok => {
                    output::print_success("Buildability preserved after mutation.");
                    0
                }
                Verdict::MutatedBuildFailed => {
                    output::print_warn("Mutation caused a build failure.");
                    if cli.fail_on_build { 1 } else { 0 }
                }
            }
        }
    };

    if cli.keep_mutation {
        output::print_warn("--keep-mutation set: leaving changes on disk.");
    } else {
        manager.restore();
    }

    code
}

fn write_report(path: &PathBuf, record: &report::RunReport) {
    match report::write(path, record) {
        Ok(()) => println!("Wrote report JSON → {}", path.display()),
        Err(e) => output::print_error(&format!(
            "Failed to write report {}: {}",
            path.display(),
            e
        )),
    }
}
