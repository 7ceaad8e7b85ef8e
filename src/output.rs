use console::Style;
use std::path::Path;

use crate::build::BuildResult;
use crate::mutation::MutationResult;
use crate::report;

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_warn(msg: &str) {
    let style = Style::new().yellow().bold();
    println!("{} {}", style.apply_to("!"), msg);
}

pub fn print_heading(msg: &str) {
    let style = Style::new().bold();
    println!("\n== {} ==", style.apply_to(msg));
}

pub fn print_build(build: &BuildResult, lines: usize) {
    println!("{}", build.summary());
    let dim = Style::new().dim();
    let out_head = report::head(&build.stdout, lines);
    if !out_head.is_empty() {
        println!("---- STDOUT ----");
        println!("{}", dim.apply_to(out_head));
    }
    let err_head = report::head(&build.stderr, lines);
    if !err_head.is_empty() {
        println!("---- STDERR ----");
        println!("{}", dim.apply_to(err_head));
    }
}

pub fn print_mutation(verb: &str, result: &MutationResult, repo: &Path) {
    let rel = result.file.strip_prefix(repo).unwrap_or(&result.file);
    let change = match (&result.old_name, &result.new_name) {
        (None, None) => String::new(),
        (old, new) => format!(
            ": {} -> {}",
            old.as_deref().unwrap_or("-"),
            new.as_deref().unwrap_or("-")
        ),
    };
    println!("{} in {}{}", verb, rel.display(), change);

    for line in result.diff.lines() {
        if line.starts_with('-') {
            let del = Style::new().red();
            println!("  {}", del.apply_to(line));
        } else if line.starts_with('+') {
            let add = Style::new().green();
            println!("  {}", add.apply_to(line));
        }
    }
}
