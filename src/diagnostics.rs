use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};

use crate::build::BuildResult;
use crate::mutation::MutationResult;

/// Lines of surrounding source shown per error.
const SNIPPET_CONTEXT: usize = 2;
/// How much raw output to keep when nothing parses.
const TAIL_CHARS: usize = 2000;

/// One structured compiler error. `file` is populated only when the printed
/// path exists locally at analysis time; `column` only when the compiler
/// printed a caret marker.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
    pub raw: String,
}

/// Parse classic javac-format errors, which Gradle and Maven forward:
///
/// ```text
/// /path/App.java:7: error: cannot find symbol
///     System.out.println(count);
///                        ^
/// ```
pub fn parse_javac(text: &str) -> Vec<CompileError> {
    let head = Regex::new(r"^(.+\.java):(\d+):\s+(?:error|warning):\s+(.*)$")
        .expect("valid header pattern");

    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(caps) = head.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let path = caps[1].to_string();
        let line = caps[2].parse::<usize>().ok();
        let message = caps[3].to_string();

        let mut column = None;
        let mut raw = lines[i].to_string();

        // A source excerpt plus caret line may follow the header.
        if i + 2 < lines.len() {
            let code_line = lines[i + 1];
            let caret_line = lines[i + 2];
            if let Some(caret_idx) = caret_line.find('^') {
                column = Some(caret_idx + 1);
                raw.push('\n');
                raw.push_str(code_line);
                raw.push('\n');
                raw.push_str(caret_line);
                i += 3;
            } else {
                i += 1;
            }
        } else {
            i += 1;
        }

        let candidate = Path::new(&path);
        out.push(CompileError {
            file: candidate.exists().then(|| candidate.to_path_buf()),
            line,
            column,
            message,
            raw,
        });
    }
    out
}

/// Render a fixed window of source around an error line: numbered lines, a
/// `>>` marker on the faulting line, a caret under the column, and the
/// mutation name bracketed where it occurs on the faulting line.
pub fn render_snippet(
    file: &Path,
    line: Option<usize>,
    column: Option<usize>,
    highlight: Option<&str>,
) -> String {
    let Some(line) = line.filter(|l| *l > 0) else {
        return "(no local source to show)".to_string();
    };
    let Ok(content) = std::fs::read_to_string(file) else {
        return "(no local source to show)".to_string();
    };
    let all: Vec<&str> = content.lines().collect();
    let idx = line - 1;
    if idx >= all.len() {
        return "(no local source to show)".to_string();
    }

    let from = idx.saturating_sub(SNIPPET_CONTEXT);
    let to = (idx + SNIPPET_CONTEXT).min(all.len() - 1);

    let mut out = String::new();
    for ln in from..=to {
        let mark = if ln == idx { ">>" } else { "  " };
        let mut text = all[ln].to_string();
        if ln == idx {
            if let Some(name) = highlight.filter(|n| !n.is_empty()) {
                if let Ok(word) = word_pattern(name) {
                    text = word
                        .replace_all(&text, NoExpand(&format!("«{name}»")))
                        .into_owned();
                }
            }
        }
        out.push_str(&format!("{} {:>4} | {}\n", mark, ln + 1, text));
        if ln == idx {
            if let Some(col) = column.filter(|c| *c > 0) {
                out.push_str(&format!("   ____| {}^\n", " ".repeat(col - 1)));
            }
        }
    }
    out.trim_end().to_string()
}

fn word_pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}\b", regex::escape(name)))
}

fn mentions_word(text: &str, name: &str) -> bool {
    word_pattern(name).map(|re| re.is_match(text)).unwrap_or(false)
}

fn tail(text: &str, n: usize) -> &str {
    if text.len() <= n {
        return text;
    }
    let mut start = text.len() - n;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

/// Build a failure report from a failed build: parsed errors with snippets,
/// plus best-effort hints correlating the failure with the mutation. The
/// hints are advisory text only; they never change the verdict.
pub fn explain(build: &BuildResult, mutation: &MutationResult) -> String {
    let combined = format!("{}\n{}", build.stdout, build.stderr);
    let errors = parse_javac(&combined);

    if errors.is_empty() {
        return format!(
            "=== Failure diagnostics ===\n\
             (No structured compiler errors found. Showing tail of output)\n\n\
             ---- LAST {} CHARS ----\n{}",
            TAIL_CHARS,
            tail(&combined, TAIL_CHARS)
        );
    }

    let mut out = String::new();
    out.push_str("=== Failure diagnostics ===\n");
    out.push_str(&format!("Parsed {} compile error(s):\n\n", errors.len()));

    for (idx, error) in errors.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", idx, error.message));
        out.push_str(&format!(
            "File: {}  Line: {}  Col: {}\n",
            error
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_else(|| "(unknown)".to_string()),
            error.line.map(|l| l.to_string()).unwrap_or_else(|| "?".to_string()),
            error.column.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
        ));
        if let Some(file) = &error.file {
            let highlight = mutation.old_name.as_deref().or(mutation.new_name.as_deref());
            out.push('\n');
            out.push_str(&render_snippet(file, error.line, error.column, highlight));
            out.push('\n');
        }
        out.push('\n');
    }

    if let Some(old) = mutation.old_name.as_deref().filter(|o| !o.is_empty()) {
        if combined.contains("cannot find symbol") {
            let new = mutation.new_name.as_deref().unwrap_or("");
            let mentions_old = mentions_word(&combined, old);
            let mentions_new = !new.is_empty() && mentions_word(&combined, new);

            out.push_str("Hints:\n");
            if mentions_old && !mentions_new {
                out.push_str(&format!(
                    "* Looks like references to '{old}' remain but the declaration was renamed to '{new}'.\n"
                ));
                out.push_str(
                    "  The reference is probably outside the renamer's scope (lambda or inner class), or symbol resolution failed.\n",
                );
            } else if mentions_new {
                out.push_str(&format!(
                    "* The new name '{new}' appears in errors; check for shadowing or a name clash in the same scope.\n"
                ));
            } else {
                out.push_str(
                    "* The rename likely triggered a type or flow issue not directly mentioning the identifier. Inspect the snippets above.\n",
                );
            }
        }
    }

    out.trim_end().to_string()
}
