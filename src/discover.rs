use std::fs;
use std::path::{Path, PathBuf};

const SKIP_DIRS: &[&str] = &[".git", ".gradle", "build", "out", "target", "node_modules"];

/// Find files under `root` whose repo-relative path matches `pattern`.
/// Build and metadata directories are never entered. Results are sorted so
/// candidate order is stable across runs.
pub fn find(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    walk(root, root, pattern, &mut matches);
    matches.sort();
    matches
}

fn walk(root: &Path, dir: &Path, pattern: &str, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if SKIP_DIRS.iter().any(|s| *s == name_str) {
                continue;
            }
            walk(root, &path, pattern, out);
        } else if file_type.is_file() {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel_str = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if glob_match(pattern, &rel_str) {
                out.push(path);
            }
        }
        // Symlinks and other special files are ignored.
    }
}

/// Minimal glob matcher: `**` spans any number of path segments, `*` and `?`
/// match within a single segment.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    let pat: Vec<&str> = pattern.split('/').collect();
    let segs: Vec<&str> = path.split('/').collect();
    match_segments(&pat, &segs)
}

fn match_segments(pat: &[&str], segs: &[&str]) -> bool {
    match pat.first() {
        None => segs.is_empty(),
        Some(&"**") => {
            if match_segments(&pat[1..], segs) {
                return true;
            }
            !segs.is_empty() && match_segments(pat, &segs[1..])
        }
        Some(first) => {
            !segs.is_empty()
                && match_segment(first, segs[0])
                && match_segments(&pat[1..], &segs[1..])
        }
    }
}

fn match_segment(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = ti;
            pi += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            mark += 1;
            ti = mark;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
