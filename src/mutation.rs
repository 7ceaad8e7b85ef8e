use std::path::{Path, PathBuf};

/// Outcome of one operator invocation on one file. `changed = false` means
/// no eligible candidate existed; the caller moves on to the next file.
#[derive(Debug, Clone)]
pub struct MutationResult {
    pub file: PathBuf,
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub changed: bool,
    pub diff: String,
}

impl MutationResult {
    pub fn unchanged(file: &Path) -> MutationResult {
        MutationResult {
            file: file.to_path_buf(),
            old_name: None,
            new_name: None,
            changed: false,
            diff: String::new(),
        }
    }
}

pub fn generate_diff(original: &str, mutated: &str) -> String {
    use similar::TextDiff;
    let diff = TextDiff::from_lines(original, mutated);
    let mut output = String::new();
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                output.push_str(&format!("- {}", change));
            }
            similar::ChangeTag::Insert => {
                output.push_str(&format!("+ {}", change));
            }
            _ => {}
        }
    }
    output
}
