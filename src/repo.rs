use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Keeps the working tree restorable across a run. Git repos are stashed up
/// front and hard-reset afterwards; anywhere else, every file registered via
/// `remember` is backed up in memory and written back on `restore`.
pub struct RepoManager {
    repo: PathBuf,
    is_git: bool,
    backups: HashMap<PathBuf, String>,
}

impl RepoManager {
    pub fn new(repo: &Path) -> RepoManager {
        RepoManager {
            repo: repo.to_path_buf(),
            is_git: repo.join(".git").is_dir(),
            backups: HashMap::new(),
        }
    }

    /// Park any pre-existing uncommitted work before we start editing.
    pub fn snapshot(&self) {
        if !self.is_git {
            return;
        }
        let _ = Command::new("git")
            .args(["stash", "push", "-u", "-k", "-m", "buildprobe-temp"])
            .current_dir(&self.repo)
            .status();
    }

    /// Register a file we are about to touch.
    pub fn remember(&mut self, file: &Path) {
        if self.is_git {
            return;
        }
        if file.is_file() && !self.backups.contains_key(file) {
            if let Ok(text) = std::fs::read_to_string(file) {
                self.backups.insert(file.to_path_buf(), text);
            }
        }
    }

    /// Undo every edit made since `snapshot`.
    pub fn restore(&mut self) {
        if self.is_git {
            let _ = Command::new("git")
                .args(["reset", "--hard"])
                .current_dir(&self.repo)
                .status();
            let _ = Command::new("git")
                .args(["stash", "pop"])
                .current_dir(&self.repo)
                .status();
        } else {
            for (file, text) in &self.backups {
                if file.exists() {
                    let _ = std::fs::write(file, text);
                }
            }
            self.backups.clear();
        }
    }
}
