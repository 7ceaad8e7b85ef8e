pub mod build;
pub mod candidates;
pub mod diagnostics;
pub mod discover;
pub mod mutation;
pub mod operators;
pub mod output;
pub mod repo;
pub mod report;
pub mod resolve;
pub mod run;
pub mod source;

/// Suffix appended to renamed identifiers. Elements already carrying it are
/// never selected again, so repeated runs don't stack renames.
pub const MARKER_SUFFIX: &str = "_mt";

pub fn is_java_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("java"))
}
