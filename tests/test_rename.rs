use std::path::{Path, PathBuf};

use buildprobe::candidates::PickPolicy;
use buildprobe::operators::{self, Operation};
use tempfile::TempDir;

fn write_java(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

fn apply_at(op: Operation, file: &Path, index: usize) -> buildprobe::mutation::MutationResult {
    let policy = PickPolicy { index: Some(index), seed: None };
    operators::apply(op, file, &policy).unwrap()
}

// --- locals: identity resolution ---

#[test]
fn sibling_blocks_with_same_name_stay_disjoint() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    void m() {
        {
            int x = 1;
            use(x);
        }
        {
            int x = 2;
            use(x);
        }
    }
}
"#,
    );
    let result = apply_at(Operation::RenameLocal, &file, 0);
    assert_eq!(result.old_name.as_deref(), Some("x"));

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int x_mt = 1;"));
    assert!(mutated.contains("use(x_mt);"));
    // The sibling block's declaration and usage are untouched.
    assert!(mutated.contains("int x = 2;"));
    assert!(mutated.contains("use(x);"));
}

#[test]
fn second_sibling_selected_leaves_first_alone() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    void m() {
        {
            int x = 1;
            use(x);
        }
        {
            int x = 2;
            use(x);
        }
    }
}
"#,
    );
    apply_at(Operation::RenameLocal, &file, 1);

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int x = 1;"));
    assert!(mutated.contains("int x_mt = 2;"));
}

#[test]
fn inner_shadowing_declaration_is_not_renamed_with_outer() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    void m() {
        int value = 1;
        use(value);
        while (true) {
            long value = 2L;
            use(value);
        }
    }
}
"#,
    );
    // index 0 picks the outer declaration
    apply_at(Operation::RenameLocal, &file, 0);

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int value_mt = 1;"));
    assert!(mutated.contains("use(value_mt);"));
    assert!(mutated.contains("long value = 2L;"));
    assert!(mutated.contains("use(value);"));
}

#[test]
fn field_with_same_name_is_untouched() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    int total = 0;
    void m() {
        int total = 1;
        use(total);
    }
    int read() { return this.total; }
}
"#,
    );
    apply_at(Operation::RenameLocal, &file, 0);

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int total_mt = 1;"));
    assert!(mutated.contains("use(total_mt);"));
    assert!(mutated.contains("int total = 0;"));
    assert!(mutated.contains("return this.total;"));
}

// --- parameters ---

#[test]
fn method_parameter_renamed_with_body_usages() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        "class A { int twice(int amount) { return amount + amount; } }",
    );
    let result = apply_at(Operation::RenameParam, &file, 0);
    assert_eq!(result.old_name.as_deref(), Some("amount"));
    assert_eq!(result.new_name.as_deref(), Some("amount_mt"));

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int twice(int amount_mt)"));
    assert!(mutated.contains("return amount_mt + amount_mt;"));
}

#[test]
fn parameter_rename_keeps_other_methods_intact() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    int f(int n) { return n + 1; }
    int g(int n) { return n - 1; }
}
"#,
    );
    apply_at(Operation::RenameParam, &file, 0);

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int f(int n_mt) { return n_mt + 1; }"));
    assert!(mutated.contains("int g(int n) { return n - 1; }"));
}

#[test]
fn lambda_parameter_renamed_only_inside_lambda_body() {
    let dir = TempDir::new().unwrap();
    // The lambda parameter shares its name with a field captured via `this`;
    // only the lambda body occurrences may change.
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    int value = 10;
    java.util.function.IntUnaryOperator op = value -> value + this.value;
    int read() { return value; }
}
"#,
    );
    let result = apply_at(Operation::RenameParam, &file, 0);
    assert_eq!(result.old_name.as_deref(), Some("value"));

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("value_mt -> value_mt + this.value;"));
    assert!(mutated.contains("int value = 10;"));
    assert!(mutated.contains("return value;"));
}

#[test]
fn lambda_block_body_renames_all_occurrences_within() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    java.util.function.IntUnaryOperator op = n -> {
        int doubled = n + n;
        return doubled;
    };
}
"#,
    );
    let result = apply_at(Operation::RenameParam, &file, 0);
    assert_eq!(result.old_name.as_deref(), Some("n"));

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("op = n_mt -> {"));
    assert!(mutated.contains("int doubled = n_mt + n_mt;"));
}

#[test]
fn two_lambdas_with_same_parameter_name_stay_disjoint() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    java.util.function.IntUnaryOperator inc = n -> n + 1;
    java.util.function.IntUnaryOperator dec = n -> n - 1;
}
"#,
    );
    apply_at(Operation::RenameParam, &file, 0);

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("inc = n_mt -> n_mt + 1;"));
    assert!(mutated.contains("dec = n -> n - 1;"));
}

#[test]
fn member_selections_are_never_renamed() {
    let dir = TempDir::new().unwrap();
    let file = write_java(
        dir.path(),
        "A.java",
        r#"
class A {
    void m(Other other) {
        int size = 1;
        use(size, other.size, other.size());
    }
}
"#,
    );
    apply_at(Operation::RenameLocal, &file, 0);

    let mutated = std::fs::read_to_string(&file).unwrap();
    assert!(mutated.contains("int size_mt = 1;"));
    assert!(mutated.contains("use(size_mt, other.size, other.size());"));
}
