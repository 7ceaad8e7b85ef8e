use buildprobe::candidates::{self, PickPolicy};
use buildprobe::source::SourceUnit;

fn parse(source: &str) -> SourceUnit {
    SourceUnit::parse(source.to_string()).expect("fixture should parse")
}

// --- local declarations ---

#[test]
fn locals_found_at_any_block_depth() {
    let unit = parse(
        r#"
class A {
    void m() {
        int outer = 1;
        if (outer > 0) {
            int inner = 2;
        }
    }
}
"#,
    );
    let found = candidates::local_declarations(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["outer", "inner"]);
}

#[test]
fn locals_exclude_fields() {
    let unit = parse(
        r#"
class A {
    int field = 1;
    void m() {
        int local = 2;
    }
}
"#,
    );
    let found = candidates::local_declarations(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["local"]);
}

#[test]
fn locals_multiple_declarators_all_selected() {
    let unit = parse("class A { void m() { int a = 1, b = 2; } }");
    let found = candidates::local_declarations(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn locals_with_marker_suffix_are_filtered() {
    let unit = parse("class A { void m() { int count_mt = 1; int other = 2; } }");
    let found = candidates::local_declarations(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["other"]);
}

#[test]
fn locals_empty_when_no_declarations() {
    let unit = parse("class A { void m() { use(); } }");
    assert!(candidates::local_declarations(&unit).is_empty());
}

// --- parameters ---

#[test]
fn params_of_methods_with_body() {
    let unit = parse("class A { int twice(int amount) { return amount + amount; } }");
    let found = candidates::parameters(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["amount"]);
    assert!(!found[0].lambda);
}

#[test]
fn params_of_abstract_methods_excluded() {
    let unit = parse("interface I { int f(int x); }");
    assert!(candidates::parameters(&unit).is_empty());
}

#[test]
fn params_of_constructors_included() {
    let unit = parse("class A { A(int seed) { this.seed = seed; } int seed; }");
    let found = candidates::parameters(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["seed"]);
}

#[test]
fn params_include_bare_lambda_parameter() {
    let unit = parse(
        "class A { java.util.function.IntUnaryOperator op = n -> n + 1; }",
    );
    let found = candidates::parameters(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["n"]);
    assert!(found[0].lambda);
}

#[test]
fn params_include_inferred_lambda_parameters() {
    let unit = parse(
        "class A { java.util.function.IntBinaryOperator op = (a, b) -> a + b; }",
    );
    let found = candidates::parameters(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn params_with_marker_suffix_are_filtered() {
    let unit = parse("class A { int f(int x_mt, int y) { return x_mt + y; } }");
    let found = candidates::parameters(&unit);
    let names: Vec<&str> = found.iter().map(|c| unit.text(c.name_node)).collect();
    assert_eq!(names, vec!["y"]);
}

// --- if statements ---

#[test]
fn ifs_found_with_and_without_else() {
    let unit = parse(
        r#"
class A {
    void m(int x) {
        if (x > 0) { a(); }
        if (x < 0) { b(); } else { c(); }
    }
}
"#,
    );
    assert_eq!(candidates::if_statements(&unit).len(), 2);
}

#[test]
fn ifs_include_nested_and_else_if() {
    let unit = parse(
        r#"
class A {
    void m(int x) {
        if (x > 0) {
            if (x > 10) { a(); }
        } else if (x < -10) {
            b();
        }
    }
}
"#,
    );
    // outer, nested, and the else-if chain's second statement
    assert_eq!(candidates::if_statements(&unit).len(), 3);
}

// --- pick policy ---

#[test]
fn pick_defaults_to_first() {
    let items = [10, 20, 30];
    let policy = PickPolicy::default();
    assert_eq!(candidates::pick(&items, &policy), Some(&10));
}

#[test]
fn pick_by_index() {
    let items = [10, 20, 30];
    let policy = PickPolicy { index: Some(1), seed: None };
    assert_eq!(candidates::pick(&items, &policy), Some(&20));
}

#[test]
fn pick_index_clamped_to_last() {
    let items = [10, 20, 30];
    let policy = PickPolicy { index: Some(99), seed: None };
    assert_eq!(candidates::pick(&items, &policy), Some(&30));
}

#[test]
fn pick_seed_is_deterministic() {
    let items = [10, 20, 30, 40, 50];
    let policy = PickPolicy { index: None, seed: Some(1234) };
    let first = candidates::pick(&items, &policy);
    let second = candidates::pick(&items, &policy);
    assert_eq!(first, second);
}

#[test]
fn pick_index_wins_over_seed() {
    let items = [10, 20, 30];
    let policy = PickPolicy { index: Some(0), seed: Some(999) };
    assert_eq!(candidates::pick(&items, &policy), Some(&10));
}

#[test]
fn pick_empty_returns_none() {
    let items: [i32; 0] = [];
    assert_eq!(candidates::pick(&items, &PickPolicy::default()), None);
}
