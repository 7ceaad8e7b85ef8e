use tree_sitter::Node;

use crate::MARKER_SUFFIX;
use crate::source::SourceUnit;

/// A local variable declaration eligible for renaming. `scope` is the
/// smallest enclosing block, which bounds the lexical rename fallback.
pub struct LocalCandidate<'a> {
    pub name_node: Node<'a>,
    pub scope: Node<'a>,
}

/// A parameter eligible for renaming. Lambda parameters are renamed within
/// the lambda body only; callable parameters may rename across the unit when
/// identity resolution succeeds.
pub struct ParamCandidate<'a> {
    pub name_node: Node<'a>,
    pub body: Node<'a>,
    pub lambda: bool,
}

/// How to choose among candidates: explicit index (clamped) takes precedence
/// over a random seed; with neither, the first candidate in tree order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickPolicy {
    pub index: Option<usize>,
    pub seed: Option<u64>,
}

pub fn pick<'t, T>(items: &'t [T], policy: &PickPolicy) -> Option<&'t T> {
    if items.is_empty() {
        return None;
    }
    if let Some(index) = policy.index {
        return items.get(index.min(items.len() - 1));
    }
    if let Some(seed) = policy.seed {
        // Fresh generator per invocation so equal seeds pick equal candidates
        // no matter what ran before.
        let mut rng = fastrand::Rng::with_seed(seed);
        return items.get(rng.usize(..items.len()));
    }
    items.first()
}

fn walk<'a>(node: Node<'a>, visit: &mut impl FnMut(Node<'a>)) {
    visit(node);
    let count = node.child_count();
    for i in 0..count {
        if let Some(child) = node.child(i) {
            walk(child, visit);
        }
    }
}

fn already_marked(unit: &SourceUnit, name_node: Node) -> bool {
    unit.text(name_node).ends_with(MARKER_SUFFIX)
}

/// Smallest enclosing block (method, constructor, or nested) for a node.
pub fn enclosing_block<'a>(node: Node<'a>) -> Option<Node<'a>> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if matches!(parent.kind(), "block" | "constructor_body") {
            return Some(parent);
        }
        current = parent;
    }
    None
}

/// Every local variable declaration nested inside a block, in tree order.
pub fn local_declarations<'a>(unit: &'a SourceUnit) -> Vec<LocalCandidate<'a>> {
    let mut out = Vec::new();
    walk(unit.root(), &mut |node| {
        if node.kind() != "local_variable_declaration" {
            return;
        }
        let count = node.child_count();
        for i in 0..count {
            let Some(declarator) = node.child(i) else { continue };
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else { continue };
            if already_marked(unit, name_node) {
                continue;
            }
            if let Some(scope) = enclosing_block(node) {
                out.push(LocalCandidate { name_node, scope });
            }
        }
    });
    out
}

/// Every parameter of a callable that has a body, plus every lambda
/// parameter. Abstract and interface methods contribute nothing.
pub fn parameters<'a>(unit: &'a SourceUnit) -> Vec<ParamCandidate<'a>> {
    let mut out = Vec::new();
    walk(unit.root(), &mut |node| match node.kind() {
        "method_declaration" | "constructor_declaration" => {
            let Some(body) = node.child_by_field_name("body") else { return };
            let Some(params) = node.child_by_field_name("parameters") else { return };
            collect_formal_params(unit, params, body, false, &mut out);
        }
        "lambda_expression" => {
            let Some(body) = node.child_by_field_name("body") else { return };
            let Some(params) = node.child_by_field_name("parameters") else { return };
            match params.kind() {
                // x -> ...
                "identifier" => {
                    if !already_marked(unit, params) {
                        out.push(ParamCandidate { name_node: params, body, lambda: true });
                    }
                }
                // (x, y) -> ...
                "inferred_parameters" => {
                    let count = params.child_count();
                    for i in 0..count {
                        let Some(child) = params.child(i) else { continue };
                        if child.kind() == "identifier" && !already_marked(unit, child) {
                            out.push(ParamCandidate { name_node: child, body, lambda: true });
                        }
                    }
                }
                // (Type x, Type y) -> ...
                "formal_parameters" => {
                    collect_formal_params(unit, params, body, true, &mut out);
                }
                _ => {}
            }
        }
        _ => {},
    });
    out
}

fn collect_formal_params<'a>(
    unit: &SourceUnit,
    params: Node<'a>,
    body: Node<'a>,
    lambda: bool,
    out: &mut Vec<ParamCandidate<'a>>,
) {
    let count = params.child_count();
    for i in 0..count {
        let Some(param) = params.child(i) else { continue };
        if param.kind() != "formal_parameter" {
            continue;
        }
        let Some(name_node) = param.child_by_field_name("name") else { continue };
        if !already_marked(unit, name_node) {
            out.push(ParamCandidate { name_node, body, lambda });
        }
    }
}

/// Every if-statement, with or without an else-branch, in tree order.
pub fn if_statements<'a>(unit: &'a SourceUnit) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    walk(unit.root(), &mut |node| {
        if node.kind() == "if_statement" {
            out.push(node);
        }
    });
    out
}
