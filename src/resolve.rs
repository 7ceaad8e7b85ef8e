use tree_sitter::Node;

use crate::source::{Edit, SourceUnit};

/// Scoped renaming. Tier 1 resolves each bare name-reference to the
/// declaration it denotes and renames only the ones that come back to the
/// declaration being renamed. Resolution can fail silently (fields, statics,
/// names from other units), so when tier 1 renames nothing, tier 2 falls
/// back to a lexical sweep of the smallest enclosing scope. The fallback
/// never crosses block or callable boundaries, which keeps shadowing
/// declarations in sibling scopes untouched.

/// Resolve a name-reference to the name node of its declaration, walking
/// lexical scopes outward. `None` means the name is not introduced by any
/// enclosing scope.
pub fn resolve<'a>(unit: &'a SourceUnit, usage: Node<'a>) -> Option<Node<'a>> {
    let name = unit.text(usage);
    let mut node = usage;
    while let Some(parent) = node.parent() {
        if let Some(decl) = declared_in(unit, parent, name, usage) {
            return Some(decl);
        }
        if matches!(
            parent.kind(),
            "class_declaration" | "interface_declaration" | "enum_declaration" | "program"
        ) {
            return None;
        }
        node = parent;
    }
    None
}

/// Declaration of `name` introduced directly by `scope` and visible at
/// `usage`, if any.
fn declared_in<'a>(
    unit: &SourceUnit,
    scope: Node<'a>,
    name: &str,
    usage: Node,
) -> Option<Node<'a>> {
    match scope.kind() {
        "block" | "constructor_body" => {
            // Locals are visible from their declarator onward.
            let mut found = None;
            let count = scope.child_count();
            for i in 0..count {
                let Some(stmt) = scope.child(i) else { continue };
                if stmt.kind() != "local_variable_declaration" {
                    continue;
                }
                if let Some(decl) = declarator_named(unit, stmt, name) {
                    if decl.end_byte() <= usage.start_byte() {
                        found = Some(decl);
                    }
                }
            }
            found
        }
        "for_statement" => {
            let init = scope.child_by_field_name("init")?;
            if init.kind() == "local_variable_declaration" {
                declarator_named(unit, init, name)
            } else {
                None
            }
        }
        "enhanced_for_statement" => {
            let decl = scope.child_by_field_name("name")?;
            (unit.text(decl) == name).then_some(decl)
        }
        "catch_clause" => {
            let count = scope.child_count();
            for i in 0..count {
                let Some(child) = scope.child(i) else { continue };
                if child.kind() != "catch_formal_parameter" {
                    continue;
                }
                let inner = child.child_count();
                for j in 0..inner {
                    let Some(id) = child.child(j) else { continue };
                    if id.kind() == "identifier" && unit.text(id) == name {
                        return Some(id);
                    }
                }
            }
            None
        }
        "method_declaration" | "constructor_declaration" => {
            let params = scope.child_by_field_name("parameters")?;
            formal_param_named(unit, params, name)
        }
        "lambda_expression" => {
            let params = scope.child_by_field_name("parameters")?;
            match params.kind() {
                "identifier" => (unit.text(params) == name).then_some(params),
                "inferred_parameters" => {
                    let count = params.child_count();
                    for i in 0..count {
                        let Some(id) = params.child(i) else { continue };
                        if id.kind() == "identifier" && unit.text(id) == name {
                            return Some(id);
                        }
                    }
                    None
                }
                "formal_parameters" => formal_param_named(unit, params, name),
                _ => None,
            }
        }
        _ => None,
    }
}

fn declarator_named<'a>(
    unit: &SourceUnit,
    declaration: Node<'a>,
    name: &str,
) -> Option<Node<'a>> {
    let count = declaration.child_count();
    for i in 0..count {
        let Some(declarator) = declaration.child(i) else { continue };
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(decl_name) = declarator.child_by_field_name("name") {
            if unit.text(decl_name) == name {
                return Some(decl_name);
            }
        }
    }
    None
}

fn formal_param_named<'a>(unit: &SourceUnit, params: Node<'a>, name: &str) -> Option<Node<'a>> {
    let count = params.child_count();
    for i in 0..count {
        let Some(param) = params.child(i) else { continue };
        if param.kind() != "formal_parameter" {
            continue;
        }
        if let Some(param_name) = param.child_by_field_name("name") {
            if unit.text(param_name) == name {
                return Some(param_name);
            }
        }
    }
    None
}

/// True for identifiers that denote a value by name. Declared names, member
/// selections, labels, and type/package positions are not references.
pub fn is_name_reference(node: Node) -> bool {
    if node.kind() != "identifier" {
        return false;
    }
    let Some(parent) = node.parent() else {
        return false;
    };
    let is_field = |field: &str| {
        parent
            .child_by_field_name(field)
            .is_some_and(|n| n.id() == node.id())
    };
    match parent.kind() {
        "variable_declarator" | "formal_parameter" | "catch_formal_parameter"
        | "inferred_parameters" => false,
        "enhanced_for_statement" => !is_field("name"),
        "field_access" => !is_field("field"),
        "method_invocation" => !is_field("name"),
        // x::method — the qualifier is a value reference, the method name is not
        "method_reference" => {
            let last = parent.named_child(parent.named_child_count().saturating_sub(1));
            last.map(|n| n.id()) != Some(node.id())
        }
        "marker_annotation" | "annotation" => false,
        "method_declaration" | "constructor_declaration" | "class_declaration"
        | "interface_declaration" | "enum_declaration" | "annotation_type_declaration" => false,
        "labeled_statement" | "break_statement" | "continue_statement" => false,
        "scoped_identifier" | "package_declaration" | "import_declaration" => false,
        "lambda_expression" => !is_field("parameters"),
        _ => true,
    }
}

fn name_references<'a>(unit: &'a SourceUnit, root: Node<'a>, name: &str) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    collect_references(unit, root, name, &mut out);
    out
}

fn collect_references<'a>(
    unit: &'a SourceUnit,
    node: Node<'a>,
    name: &str,
    out: &mut Vec<Node<'a>>,
) {
    if is_name_reference(node) && unit.text(node) == name {
        out.push(node);
    }
    let count = node.child_count();
    for i in 0..count {
        if let Some(child) = node.child(i) {
            collect_references(unit, child, name, out);
        }
    }
}

/// Tier 2: rename every bare name-reference with `old_name` inside `scope`.
pub fn rename_in_scope(
    unit: &SourceUnit,
    scope: Node,
    old_name: &str,
    new_name: &str,
) -> Vec<Edit> {
    name_references(unit, scope, old_name)
        .into_iter()
        .map(|usage| Edit::replace(usage, new_name.to_string()))
        .collect()
}

/// Rename the usages of `decl_name` across the unit. Identity-resolved
/// matches win; when resolution renames nothing, the lexical fallback sweeps
/// `scope`. Each usage is visited exactly once.
pub fn rename_usages(
    unit: &SourceUnit,
    decl_name: Node,
    scope: Node,
    old_name: &str,
    new_name: &str,
) -> Vec<Edit> {
    let mut edits = Vec::new();
    for usage in name_references(unit, unit.root(), old_name) {
        let Some(resolved) = resolve(unit, usage) else {
            continue;
        };
        if resolved.id() == decl_name.id() {
            edits.push(Edit::replace(usage, new_name.to_string()));
        }
    }
    if edits.is_empty() {
        return rename_in_scope(unit, scope, old_name, new_name);
    }
    edits
}
