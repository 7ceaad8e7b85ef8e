use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tree_sitter::Node;

use crate::MARKER_SUFFIX;
use crate::candidates::{self, PickPolicy};
use crate::mutation::{MutationResult, generate_diff};
use crate::resolve;
use crate::source::{self, Edit, SourceUnit};

/// The closed set of mutation operators. New operators extend this enum and
/// the dispatch below; the run controller never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Operation {
    /// Rename a local variable and its in-scope usages
    RenameLocal,
    /// Rename a method, constructor, or lambda parameter and its usages
    RenameParam,
    /// Insert a timestamped comment; zero behavior change
    InsertComment,
    /// Wrap an if-condition in a double negation
    DoubleNegateIf,
    /// Negate an if-condition and swap its branches
    FlipIf,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::RenameLocal => "rename-local",
            Operation::RenameParam => "rename-param",
            Operation::InsertComment => "insert-comment",
            Operation::DoubleNegateIf => "double-negate-if",
            Operation::FlipIf => "flip-if",
        }
    }

    /// What the operator looks for, for "no suitable X" messages.
    pub fn label(self) -> &'static str {
        match self {
            Operation::RenameLocal => "local variable",
            Operation::RenameParam => "parameter",
            Operation::InsertComment => "insertion point",
            Operation::DoubleNegateIf | Operation::FlipIf => "if-statement",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Operation::RenameLocal => "Renamed local variable",
            Operation::RenameParam => "Renamed parameter",
            Operation::InsertComment => "Inserted comment",
            Operation::DoubleNegateIf => "Double-negated condition",
            Operation::FlipIf => "Flipped if/else",
        }
    }
}

/// Edits plus the old/new names describing them.
type Planned = (Vec<Edit>, Option<String>, Option<String>);

/// Apply one operator to one file. Wrong extension, parse failure, or no
/// eligible candidate all come back as `changed = false`; the only errors
/// are filesystem ones.
pub fn apply(op: Operation, file: &Path, pick: &PickPolicy) -> std::io::Result<MutationResult> {
    if !crate::is_java_file(file) {
        return Ok(MutationResult::unchanged(file));
    }
    let original = fs::read_to_string(file)?;
    let Ok(unit) = SourceUnit::parse(original) else {
        return Ok(MutationResult::unchanged(file));
    };

    let planned = match op {
        Operation::RenameLocal => rename_local(&unit, pick),
        Operation::RenameParam => rename_param(&unit, pick),
        Operation::InsertComment => insert_comment(),
        Operation::DoubleNegateIf => double_negate_if(&unit, pick),
        Operation::FlipIf => flip_if(&unit, pick),
    };
    let Some((edits, old_name, new_name)) = planned else {
        return Ok(MutationResult::unchanged(file));
    };

    let mutated = source::render(unit.source(), &edits);
    let diff = generate_diff(unit.source(), &mutated);
    fs::write(file, &mutated)?;

    Ok(MutationResult {
        file: file.to_path_buf(),
        old_name,
        new_name,
        changed: true,
        diff,
    })
}

fn rename_local(unit: &SourceUnit, pick: &PickPolicy) -> Option<Planned> {
    let all = candidates::local_declarations(unit);
    let target = candidates::pick(&all, pick)?;

    let old_name = unit.text(target.name_node).to_string();
    let new_name = format!("{old_name}{MARKER_SUFFIX}");

    let mut edits = vec![Edit::replace(target.name_node, new_name.clone())];
    edits.extend(resolve::rename_usages(
        unit,
        target.name_node,
        target.scope,
        &old_name,
        &new_name,
    ));
    Some((edits, Some(old_name), Some(new_name)))
}

fn rename_param(unit: &SourceUnit, pick: &PickPolicy) -> Option<Planned> {
    let all = candidates::parameters(unit);
    let target = candidates::pick(&all, pick)?;

    let old_name = unit.text(target.name_node).to_string();
    let new_name = format!("{old_name}{MARKER_SUFFIX}");

    let mut edits = vec![Edit::replace(target.name_node, new_name.clone())];
    if target.lambda {
        // Stay inside this lambda's body; a captured outer variable with the
        // same name must not be touched.
        edits.extend(resolve::rename_in_scope(
            unit,
            target.body,
            &old_name,
            &new_name,
        ));
    } else {
        edits.extend(resolve::rename_usages(
            unit,
            target.name_node,
            target.body,
            &old_name,
            &new_name,
        ));
    }
    Some((edits, Some(old_name), Some(new_name)))
}

fn insert_comment() -> Option<Planned> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let edit = Edit::insert(0, format!("// buildprobe: touched at {stamp}\n"));
    Some((vec![edit], None, Some("comment_inserted".to_string())))
}

fn double_negate_if(unit: &SourceUnit, pick: &PickPolicy) -> Option<Planned> {
    let all = candidates::if_statements(unit);
    let target = *candidates::pick(&all, pick)?;

    let condition = target.child_by_field_name("condition")?;
    let inner = condition_text(unit, condition)?;
    let edits = vec![Edit::replace(condition, format!("(!(!({inner})))"))];
    Some((
        edits,
        Some("if".to_string()),
        Some("if_double_negated".to_string()),
    ))
}

fn flip_if(unit: &SourceUnit, pick: &PickPolicy) -> Option<Planned> {
    let all = candidates::if_statements(unit);
    let target = *candidates::pick(&all, pick)?;

    let condition = target.child_by_field_name("condition")?;
    let inner = condition_text(unit, condition)?;
    let consequence = target.child_by_field_name("consequence")?;

    let mut edits = vec![Edit::replace(condition, format!("(!({inner}))"))];
    match target.child_by_field_name("alternative") {
        Some(alternative) => {
            // if (C) A else B  ==>  if (!(C)) B else A
            let consequence_text = unit.text(consequence).to_string();
            let alternative_text = unit.text(alternative).to_string();
            edits.push(Edit::replace(consequence, alternative_text));
            edits.push(Edit::replace(alternative, consequence_text));
        }
        None => {
            // if (C) A  ==>  if (!(C)) {} else A
            let consequence_text = unit.text(consequence);
            edits.push(Edit::replace(
                consequence,
                format!("{{}} else {consequence_text}"),
            ));
        }
    }
    Some((
        edits,
        Some("if".to_string()),
        Some("if_negated_swapped".to_string()),
    ))
}

/// Text of the expression inside the condition's parentheses. Comments are
/// named nodes too, so skip past them to the expression itself.
fn condition_text<'a>(unit: &'a SourceUnit, condition: Node) -> Option<&'a str> {
    let count = condition.named_child_count();
    for i in 0..count {
        let child = condition.named_child(i)?;
        if !matches!(child.kind(), "line_comment" | "block_comment") {
            return Some(unit.text(child));
        }
    }
    None
}
