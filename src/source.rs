use tree_sitter::{Node, Parser, Tree};

/// A parsed Java file. Holds the original text alongside the tree so node
/// spans can be mapped back to the exact bytes they came from.
pub struct SourceUnit {
    source: String,
    tree: Tree,
}

/// The file did not parse cleanly. Recoverable: callers skip the file.
#[derive(Debug)]
pub struct ParseFailure;

impl SourceUnit {
    pub fn parse(source: String) -> Result<SourceUnit, ParseFailure> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser
            .set_language(&language.into())
            .expect("Failed to set Java grammar");

        let tree = parser.parse(&source, None).ok_or(ParseFailure)?;
        if tree.root_node().has_error() {
            return Err(ParseFailure);
        }
        Ok(SourceUnit { source, tree })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text(&self, node: Node) -> &str {
        &self.source[node.start_byte()..node.end_byte()]
    }
}

/// One span replacement. Edits produced for a single mutation never overlap.
#[derive(Debug, Clone)]
pub struct Edit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub replacement: String,
}

impl Edit {
    pub fn replace(node: Node, replacement: String) -> Edit {
        Edit {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            replacement,
        }
    }

    pub fn insert(at: usize, text: String) -> Edit {
        Edit {
            start_byte: at,
            end_byte: at,
            replacement: text,
        }
    }
}

/// Splice edits into the source, back to front so earlier offsets stay valid.
/// Untouched bytes are reproduced exactly; zero edits returns the input
/// unchanged.
pub fn render(source: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| std::cmp::Reverse(e.start_byte));

    let mut result = source.to_string();
    for edit in ordered {
        result.replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_zero_edits_is_identity() {
        let source = "class A {\n    int x = 1; // note\n}\n";
        assert_eq!(render(source, &[]), source);
    }

    #[test]
    fn render_applies_edits_back_to_front() {
        let source = "int a = b + c;";
        let edits = vec![
            Edit { start_byte: 4, end_byte: 5, replacement: "a_mt".to_string() },
            Edit { start_byte: 8, end_byte: 9, replacement: "b_mt".to_string() },
        ];
        assert_eq!(render(source, &edits), "int a_mt = b_mt + c;");
    }

    #[test]
    fn render_insert_at_start() {
        let source = "class A {}\n";
        let edits = vec![Edit::insert(0, "// hi\n".to_string())];
        assert_eq!(render(source, &edits), "// hi\nclass A {}\n");
    }

    #[test]
    fn parse_rejects_broken_source() {
        assert!(SourceUnit::parse("class A { int = ; }".to_string()).is_err());
    }

    #[test]
    fn parse_accepts_valid_source() {
        let unit = SourceUnit::parse("class A { void m() { int x = 1; } }".to_string()).unwrap();
        assert_eq!(unit.root().kind(), "program");
    }
}
