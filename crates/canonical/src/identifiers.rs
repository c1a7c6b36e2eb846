//! User-defined identifier discovery over a Python syntax tree.
//!
//! The walker classifies nodes into three capabilities and reports each name
//! through an [`IdentifierVisitor`]:
//!
//! - **binding**: names stored by assignment, augmented or annotated assignment,
//!   `for` and comprehension targets, `with ... as` targets, and `:=` targets.
//!   Subscript and attribute targets do not bind their base object.
//! - **attribute**: the member name of every attribute access (`obj.name`).
//! - **definition**: function and method names.
//!
//! Parameters, imports, class names and names that are only read are left
//! alone, so calls to builtins and library APIs survive masking.

use std::collections::BTreeSet;

use tree_sitter::{Node, Parser, Tree};

use crate::error::ParseFailure;

/// Receives identifier names as the tree walk discovers them.
pub trait IdentifierVisitor {
    fn binding_name(&mut self, name: &str);
    fn attribute_name(&mut self, name: &str);
    fn definition_name(&mut self, name: &str);
}

/// Flat set of every discovered identifier, regardless of capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    names: BTreeSet<String>,
}

impl IdentifierSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    fn insert(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }
}

impl IdentifierVisitor for IdentifierSet {
    fn binding_name(&mut self, name: &str) {
        self.insert(name);
    }

    fn attribute_name(&mut self, name: &str) {
        self.insert(name);
    }

    fn definition_name(&mut self, name: &str) {
        self.insert(name);
    }
}

impl<'a> FromIterator<&'a str> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = IdentifierSet::default();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Parse `source` and collect its user-defined identifiers.
///
/// Any syntax error anywhere in the file fails the whole extraction, so the
/// caller can fall back to syntax-only normalization.
pub fn extract_identifiers(source: &str) -> Result<IdentifierSet, ParseFailure> {
    let tree = parse_python(source)?;
    let mut set = IdentifierSet::default();
    walk_identifiers(&tree, source.as_bytes(), &mut set);
    Ok(set)
}

/// Parse Python source, rejecting trees that contain error or missing nodes.
pub fn parse_python(source: &str) -> Result<Tree, ParseFailure> {
    let mut parser = Parser::new();
    parser
        .set_language(tree_sitter_python::language())
        .map_err(|err| ParseFailure::Grammar(err.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseFailure::NoTree)?;
    let root = tree.root_node();
    if root.has_error() {
        let point = first_error(root)
            .map(|node| node.start_position())
            .unwrap_or_else(|| root.start_position());
        return Err(ParseFailure::Syntax {
            line: point.row + 1,
            column: point.column + 1,
        });
    }
    Ok(tree)
}

/// Visit every identifier-bearing node of `tree` in document order.
pub fn walk_identifiers<V: IdentifierVisitor + ?Sized>(tree: &Tree, source: &[u8], visitor: &mut V) {
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        classify(node, source, visitor);

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        // Reverse so the leftmost child is visited first.
        stack.extend(children.into_iter().rev());
    }
}

fn classify<V: IdentifierVisitor + ?Sized>(node: Node, source: &[u8], visitor: &mut V) {
    match node.kind() {
        "assignment" | "augmented_assignment" | "for_statement" | "for_in_clause" => {
            if let Some(left) = node.child_by_field_name("left") {
                bind_targets(left, source, visitor);
            }
        }
        "named_expression" => {
            if let Some(name) = node.child_by_field_name("name") {
                bind_targets(name, source, visitor);
            }
        }
        "with_item" => {
            // Older grammars expose the target directly on the item.
            if let Some(alias) = node.child_by_field_name("alias") {
                bind_targets(alias, source, visitor);
            }
        }
        "as_pattern" => {
            let in_with = node.parent().is_some_and(|p| p.kind() == "with_item");
            if in_with {
                if let Some(alias) = node.child_by_field_name("alias") {
                    bind_targets(alias, source, visitor);
                }
            }
        }
        "attribute" => {
            if let Some(name) = node.child_by_field_name("attribute") {
                if let Ok(text) = name.utf8_text(source) {
                    visitor.attribute_name(text);
                }
            }
        }
        "function_definition" => {
            if let Some(name) = node.child_by_field_name("name") {
                if let Ok(text) = name.utf8_text(source) {
                    visitor.definition_name(text);
                }
            }
        }
        _ => {}
    }
}

/// Report every plain name stored by an assignment target.
fn bind_targets<V: IdentifierVisitor + ?Sized>(node: Node, source: &[u8], visitor: &mut V) {
    match node.kind() {
        "identifier" => {
            if let Ok(text) = node.utf8_text(source) {
                visitor.binding_name(text);
            }
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern"
        | "as_pattern_target" | "parenthesized_expression" | "tuple" | "list"
        | "expression_list" | "list_splat" | "pattern" => {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            for child in children {
                bind_targets(child, source, visitor);
            }
        }
        // attribute / subscript targets store into an existing object
        _ => {}
    }
}

fn first_error(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}
