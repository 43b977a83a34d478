//! Arena-backed parse tree.
//!
//! Nodes live in one `Vec` and refer to each other by index; the root is
//! always node 0. Children are kept in source order.

use crate::token::{Token, TokenKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub token: Token,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    nodes: Vec<Node>,
}

impl ParseTree {
    pub fn new(root: Token) -> Self {
        ParseTree {
            nodes: vec![Node {
                token: root,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Panics on an id that did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self.nodes[id.0].token
    }

    pub fn kind(&self, id: NodeId) -> TokenKind {
        self.nodes[id.0].token.kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `token` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, token: Token) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            token,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Relabels a production node once more input has been seen.
    pub fn set_kind(&mut self, id: NodeId, kind: TokenKind) {
        self.nodes[id.0].token.kind = kind;
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// First child of `id` with the given kind.
    pub fn find_child(&self, id: NodeId, kind: TokenKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == kind)
    }

    /// All children of `id` with the given kind, in order.
    pub fn children_of_kind(&self, id: NodeId, kind: TokenKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.kind(c) == kind)
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let token = self.token(id);
        writeln!(
            f,
            "{:indent$}└ <{}>: {}",
            "",
            token.kind,
            token.text.replace('\n', "\\n"),
            indent = depth * 2
        )?;
        for &child in self.children(id) {
            self.dump(f, child, depth + 1)?;
        }
        Ok(())
    }
}

/// One line per node, two spaces of indent per level.
impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, self.root(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, 1, 1)
    }

    #[test]
    fn children_keep_insertion_order_and_parent_links() {
        let mut tree = ParseTree::new(tok(TokenKind::Root, ""));
        let a = tree.add_child(tree.root(), tok(TokenKind::KeywordStartUml, "@startuml"));
        let b = tree.add_child(tree.root(), tok(TokenKind::Declarations, ""));
        assert_eq!(tree.children(tree.root()), &[a, b]);
        assert_eq!(tree.parent(b), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn set_kind_relabels_in_place() {
        let mut tree = ParseTree::new(tok(TokenKind::Root, ""));
        let d = tree.add_child(tree.root(), tok(TokenKind::StateDeclaration, ""));
        tree.set_kind(d, TokenKind::StateAliasDeclaration);
        assert_eq!(tree.kind(d), TokenKind::StateAliasDeclaration);
        assert_eq!(tree.find_child(tree.root(), TokenKind::StateAliasDeclaration), Some(d));
        assert_eq!(tree.find_child(tree.root(), TokenKind::StateDeclaration), None);
    }

    #[test]
    fn dump_indents_and_escapes() {
        let mut tree = ParseTree::new(tok(TokenKind::Root, ""));
        let decls = tree.add_child(tree.root(), tok(TokenKind::Declarations, ""));
        tree.add_child(decls, tok(TokenKind::Newline, "\n"));
        assert_eq!(
            tree.to_string(),
            "└ <root>: \n  └ <declarations>: \n    └ <NEWLINE>: \\n\n"
        );
    }
}
