//! Parse tree → [`StateMachine`].
//!
//! Building runs in two walks over the tree. The declare walk creates (or
//! merges into) every state and choice, including the sub-regions of
//! composite states; the wire walk then creates transitions, so a
//! transition may name a state declared further down the file. Between
//! the two, names that only transitions mention become simple states,
//! outermost regions first.

mod declare;
mod wire;

use crate::error::BuildError;
use crate::model::{Metadata, RegionId, StateMachine};
use crate::parse_tree::{NodeId, ParseTree};
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Prefix of every entity id.
    pub statemachine_id: String,
    pub name: String,
    /// Recorded in the model metadata.
    pub source_diagram: Option<String>,
    /// When false, a transition naming an undeclared vertex is an error
    /// instead of declaring a simple state.
    pub implicit_states: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            statemachine_id: "statemachine".to_owned(),
            name: "statemachine".to_owned(),
            source_diagram: None,
            implicit_states: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    options: BuildOptions,
}

impl ModelBuilder {
    pub fn new(options: BuildOptions) -> Self {
        ModelBuilder { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, tree: &ParseTree) -> Result<StateMachine, BuildError> {
        let metadata = Metadata {
            source_diagram: self.options.source_diagram.clone(),
            ..Metadata::default()
        };
        let sm = StateMachine::new(&self.options.statemachine_id, &self.options.name, metadata);
        let mut build = Build {
            tree,
            options: &self.options,
            sm,
            bodies: HashMap::new(),
        };

        let root = tree.root();
        build.sm.description = tree
            .find_child(root, TokenKind::Label)
            .map(|l| tree.token(l).text.trim().to_owned())
            .filter(|d| !d.is_empty());

        let decls = build.child(root, TokenKind::Declarations)?;
        let top = build.sm.top_region_id();
        build.declare_block(decls, top)?;
        build.declare_implicit_states(decls, top)?;
        build.wire_block(decls, top)?;

        tracing::debug!(
            states = build.sm.states().count(),
            transitions = build.sm.transitions().count(),
            "model built"
        );
        Ok(build.sm)
    }
}

/// Builds a model with the given options.
pub fn build(tree: &ParseTree, options: BuildOptions) -> Result<StateMachine, BuildError> {
    ModelBuilder::new(options).build(tree)
}

/// State of one build run.
struct Build<'a> {
    tree: &'a ParseTree,
    options: &'a BuildOptions,
    sm: StateMachine,
    /// Region each composite body (`declarations` node) was declared into.
    bodies: HashMap<NodeId, RegionId>,
}

impl Build<'_> {
    fn token(&self, node: NodeId) -> &Token {
        self.tree.token(node)
    }

    /// First child of `node` with `kind`, or a malformed-node error.
    fn child(&self, node: NodeId, kind: TokenKind) -> Result<NodeId, BuildError> {
        self.tree
            .find_child(node, kind)
            .ok_or_else(|| self.malformed(node, kind.as_str()))
    }

    fn malformed(&self, node: NodeId, missing: &str) -> BuildError {
        let token = self.token(node);
        BuildError::MalformedNode {
            production: token.kind.as_str().to_owned(),
            missing: missing.to_owned(),
            line: token.start_line,
        }
    }

    /// Text of the last `kind` child, trimmed; `None` if absent or blank.
    fn last_text(&self, node: NodeId, kind: TokenKind) -> Option<String> {
        self.tree
            .children_of_kind(node, kind)
            .last()
            .map(|c| self.token(c).text.trim().to_owned())
            .filter(|t| !t.is_empty())
    }
}

/// `<<name>>` → `name`.
fn stereotype_name(text: &str) -> String {
    text.trim_start_matches('<')
        .trim_end_matches('>')
        .trim()
        .to_owned()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
