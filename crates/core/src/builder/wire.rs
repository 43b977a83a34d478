use super::{stereotype_name, Build};
use crate::error::BuildError;
use crate::model::{RegionId, StateData, TransitionParts, VertexId, VertexKind};
use crate::parse_tree::NodeId;
use crate::token::TokenKind::*;

/// Which end of a transition a `[*]` marker sits on.
#[derive(Clone, Copy)]
enum End {
    Source,
    Target,
}

impl Build<'_> {
    /// Creates the transitions of a `declarations` block, in source order,
    /// descending into composite bodies as they appear.
    pub(super) fn wire_block(&mut self, decls: NodeId, region: RegionId) -> Result<(), BuildError> {
        let tree = self.tree;
        for &stmt in tree.children(decls) {
            match tree.kind(stmt) {
                TransitionDeclaration => self.wire_transition(stmt, region)?,
                StateDeclaration | StateAliasDeclaration => {
                    if let Some(body) = tree.find_child(stmt, Declarations) {
                        let sub_region = self
                            .bodies
                            .get(&body)
                            .copied()
                            .ok_or_else(|| self.malformed(stmt, "declared body"))?;
                        self.wire_block(body, sub_region)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Declares the vertices that transitions name but nothing declares.
    /// Outer regions go first, so a name used both inside a composite and
    /// around it becomes one state in the outer region whatever the order
    /// of the statements.
    pub(super) fn declare_implicit_states(
        &mut self,
        decls: NodeId,
        region: RegionId,
    ) -> Result<(), BuildError> {
        let mut refs = Vec::new();
        self.collect_endpoints(decls, region, &mut refs)?;

        let mut pending = Vec::new();
        for (region, node) in refs {
            let token = self.token(node);
            if self.resolve(region, &token.text).is_some() {
                continue;
            }
            if !self.options.implicit_states {
                return Err(BuildError::UndeclaredVertex {
                    name: token.text.clone(),
                    line: token.start_line,
                    column: token.start_col,
                });
            }
            pending.push((self.region_depth(region), region, node));
        }
        pending.sort_by_key(|&(depth, _, _)| depth);

        let tree = self.tree;
        for (_, region, node) in pending {
            let token = tree.token(node);
            if self.resolve(region, &token.text).is_some() {
                continue;
            }
            tracing::debug!(name = %token.text, line = token.start_line, "implicit state");
            self.sm
                .add_vertex(region, &token.text, VertexKind::State(StateData::default()));
        }
        Ok(())
    }

    /// Named transition endpoints with the region they are referenced from,
    /// in source order.
    fn collect_endpoints(
        &self,
        decls: NodeId,
        region: RegionId,
        out: &mut Vec<(RegionId, NodeId)>,
    ) -> Result<(), BuildError> {
        let tree = self.tree;
        for &stmt in tree.children(decls) {
            match tree.kind(stmt) {
                TransitionDeclaration => {
                    let children = tree.children(stmt);
                    let (Some(&source), Some(&target)) = (children.first(), children.get(2)) else {
                        return Err(self.malformed(stmt, "endpoint"));
                    };
                    for node in [source, target] {
                        if tree.kind(node) != InitialFinalState {
                            out.push((region, node));
                        }
                    }
                }
                StateDeclaration | StateAliasDeclaration => {
                    if let Some(body) = tree.find_child(stmt, Declarations) {
                        let sub_region = self
                            .bodies
                            .get(&body)
                            .copied()
                            .ok_or_else(|| self.malformed(stmt, "declared body"))?;
                        self.collect_endpoints(body, sub_region, out)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn wire_transition(&mut self, stmt: NodeId, region: RegionId) -> Result<(), BuildError> {
        let tree = self.tree;
        let children = tree.children(stmt);
        let (Some(&source), Some(&target)) = (children.first(), children.get(2)) else {
            return Err(self.malformed(stmt, "endpoint"));
        };
        let source = self.endpoint(source, region, End::Source)?;
        let target = self.endpoint(target, region, End::Target)?;

        let stereotype = children
            .iter()
            .copied()
            .find(|&c| tree.kind(c).is_stereotype())
            .map(|c| stereotype_name(&tree.token(c).text));
        let mut parts = TransitionParts {
            stereotype,
            ..TransitionParts::default()
        };
        if let Some(label) = tree.find_child(stmt, TransitionLabel) {
            parts.trigger = self.last_text(label, Trigger);
            parts.guard = self.last_text(label, Guard);
            parts.action = self.last_text(label, Behavior);
        }

        let t = self.sm.add_transition(region, source, target, parts);
        tracing::debug!(
            id = %self.sm.transition(t).id,
            line = tree.token(stmt).start_line,
            "transition wired"
        );
        Ok(())
    }

    fn endpoint(&self, node: NodeId, region: RegionId, end: End) -> Result<VertexId, BuildError> {
        let tree = self.tree;
        let token = tree.token(node);
        if token.kind == InitialFinalState {
            let r = self.sm.region(region);
            return Ok(match end {
                End::Source => r.initial_state,
                End::Target => r.terminal_state,
            });
        }
        self.resolve(region, &token.text)
            .ok_or_else(|| BuildError::UndeclaredVertex {
                name: token.text.clone(),
                line: token.start_line,
                column: token.start_col,
            })
    }

    /// Looks `name` up in `region`, then in each enclosing region outward.
    fn resolve(&self, region: RegionId, name: &str) -> Option<VertexId> {
        let mut current = Some(region);
        while let Some(r) = current {
            if let Some(v) = self.sm.lookup(r, name) {
                return Some(v);
            }
            current = self
                .sm
                .region(r)
                .state
                .map(|owner| self.sm.vertex(owner).region);
        }
        None
    }

    /// Number of composite states enclosing `region`.
    fn region_depth(&self, region: RegionId) -> usize {
        let mut depth = 0;
        let mut current = self.sm.region(region).state;
        while let Some(owner) = current {
            depth += 1;
            current = self.sm.region(self.sm.vertex(owner).region).state;
        }
        depth
    }
}
