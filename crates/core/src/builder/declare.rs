use super::{stereotype_name, Build};
use crate::error::BuildError;
use crate::model::{RegionId, StateData, VertexId, VertexKind};
use crate::parse_tree::NodeId;
use crate::parser::fragment_text;
use crate::token::TokenKind::*;

impl Build<'_> {
    /// Declares every state and choice in a `declarations` block, recursing
    /// into composite bodies.
    pub(super) fn declare_block(&mut self, decls: NodeId, region: RegionId) -> Result<(), BuildError> {
        let tree = self.tree;
        for &stmt in tree.children(decls) {
            match tree.kind(stmt) {
                StateDeclaration | StateAliasDeclaration => self.declare_state(stmt, region)?,
                StateLabel => self.declare_label(stmt, region)?,
                AnchoredNoteDeclaration | FloatingNoteDeclaration => {
                    tracing::debug!(text = %fragment_text(tree, stmt), "note ignored");
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn declare_state(&mut self, stmt: NodeId, region: RegionId) -> Result<(), BuildError> {
        let name_node = self.child(stmt, Name)?;
        let name = self.token(name_node).text.clone();
        let line = self.token(stmt).start_line;
        let stereotype = self
            .tree
            .children(stmt)
            .iter()
            .copied()
            .find(|&c| self.tree.kind(c).is_stereotype());
        let is_choice = stereotype.is_some_and(|s| self.tree.kind(s) == StereotypeChoice);

        let vertex = self.declare_vertex(region, &name, is_choice, line)?;

        // A plain redeclaration of a choice keeps `choice`.
        if let Some(s) = stereotype {
            if is_choice || !self.sm.vertex(vertex).is_choice() {
                let text = stereotype_name(&self.token(s).text);
                self.sm.vertex_mut(vertex).stereotype = Some(text);
            }
        }
        if let Some(description) = self.last_text(stmt, Label) {
            self.sm.vertex_mut(vertex).description = Some(description);
        }
        self.declare_actions(stmt, vertex)?;

        if let Some(body) = self.tree.find_child(stmt, Declarations) {
            if self.sm.vertex(vertex).is_choice() {
                return Err(BuildError::ChoiceWithRegion { name, line });
            }
            let sub_region = self.sub_region(vertex);
            self.bodies.insert(body, sub_region);
            self.declare_block(body, sub_region)?;
        }
        Ok(())
    }

    /// `NAME : ...` declares `NAME` in the current region if needed.
    fn declare_label(&mut self, stmt: NodeId, region: RegionId) -> Result<(), BuildError> {
        let first = self
            .tree
            .children(stmt)
            .first()
            .copied()
            .ok_or_else(|| self.malformed(stmt, Name.as_str()))?;
        let token = self.token(first);
        if token.kind == InitialFinalState {
            tracing::warn!(line = token.start_line, "label on [*] ignored");
            return Ok(());
        }
        let name = token.text.clone();
        let line = token.start_line;

        let vertex = match self.sm.lookup(region, &name) {
            Some(v) => v,
            None => self.declare_vertex(region, &name, false, line)?,
        };
        if let Some(description) = self.last_text(stmt, Label) {
            self.sm.vertex_mut(vertex).description = Some(description);
        }
        self.declare_actions(stmt, vertex)
    }

    /// Finds or creates `name` in `region`. Only a `<<choice>>` declaration
    /// of an existing state conflicts; anything else merges into what is
    /// already there.
    fn declare_vertex(
        &mut self,
        region: RegionId,
        name: &str,
        is_choice: bool,
        line: u32,
    ) -> Result<VertexId, BuildError> {
        if let Some(existing) = self.sm.lookup(region, name) {
            let vertex = self.sm.vertex(existing);
            if is_choice && vertex.is_state() {
                return Err(BuildError::ConflictingDeclaration {
                    name: name.to_owned(),
                    existing: vertex.kind.entity_type().as_str(),
                    line,
                });
            }
            tracing::debug!(name, line, "merging redeclaration");
            return Ok(existing);
        }
        let kind = if is_choice {
            VertexKind::Choice
        } else {
            VertexKind::State(StateData::default())
        };
        Ok(self.sm.add_vertex(region, name, kind))
    }

    fn declare_actions(&mut self, stmt: NodeId, vertex: VertexId) -> Result<(), BuildError> {
        let tree = self.tree;
        for &child in tree.children(stmt) {
            let kind = tree.kind(child);
            if kind != EntryAction && kind != ExitAction {
                continue;
            }
            let behavior = self.child(child, Behavior)?;
            let text = self.token(behavior).text.trim().to_owned();
            if !self.sm.vertex(vertex).is_state() {
                tracing::warn!(
                    line = self.token(child).start_line,
                    "entry/exit action on a pseudostate ignored"
                );
                continue;
            }
            let action = self.sm.add_action(&text);
            if let VertexKind::State(data) = &mut self.sm.vertex_mut(vertex).kind {
                if kind == EntryAction {
                    data.entry_actions.push(action);
                } else {
                    data.exit_actions.push(action);
                }
            }
        }
        Ok(())
    }

    /// The state's first sub-region, created on first use.
    fn sub_region(&mut self, state: VertexId) -> RegionId {
        let existing = self
            .sm
            .vertex(state)
            .state()
            .and_then(|data| data.sub_regions.first().copied());
        match existing {
            Some(region) => region,
            None => self.sm.add_sub_region(state),
        }
    }
}
