use super::{closing, with_stereotypes, Parser, WS};
use crate::error::ParseError;
use crate::parse_tree::{NodeId, ParseTree};
use crate::token::{Token, TokenKind::{self, *}};

impl Parser {
    /// A statement opening with a name or `[*]`: the next token decides
    /// between a transition (`-->`) and a state label (`:`).
    pub(super) fn name_statement(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        first: Token,
        terminal: TokenKind,
    ) -> Result<Option<Token>, ParseError> {
        let token = self.expect(&[Arrow, Colon], WS)?;
        if token.kind == Colon {
            if first.kind == InitialFinalState {
                // `[*] : text` is accepted; the builder ignores it.
                tracing::debug!(line = first.start_line, "label on initial/final marker");
            }
            return self.state_label(tree, parent, first, token, terminal);
        }

        let node = self.open(tree, parent, TransitionDeclaration, &first);
        tree.add_child(node, first);
        tree.add_child(node, token);
        let target = self.expect(&[Name, InitialFinalState], WS)?;
        tree.add_child(node, target);

        let tail = [Colon, Newline, terminal];
        let mut token = self.expect(&with_stereotypes(&tail), WS)?;
        if token.kind.is_stereotype() {
            tree.add_child(node, token);
            token = self.expect(&tail, WS)?;
        }
        if token.kind != Colon {
            return Ok(closing(token, terminal));
        }
        tree.add_child(node, token);
        self.transition_label(tree, node, terminal)
    }

    /// `[TRIGGER] ["[" GUARD "]"] ["/" [BEHAVIOR]]` up to the end of the
    /// statement. An empty label adds no node.
    fn transition_label(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        terminal: TokenKind,
    ) -> Result<Option<Token>, ParseError> {
        let mut token = self.expect(
            &[terminal, Trigger, OpenSquareBracket, ForwardSlash, Newline],
            WS,
        )?;
        if token.kind == Newline || token.kind == terminal {
            return Ok(closing(token, terminal));
        }
        let node = self.open(tree, parent, TransitionLabel, &token);

        if token.kind == Trigger {
            tree.add_child(node, token);
            token = self.expect(&[terminal, OpenSquareBracket, ForwardSlash, Newline], WS)?;
        }

        if token.kind == OpenSquareBracket {
            tree.add_child(node, token);
            let guard = self.expect(&[Guard], WS)?;
            tree.add_child(node, guard);
            let close = self.expect(&[CloseSquareBracket], WS)?;
            tree.add_child(node, close);
            token = self.expect(&[terminal, ForwardSlash, Newline], WS)?;
        }

        if token.kind == ForwardSlash {
            tree.add_child(node, token);
            token = self.expect(&[terminal, Behavior, Newline], WS)?;
            if token.kind == Behavior {
                tree.add_child(node, token);
                token = self.expect(&[Newline, terminal], WS)?;
            }
        }

        Ok(closing(token, terminal))
    }
}
