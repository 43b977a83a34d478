use super::{closing, with_stereotypes, Parser, WS};
use crate::error::ParseError;
use crate::parse_tree::{NodeId, ParseTree};
use crate::token::{Token, TokenKind::{self, *}};

impl Parser {
    /// `state (NAME | "LABEL" as NAME) [<<stereotype>>] ({ ... } | : label | NEWLINE)`
    pub(super) fn state_declaration(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        keyword: Token,
        terminal: TokenKind,
    ) -> Result<Option<Token>, ParseError> {
        let node = self.open(tree, parent, StateDeclaration, &keyword);
        tree.add_child(node, keyword);

        let token = self.expect(&[Name, Quotation], WS)?;
        if token.kind == Quotation {
            tree.set_kind(node, StateAliasDeclaration);
            tree.add_child(node, token);
            let label = self.expect(&[Label], WS)?;
            tree.add_child(node, label);
            let quote = self.expect(&[Quotation], WS)?;
            tree.add_child(node, quote);
            let as_ = self.expect(&[KeywordAs], WS)?;
            tree.add_child(node, as_);
            let name = self.expect(&[Name], WS)?;
            tree.add_child(node, name);
        } else {
            tree.add_child(node, token);
        }

        let tail = [OpenCurlyBracket, Colon, Newline, terminal];
        let mut token = self.expect(&with_stereotypes(&tail), WS)?;
        if token.kind.is_stereotype() {
            tree.add_child(node, token);
            token = self.expect(&tail, WS)?;
        }

        match token.kind {
            OpenCurlyBracket => {
                tree.add_child(node, token);
                let close = self.declarations(tree, node, CloseCurlyBracket)?;
                tree.add_child(node, close);
                Ok(None)
            }
            Colon => {
                tree.add_child(node, token);
                self.label_or_action(tree, node, terminal)
            }
            _ => Ok(closing(token, terminal)),
        }
    }

    /// `NAME : (entry / BEHAVIOR | exit / BEHAVIOR | LABEL)`, with the name
    /// and colon already read.
    pub(super) fn state_label(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        name: Token,
        colon: Token,
        terminal: TokenKind,
    ) -> Result<Option<Token>, ParseError> {
        let node = self.open(tree, parent, StateLabel, &name);
        tree.add_child(node, name);
        tree.add_child(node, colon);
        self.label_or_action(tree, node, terminal)
    }

    /// `entry` and `exit` only open an action when a `/` follows them;
    /// otherwise the keyword starts the label.
    fn label_or_action(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        terminal: TokenKind,
    ) -> Result<Option<Token>, ParseError> {
        let token = self.expect(&[KeywordEntry, KeywordExit, Label], WS)?;
        let production = match token.kind {
            KeywordEntry => EntryAction,
            KeywordExit => ExitAction,
            _ => {
                tree.add_child(parent, token);
                return self.end_statement(terminal);
            }
        };
        let next = self.expect(&[ForwardSlash, terminal, Newline, Label], WS)?;
        match next.kind {
            ForwardSlash => {
                let node = self.open(tree, parent, production, &token);
                tree.add_child(node, token);
                tree.add_child(node, next);
                let behavior = self.expect(&[Behavior], WS)?;
                tree.add_child(node, behavior);
                self.end_statement(terminal)
            }
            Label => {
                tree.add_child(parent, keyword_label(&token, Some(&next)));
                self.end_statement(terminal)
            }
            _ => {
                tree.add_child(parent, keyword_label(&token, None));
                Ok(closing(next, terminal))
            }
        }
    }
}

/// Re-reads a keyword and the text after it as one label, keeping the
/// spacing between them.
fn keyword_label(keyword: &Token, rest: Option<&Token>) -> Token {
    let mut text = keyword.text.clone();
    if let Some(rest) = rest {
        let keyword_end = keyword.start_col + keyword.text.chars().count() as u32;
        let gap = rest.start_col.saturating_sub(keyword_end) as usize;
        text.push_str(&" ".repeat(gap));
        text.push_str(&rest.text);
    }
    Token::new(Label, text, keyword.start_line, keyword.start_col)
}
