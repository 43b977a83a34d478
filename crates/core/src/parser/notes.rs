use super::{Parser, WS};
use crate::error::ParseError;
use crate::parse_tree::{NodeId, ParseTree};
use crate::token::{Token, TokenKind::{self, *}};

/// Free text inside notes and comments arrives in fragments, since a label
/// stops at any quote or apostrophe.
const TEXT: [TokenKind; 3] = [Label, Apostrophe, Quotation];

impl Parser {
    /// `note (left of | right of) NAME (: LABEL | NEWLINE ... end note)`
    /// or `note "LABEL" as NAME`.
    pub(super) fn note_declaration(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        keyword: Token,
        terminal: TokenKind,
    ) -> Result<Option<Token>, ParseError> {
        let token = self.expect(&[KeywordLeftOf, KeywordRightOf, Quotation], WS)?;

        if token.kind == Quotation {
            let node = self.open(tree, parent, FloatingNoteDeclaration, &keyword);
            tree.add_child(node, keyword);
            tree.add_child(node, token);
            let label = self.expect(&[Label], WS)?;
            tree.add_child(node, label);
            let quote = self.expect(&[Quotation], WS)?;
            tree.add_child(node, quote);
            let as_ = self.expect(&[KeywordAs], WS)?;
            tree.add_child(node, as_);
            let name = self.expect(&[Name], WS)?;
            tree.add_child(node, name);
            return self.end_statement(terminal);
        }

        let node = self.open(tree, parent, AnchoredNoteDeclaration, &keyword);
        tree.add_child(node, keyword);
        tree.add_child(node, token);
        let name = self.expect(&[Name], WS)?;
        tree.add_child(node, name);

        let token = self.expect(&[Colon, Newline], WS)?;
        if token.kind == Colon {
            tree.add_child(node, token);
            let label = self.expect(&[Label], WS)?;
            tree.add_child(node, label);
            return self.end_statement(terminal);
        }

        let body = [KeywordEnd, Newline, Label, Apostrophe, Quotation];
        loop {
            let token = self.expect(&body, WS)?;
            match token.kind {
                Newline => {}
                KeywordEnd => {
                    tree.add_child(node, token);
                    let note = self.expect(&[KeywordNote], WS)?;
                    tree.add_child(node, note);
                    return self.end_statement(terminal);
                }
                _ => {
                    tree.add_child(node, token);
                }
            }
        }
    }

    /// `' text` to the end of the line.
    pub(super) fn line_comment(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        apostrophe: Token,
    ) -> Result<Option<Token>, ParseError> {
        let node = self.open(tree, parent, Comment, &apostrophe);
        tree.add_child(node, apostrophe);
        let take = [Newline, Label, Apostrophe, Quotation];
        loop {
            let token = self.expect(&take, WS)?;
            if token.kind == Newline {
                return Ok(None);
            }
            tree.add_child(node, token);
        }
    }

    /// `/' ... '/`, possibly spanning lines.
    pub(super) fn block_comment(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        start: Token,
    ) -> Result<Option<Token>, ParseError> {
        let node = self.open(tree, parent, Comment, &start);
        tree.add_child(node, start);
        let take = [EndBlockComment, Newline, Label, Apostrophe, Quotation];
        loop {
            let token = self.expect(&take, WS)?;
            match token.kind {
                Newline => {}
                EndBlockComment => {
                    tree.add_child(node, token);
                    return Ok(None);
                }
                _ => {
                    tree.add_child(node, token);
                }
            }
        }
    }
}

/// Joins the text fragments of a note or comment node.
pub(crate) fn fragment_text(tree: &ParseTree, node: NodeId) -> String {
    tree.children(node)
        .iter()
        .map(|&c| tree.token(c))
        .filter(|t| TEXT.contains(&t.kind))
        .map(|t| t.text.as_str())
        .collect()
}
