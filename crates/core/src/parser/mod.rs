//! Recursive-descent parser for state diagrams.
//!
//! The parser drives the tokenizer: every production asks for exactly the
//! token kinds it can accept next, so there is no separate token stream and
//! no backtracking. The first unexpected token aborts the parse.
use crate::error::ParseError;
use crate::lexer::Tokenizer;
use crate::parse_tree::{NodeId, ParseTree};
use crate::token::{Token, TokenKind, STEREOTYPE_KINDS};

mod notes;
mod states;
mod transitions;

pub(crate) use notes::fragment_text;

use TokenKind::*;

pub(crate) const WS: &[TokenKind] = &[Whitespace];
pub(crate) const WS_NL: &[TokenKind] = &[Whitespace, Newline];

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser {
    tokenizer: Tokenizer,
    file_name: String,
}

impl Parser {
    fn new(src: &str, file_name: &str) -> Self {
        Parser {
            tokenizer: Tokenizer::new(src),
            file_name: file_name.to_owned(),
        }
    }

    /// Next token, which must be one of `take`.
    fn expect(&mut self, take: &[TokenKind], skip: &[TokenKind]) -> Result<Token, ParseError> {
        let token = self.tokenizer.find_token(take, skip);
        if take.contains(&token.kind) {
            Ok(token)
        } else {
            Err(self.unexpected(&token, take))
        }
    }

    fn unexpected(&self, token: &Token, take: &[TokenKind]) -> ParseError {
        let expected = take
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let message = match token.kind {
            Eof => format!("Unexpected end of input. Expected one of [{}]", expected),
            _ => format!(
                "Unexpected symbols '{}'. Expected one of [{}]",
                token.text.lines().next().unwrap_or_default(),
                expected
            ),
        };
        ParseError::new(&self.file_name, token.start_line, token.start_col, message)
    }

    /// Adds a production node under `parent` positioned at `first`.
    fn open(&self, tree: &mut ParseTree, parent: NodeId, kind: TokenKind, first: &Token) -> NodeId {
        tracing::debug!(
            production = %kind,
            line = first.start_line,
            column = first.start_col,
            "production"
        );
        tree.add_child(parent, Token::production(kind, first))
    }

    /// Ends a statement: a newline, or the enclosing block's terminal, which
    /// is handed back so the block can close.
    fn end_statement(&mut self, terminal: TokenKind) -> Result<Option<Token>, ParseError> {
        let token = self.expect(&[Newline, terminal], WS)?;
        Ok(closing(token, terminal))
    }

    // -- Productions -------------------------------------------

    fn root(&mut self) -> Result<ParseTree, ParseError> {
        let start = self.expect(&[KeywordStartUml], WS_NL)?;
        let mut tree = ParseTree::new(Token::production(Root, &start));
        let root = tree.root();
        tree.add_child(root, start);

        let token = self.expect(&[Label, Newline], WS)?;
        if token.kind == Label {
            tree.add_child(root, token);
            self.expect(&[Newline], WS)?;
        }

        let end = self.declarations(&mut tree, root, KeywordEndUml)?;
        tree.add_child(root, end);
        Ok(tree)
    }

    /// Statements until `terminal`, which is returned unconsumed by the tree.
    fn declarations(
        &mut self,
        tree: &mut ParseTree,
        parent: NodeId,
        terminal: TokenKind,
    ) -> Result<Token, ParseError> {
        let take = [
            terminal,
            KeywordState,
            KeywordNote,
            StartBlockComment,
            Apostrophe,
            InitialFinalState,
            Name,
        ];
        let mut token = self.expect(&take, WS_NL)?;
        let node = self.open(tree, parent, Declarations, &token);
        loop {
            if token.kind == terminal {
                return Ok(token);
            }
            let closed = match token.kind {
                KeywordState => self.state_declaration(tree, node, token, terminal)?,
                KeywordNote => self.note_declaration(tree, node, token, terminal)?,
                StartBlockComment => self.block_comment(tree, node, token)?,
                Apostrophe => self.line_comment(tree, node, token)?,
                _ => self.name_statement(tree, node, token, terminal)?,
            };
            if let Some(end) = closed {
                return Ok(end);
            }
            token = self.expect(&take, WS_NL)?;
        }
    }
}

/// `Some(token)` when `token` is the block terminal.
fn closing(token: Token, terminal: TokenKind) -> Option<Token> {
    (token.kind == terminal).then_some(token)
}

/// Stereotype kinds followed by `rest`.
fn with_stereotypes(rest: &[TokenKind]) -> Vec<TokenKind> {
    STEREOTYPE_KINDS.iter().chain(rest).copied().collect()
}

/// Parses a whole diagram into a tree rooted at a `root` node.
pub fn parse(src: &str, file_name: &str) -> Result<ParseTree, ParseError> {
    Parser::new(src, file_name).root()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tree: &ParseTree, id: NodeId) -> Vec<TokenKind> {
        tree.children(id).iter().map(|&c| tree.kind(c)).collect()
    }

    fn decls(tree: &ParseTree) -> NodeId {
        tree.find_child(tree.root(), Declarations)
            .expect("root has declarations")
    }

    #[test]
    fn minimal_diagram() {
        let tree = parse("@startuml\n@enduml\n", "t.puml").unwrap();
        assert_eq!(
            kinds(&tree, tree.root()),
            vec![KeywordStartUml, Declarations, KeywordEndUml]
        );
        assert_eq!(tree.token(tree.root()).start_line, 1);
    }

    #[test]
    fn diagram_name_is_kept() {
        let tree = parse("@startuml door\n@enduml", "t.puml").unwrap();
        let label = tree.find_child(tree.root(), Label).unwrap();
        assert_eq!(tree.token(label).text, "door");
    }

    #[test]
    fn leading_blank_lines_are_ignored() {
        let tree = parse("\n\n  @startuml\n@enduml", "t.puml").unwrap();
        let start = tree.children(tree.root())[0];
        assert_eq!(tree.token(start).start_line, 3);
        assert_eq!(tree.token(start).start_col, 3);
    }

    #[test]
    fn statements_in_order() {
        let src = "@startuml\n\
                   state Idle\n\
                   ' a comment\n\
                   [*] --> Idle\n\
                   Idle : waiting\n\
                   @enduml\n";
        let tree = parse(src, "t.puml").unwrap();
        assert_eq!(
            kinds(&tree, decls(&tree)),
            vec![StateDeclaration, Comment, TransitionDeclaration, StateLabel]
        );
    }

    #[test]
    fn missing_end_marker_reports_end_of_input() {
        let err = parse("@startuml\nstate A\n", "t.puml").unwrap_err();
        assert_eq!(err.file, "t.puml");
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 1);
        assert!(err.message.contains("end of input"), "{}", err.message);
        assert!(err.message.contains("KEYWORD_END_UML"), "{}", err.message);
    }

    #[test]
    fn missing_start_marker_reports_first_line() {
        let err = parse("state A\n@enduml\n", "t.puml").unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
        assert!(err.message.starts_with("Unexpected symbols 'state A'"), "{}", err.message);
    }

    #[test]
    fn unexpected_token_mid_statement() {
        let err = parse("@startuml\nA --> \n@enduml\n", "t.puml").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("NAME"), "{}", err.message);
    }

    #[test]
    fn production_nodes_take_first_token_position() {
        let tree = parse("@startuml\n\n   state Idle\n@enduml", "t.puml").unwrap();
        let decl = tree.find_child(decls(&tree), StateDeclaration).unwrap();
        assert_eq!(tree.token(decl).start_line, 3);
        assert_eq!(tree.token(decl).start_col, 4);
        assert_eq!(tree.token(decl).text, "");
    }

    #[test]
    fn enduml_may_close_the_last_statement() {
        let tree = parse("@startuml\nstate A @enduml", "t.puml").unwrap();
        assert_eq!(
            kinds(&tree, tree.root()),
            vec![KeywordStartUml, Declarations, KeywordEndUml]
        );
    }

    #[test]
    fn dump_lists_every_node() {
        let tree = parse("@startuml\nA --> B\n@enduml", "t.puml").unwrap();
        let dump = tree.to_string();
        assert!(dump.starts_with("└ <root>: \n  └ <KEYWORD_START_UML>: @startuml\n"));
        assert!(dump.contains("      └ <ARROW>: -->\n"));
        assert_eq!(dump.lines().count(), tree.len());
    }
}
