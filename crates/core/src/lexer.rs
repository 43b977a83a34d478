//! Context-driven tokenizer.
//!
//! There is no fixed token stream: the parser asks for the next token and
//! says which kinds it will accept (`take`) and which it wants silently
//! dropped (`skip`). Priority is the position in `take ++ skip`.

use crate::source::{Position, SourceReader};
use crate::token::{Token, TokenKind};

pub struct Tokenizer {
    reader: SourceReader,
}

impl Tokenizer {
    pub fn new(src: &str) -> Self {
        Tokenizer {
            reader: SourceReader::new(src),
        }
    }

    /// Position of the next unread character.
    pub fn position(&self) -> Position {
        self.reader.position()
    }

    /// Returns the next token whose kind is in `take`, discarding any tokens
    /// whose kind is in `skip`.
    ///
    /// The result is `Eof` when the input is exhausted and `Unknown` when the
    /// remaining input matches no requested kind; it is the caller's job to
    /// turn either into an error.
    pub fn find_token(&mut self, take: &[TokenKind], skip: &[TokenKind]) -> Token {
        loop {
            let token = self.scan(take, skip);
            if skip.contains(&token.kind) {
                tracing::trace!(token = %token, "skipped");
                continue;
            }
            tracing::trace!(token = %token, "token");
            return token;
        }
    }

    fn scan(&mut self, take: &[TokenKind], skip: &[TokenKind]) -> Token {
        let start = self.reader.position();
        let mut text = String::new();

        // Start detection: accumulate until some requested kind matches.
        let (mut rank, mut kind) = loop {
            let Some(c) = self.reader.read_next() else {
                let kind = if text.is_empty() {
                    TokenKind::Eof
                } else {
                    TokenKind::Unknown
                };
                return Token::new(kind, text, start.line, start.column);
            };
            text.push(c);
            if let Some(hit) = classify(&text, take, skip) {
                break hit;
            }
        };

        // Maximal munch.
        while let Some(next) = self.reader.peek_next() {
            let mut longer = text.clone();
            longer.push(next);
            let Some((r, k)) = classify(&longer, take, skip) else {
                break;
            };
            let extends = k == kind || r < rank;
            let demotes = kind.is_keyword() && is_word_char(next);
            if !(extends || demotes) {
                break;
            }
            self.reader.read_next();
            text = longer;
            rank = r;
            kind = k;
        }

        Token::new(kind, text, start.line, start.column)
    }
}

/// First requested kind (by priority) whose pattern wholly matches `text`.
fn classify(text: &str, take: &[TokenKind], skip: &[TokenKind]) -> Option<(usize, TokenKind)> {
    take.iter()
        .chain(skip)
        .enumerate()
        .find(|(_, kind)| kind.matches(text))
        .map(|(rank, kind)| (rank, *kind))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    const WS: &[TokenKind] = &[Whitespace];
    const WS_NL: &[TokenKind] = &[Whitespace, Newline];

    #[test]
    fn empty_input_is_eof_at_origin() {
        let mut t = Tokenizer::new("");
        let tok = t.find_token(&[KeywordStartUml], WS);
        assert_eq!(tok, Token::new(Eof, "", 1, 1));
    }

    #[test]
    fn skipped_whitespace_moves_start_column() {
        let mut t = Tokenizer::new("   @startuml");
        let tok = t.find_token(&[KeywordStartUml], WS);
        assert_eq!(tok, Token::new(KeywordStartUml, "@startuml", 1, 4));
    }

    #[test]
    fn leading_newline_is_skipped() {
        let mut t = Tokenizer::new("\n@startuml");
        let tok = t.find_token(&[KeywordStartUml], WS_NL);
        assert_eq!(tok, Token::new(KeywordStartUml, "@startuml", 2, 1));
    }

    #[test]
    fn keyword_beats_name_by_priority() {
        let mut t = Tokenizer::new("state Idle");
        let tok = t.find_token(&[KeywordState, Name], WS_NL);
        assert_eq!(tok.kind, KeywordState);
        assert_eq!(tok.text, "state");
        let tok = t.find_token(&[Name], WS);
        assert_eq!(tok, Token::new(Name, "Idle", 1, 7));
    }

    #[test]
    fn keyword_prefix_of_identifier_lexes_as_name() {
        let mut t = Tokenizer::new("stateful --> B");
        let tok = t.find_token(&[KeywordState, Name], WS_NL);
        assert_eq!(tok, Token::new(Name, "stateful", 1, 1));
        let tok = t.find_token(&[Arrow], WS);
        assert_eq!(tok.text, "-->");
    }

    #[test]
    fn keyword_followed_by_punctuation_stays_keyword() {
        let mut t = Tokenizer::new("entry / open()");
        let tok = t.find_token(&[KeywordEntry, KeywordExit, Label], WS);
        assert_eq!(tok.kind, KeywordEntry);
        let tok = t.find_token(&[ForwardSlash], WS);
        assert_eq!(tok.kind, ForwardSlash);
        let tok = t.find_token(&[Behavior], WS);
        assert_eq!(tok.text, "open()");
    }

    #[test]
    fn label_starting_with_keyword_is_a_label() {
        let mut t = Tokenizer::new("entryway is open\n");
        let tok = t.find_token(&[KeywordEntry, KeywordExit, Label], WS);
        assert_eq!(tok, Token::new(Label, "entryway is open", 1, 1));
    }

    #[test]
    fn guard_stops_at_closing_bracket() {
        let mut t = Tokenizer::new("[x > 0]");
        assert_eq!(t.find_token(&[OpenSquareBracket], WS).kind, OpenSquareBracket);
        let guard = t.find_token(&[Guard], WS);
        assert_eq!(guard, Token::new(Guard, "x > 0", 1, 2));
        assert_eq!(t.find_token(&[CloseSquareBracket], WS).kind, CloseSquareBracket);
    }

    #[test]
    fn newline_runs_are_one_token() {
        let mut t = Tokenizer::new("\n\n\nA");
        let tok = t.find_token(&[Newline, Name], WS);
        assert_eq!(tok, Token::new(Newline, "\n\n\n", 1, 1));
        assert_eq!(t.find_token(&[Name], WS), Token::new(Name, "A", 4, 1));
    }

    #[test]
    fn carriage_return_joins_the_newline() {
        let mut t = Tokenizer::new("\r\nA");
        let tok = t.find_token(&[Newline, Name], WS);
        assert_eq!(tok.kind, Newline);
        assert_eq!(tok.text, "\r\n");
        assert_eq!(t.find_token(&[Name], WS), Token::new(Name, "A", 2, 1));
    }

    #[test]
    fn unmatched_text_at_end_is_unknown() {
        let mut t = Tokenizer::new("hello");
        let tok = t.find_token(&[KeywordStartUml], WS);
        assert_eq!(tok, Token::new(Unknown, "hello", 1, 1));
    }

    #[test]
    fn initial_final_state_marker() {
        let mut t = Tokenizer::new("[*] --> Idle");
        let tok = t.find_token(&[InitialFinalState, Name], WS_NL);
        assert_eq!(tok, Token::new(InitialFinalState, "[*]", 1, 1));
    }

    #[test]
    fn specific_stereotype_outranks_generic() {
        let kinds = crate::token::STEREOTYPE_KINDS;
        let mut t = Tokenizer::new("<<choice>> <<custom>>");
        assert_eq!(t.find_token(kinds, WS).kind, StereotypeChoice);
        let tok = t.find_token(kinds, WS);
        assert_eq!(tok.kind, StereotypeAny);
        assert_eq!(tok.text, "<<custom>>");
    }

    #[test]
    fn block_comment_end_wins_over_apostrophe() {
        let mut t = Tokenizer::new("it's '/");
        let take = [EndBlockComment, Label, Apostrophe, Newline];
        assert_eq!(t.find_token(&take, WS).text, "it");
        assert_eq!(t.find_token(&take, WS).kind, Apostrophe);
        assert_eq!(t.find_token(&take, WS).text, "s ");
        assert_eq!(t.find_token(&take, WS).kind, EndBlockComment);
        assert_eq!(t.find_token(&take, WS).kind, Eof);
    }
}
