//! Token kinds, tokens, and the whole-string pattern for every terminal kind.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Synthetic
    Unknown,
    Eof,

    // Terminals
    Whitespace,
    Newline,
    KeywordStartUml,
    KeywordEndUml,
    KeywordState,
    KeywordAs,
    KeywordNote,
    KeywordLeftOf,
    KeywordRightOf,
    KeywordEnd,
    KeywordEntry,
    KeywordExit,
    /// `[*]`
    InitialFinalState,
    /// `-->`, `->`, `-up->`, `-[#red]->`
    Arrow,
    Name,
    Label,
    Trigger,
    Guard,
    Behavior,
    Colon,
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenSquareBracket,
    CloseSquareBracket,
    Quotation,
    Apostrophe,
    ForwardSlash,
    StartBlockComment,
    EndBlockComment,
    StereotypeAny,
    StereotypeChoice,
    StereotypeEnd,
    StereotypeEntryPoint,
    StereotypeExitPoint,
    StereotypeInputPin,
    StereotypeOutputPin,
    StereotypeExpansionInput,
    StereotypeExpansionOutput,

    // Productions
    Root,
    Declarations,
    StateDeclaration,
    StateAliasDeclaration,
    StateLabel,
    TransitionDeclaration,
    TransitionLabel,
    AnchoredNoteDeclaration,
    FloatingNoteDeclaration,
    Comment,
    EntryAction,
    ExitAction,
}

/// Stereotype kinds in match priority order: the specific UML pseudostate
/// markers first, the catch-all last.
pub const STEREOTYPE_KINDS: &[TokenKind] = &[
    TokenKind::StereotypeChoice,
    TokenKind::StereotypeEnd,
    TokenKind::StereotypeEntryPoint,
    TokenKind::StereotypeExitPoint,
    TokenKind::StereotypeInputPin,
    TokenKind::StereotypeOutputPin,
    TokenKind::StereotypeExpansionInput,
    TokenKind::StereotypeExpansionOutput,
    TokenKind::StereotypeAny,
];

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Unknown => "UNKNOWN",
            Eof => "EOF",
            Whitespace => "WHITESPACE",
            Newline => "NEWLINE",
            KeywordStartUml => "KEYWORD_START_UML",
            KeywordEndUml => "KEYWORD_END_UML",
            KeywordState => "KEYWORD_STATE",
            KeywordAs => "KEYWORD_AS",
            KeywordNote => "KEYWORD_NOTE",
            KeywordLeftOf => "KEYWORD_LEFT_OF",
            KeywordRightOf => "KEYWORD_RIGHT_OF",
            KeywordEnd => "KEYWORD_END",
            KeywordEntry => "KEYWORD_ENTRY",
            KeywordExit => "KEYWORD_EXIT",
            InitialFinalState => "INITIAL_FINAL_STATE",
            Arrow => "ARROW",
            Name => "NAME",
            Label => "LABEL",
            Trigger => "TRIGGER",
            Guard => "GUARD",
            Behavior => "BEHAVIOR",
            Colon => "COLON",
            OpenCurlyBracket => "OPEN_CURLY_BRACKET",
            CloseCurlyBracket => "CLOSE_CURLY_BRACKET",
            OpenSquareBracket => "OPEN_SQ_BRACKET",
            CloseSquareBracket => "CLOSE_SQ_BRACKET",
            Quotation => "QUOTATION",
            Apostrophe => "APOSTROPHE",
            ForwardSlash => "FORWARD_SLASH",
            StartBlockComment => "START_BLOCK_COMMENT",
            EndBlockComment => "END_BLOCK_COMMENT",
            StereotypeAny => "STEREOTYPE_ANY",
            StereotypeChoice => "STEREOTYPE_CHOICE",
            StereotypeEnd => "STEREOTYPE_END",
            StereotypeEntryPoint => "STEREOTYPE_ENTRY_POINT",
            StereotypeExitPoint => "STEREOTYPE_EXIT_POINT",
            StereotypeInputPin => "STEREOTYPE_INPUT_PIN",
            StereotypeOutputPin => "STEREOTYPE_OUTPUT_PIN",
            StereotypeExpansionInput => "STEREOTYPE_EXPANSION_INPUT",
            StereotypeExpansionOutput => "STEREOTYPE_EXPANSION_OUTPUT",
            Root => "root",
            Declarations => "declarations",
            StateDeclaration => "state_declaration",
            StateAliasDeclaration => "state_alias_declaration",
            StateLabel => "state_label",
            TransitionDeclaration => "transition_declaration",
            TransitionLabel => "transition_label",
            AnchoredNoteDeclaration => "anchored_note_declaration",
            FloatingNoteDeclaration => "floating_note_declaration",
            Comment => "comment",
            EntryAction => "entry_action",
            ExitAction => "exit_action",
        }
    }

    /// Pattern source for terminal kinds; `None` for synthetic and
    /// production kinds, which are never matched against text.
    fn pattern_source(self) -> Option<&'static str> {
        use TokenKind::*;
        let p = match self {
            Whitespace => r"[ \t\r]+",
            Newline => r"(?:\r?\n)+",
            KeywordStartUml => r"@startuml",
            KeywordEndUml => r"@enduml",
            KeywordState => r"state",
            KeywordAs => r"as",
            KeywordNote => r"note",
            KeywordLeftOf => r"left of",
            KeywordRightOf => r"right of",
            KeywordEnd => r"end",
            KeywordEntry => r"entry",
            KeywordExit => r"exit",
            InitialFinalState => r"\[\*\]",
            Arrow => r"-+(?:up|down|left|right)?(?:\[[^\]\n]*\])?-*>",
            Name => r"[A-Za-z0-9_]+",
            Label => r#"[^\s"'][^\n"']*"#,
            Trigger => r"[A-Za-z_][A-Za-z0-9_.]*",
            Guard => r"[^\s\]][^\]\n]*",
            Behavior => r"\S[^\n]*",
            Colon => r":",
            OpenCurlyBracket => r"\{",
            CloseCurlyBracket => r"\}",
            OpenSquareBracket => r"\[",
            CloseSquareBracket => r"\]",
            Quotation => r#"""#,
            Apostrophe => r"'",
            ForwardSlash => r"/",
            StartBlockComment => r"/'",
            EndBlockComment => r"'/",
            StereotypeAny => r"<<[^<>\n]+>>",
            StereotypeChoice => r"<<choice>>",
            StereotypeEnd => r"<<end>>",
            StereotypeEntryPoint => r"<<entryPoint>>",
            StereotypeExitPoint => r"<<exitPoint>>",
            StereotypeInputPin => r"<<inputPin>>",
            StereotypeOutputPin => r"<<outputPin>>",
            StereotypeExpansionInput => r"<<expansionInput>>",
            StereotypeExpansionOutput => r"<<expansionOutput>>",
            _ => return None,
        };
        Some(p)
    }

    pub fn is_terminal(self) -> bool {
        self.pattern_source().is_some()
    }

    /// Keywords give way to an identifier-like kind when followed by a word
    /// character (`stateful` is a name, not `state` + `ful`).
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KeywordStartUml
                | KeywordEndUml
                | KeywordState
                | KeywordAs
                | KeywordNote
                | KeywordLeftOf
                | KeywordRightOf
                | KeywordEnd
                | KeywordEntry
                | KeywordExit
        )
    }

    pub fn is_stereotype(self) -> bool {
        STEREOTYPE_KINDS.contains(&self)
    }

    /// Whether `text` wholly matches this kind's pattern.
    pub fn matches(self, text: &str) -> bool {
        PATTERNS.get(&self).is_some_and(|re| re.is_match(text))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TERMINAL_KINDS: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Newline,
    TokenKind::KeywordStartUml,
    TokenKind::KeywordEndUml,
    TokenKind::KeywordState,
    TokenKind::KeywordAs,
    TokenKind::KeywordNote,
    TokenKind::KeywordLeftOf,
    TokenKind::KeywordRightOf,
    TokenKind::KeywordEnd,
    TokenKind::KeywordEntry,
    TokenKind::KeywordExit,
    TokenKind::InitialFinalState,
    TokenKind::Arrow,
    TokenKind::Name,
    TokenKind::Label,
    TokenKind::Trigger,
    TokenKind::Guard,
    TokenKind::Behavior,
    TokenKind::Colon,
    TokenKind::OpenCurlyBracket,
    TokenKind::CloseCurlyBracket,
    TokenKind::OpenSquareBracket,
    TokenKind::CloseSquareBracket,
    TokenKind::Quotation,
    TokenKind::Apostrophe,
    TokenKind::ForwardSlash,
    TokenKind::StartBlockComment,
    TokenKind::EndBlockComment,
    TokenKind::StereotypeAny,
    TokenKind::StereotypeChoice,
    TokenKind::StereotypeEnd,
    TokenKind::StereotypeEntryPoint,
    TokenKind::StereotypeExitPoint,
    TokenKind::StereotypeInputPin,
    TokenKind::StereotypeOutputPin,
    TokenKind::StereotypeExpansionInput,
    TokenKind::StereotypeExpansionOutput,
];

static PATTERNS: Lazy<HashMap<TokenKind, Regex>> = Lazy::new(|| {
    TERMINAL_KINDS
        .iter()
        .filter_map(|&kind| {
            let src = kind.pattern_source()?;
            // Every pattern above is a fixed, valid regex.
            let re = Regex::new(&format!(r"\A(?:{})\z", src)).ok()?;
            Some((kind, re))
        })
        .collect()
});

/// A token: a terminal matched from source text, or a production label
/// synthesized by the parser for a parse-tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start_line: u32,
    pub start_col: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start_line: u32, start_col: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            start_line,
            start_col,
        }
    }

    /// A production token starting where `first` starts.
    pub fn production(kind: TokenKind, first: &Token) -> Self {
        Token::new(kind, "", first.start_line, first.start_col)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}:{},{}",
            self.kind,
            self.start_line,
            self.start_col,
            self.text.replace('\n', "\\n")
        )
    }
}
