#![allow(clippy::result_large_err)]
//! fsmgen-core: state diagram front end.
//!
//! Turns PlantUML-style state diagrams into a [`StateMachine`] model:
//! a context-driven tokenizer, a recursive-descent parser producing an
//! arena parse tree, and a two-walk model builder.
//!
//! # Public API
//!
//! - [`compile()`] / [`compile_str()`] -- read, parse and build in one call
//! - [`parse()`] -- diagram text to [`ParseTree`]
//! - [`ModelBuilder`] / [`BuildOptions`] -- parse tree to [`StateMachine`]
//! - [`to_json()`] -- the model's interchange JSON
//! - [`Error`], [`ParseError`], [`BuildError`]

pub mod builder;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parse_tree;
pub mod parser;
pub mod serialize;
pub mod source;
pub mod token;

// ── Convenience re-exports: key types ────────────────────────────────

pub use builder::{BuildOptions, ModelBuilder};
pub use error::{BuildError, Error, ParseError};
pub use model::StateMachine;
pub use parse_tree::ParseTree;
pub use token::{Token, TokenKind};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use compile::{compile, compile_str};
pub use parser::parse;
pub use serialize::to_json;
