//! Read → parse → build. The first error stops the run.

use crate::builder::{BuildOptions, ModelBuilder};
use crate::error::Error;
use crate::model::StateMachine;
use crate::parse_tree::ParseTree;
use crate::parser;
use std::path::Path;

/// Compiles the diagram at `path`. When `options.source_diagram` is unset it
/// is filled with `path`.
pub fn compile(path: &Path, options: BuildOptions) -> Result<StateMachine, Error> {
    let src = read_source(path)?;
    let file_name = path.display().to_string();
    let options = BuildOptions {
        source_diagram: options.source_diagram.or_else(|| Some(file_name.clone())),
        ..options
    };
    compile_str(&src, &file_name, options)
}

/// Compiles diagram text; `file_name` only labels errors.
pub fn compile_str(src: &str, file_name: &str, options: BuildOptions) -> Result<StateMachine, Error> {
    let tree = parser::parse(src, file_name)?;
    build_tree(&tree, file_name, options)
}

/// Parses the diagram at `path` without building a model.
pub fn parse_file(path: &Path) -> Result<ParseTree, Error> {
    let src = read_source(path)?;
    Ok(parser::parse(&src, &path.display().to_string())?)
}

/// Builds a model from an already parsed tree.
pub fn build_tree(tree: &ParseTree, file_name: &str, options: BuildOptions) -> Result<StateMachine, Error> {
    ModelBuilder::new(options)
        .build(tree)
        .map_err(|source| Error::Build {
            file: file_name.to_owned(),
            source,
        })
}

fn read_source(path: &Path) -> Result<String, Error> {
    tracing::debug!(path = %path.display(), "reading diagram");
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })
}
