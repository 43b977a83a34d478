use serde::Serialize;

/// A parse error. Parsing stops at the first one; no partial tree is returned.
#[derive(Debug, Clone, Serialize, PartialEq, thiserror::Error)]
#[error("parse error @ [{file}:{line}:{column}] {message}")]
pub struct ParseError {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn new(file: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            file: file.to_owned(),
            line,
            column,
        }
    }

    /// The serialized fields plus `"kind": "parse"`.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert("kind".to_owned(), serde_json::json!("parse"));
        }
        value
    }
}

/// An error raised while turning a parse tree into a state machine model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A transition names a vertex that exists in no enclosing region and
    /// implicit state declaration is disabled.
    #[error("reference to undeclared vertex '{name}' at line {line}, column {column}")]
    UndeclaredVertex { name: String, line: u32, column: u32 },

    /// A `<<choice>>` declaration names a state already declared in the
    /// same region.
    #[error("'{name}' is already declared as a {existing} in this region (line {line})")]
    ConflictingDeclaration {
        name: String,
        existing: &'static str,
        line: u32,
    },

    /// A `<<choice>>` declaration carries a `{ ... }` body.
    #[error("choice '{name}' cannot own a region (line {line})")]
    ChoiceWithRegion { name: String, line: u32 },

    /// A production node is missing a child the builder needs. Only
    /// reachable with hand-built trees.
    #[error("malformed {production} node at line {line}: missing {missing}")]
    MalformedNode {
        production: String,
        missing: String,
        line: u32,
    },
}

impl BuildError {
    pub fn line(&self) -> u32 {
        match self {
            BuildError::UndeclaredVertex { line, .. }
            | BuildError::ConflictingDeclaration { line, .. }
            | BuildError::ChoiceWithRegion { line, .. }
            | BuildError::MalformedNode { line, .. } => *line,
        }
    }

    pub fn to_json_value(&self, file: &str) -> serde_json::Value {
        serde_json::json!({
            "file":    file,
            "kind":    "build",
            "line":    self.line(),
            "message": self.to_string(),
        })
    }
}

/// Any error from the read → parse → build pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("build error in '{file}': {source}")]
    Build {
        file: String,
        #[source]
        source: BuildError,
    },
}

impl Error {
    /// Serialize to JSON for machine-readable CLI output.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Error::Io { path, source } => serde_json::json!({
                "file":    path,
                "kind":    "io",
                "message": source.to_string(),
            }),
            Error::Parse(e) => e.to_json_value(),
            Error::Build { file, source } => source.to_json_value(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_location() {
        let e = ParseError::new("door.puml", 3, 7, "Unexpected symbols 'x'");
        assert_eq!(
            e.to_string(),
            "parse error @ [door.puml:3:7] Unexpected symbols 'x'"
        );
    }

    #[test]
    fn parse_error_json_has_all_fields() {
        let e = ParseError::new("door.puml", 2, 1, "boom");
        let v = e.to_json_value();
        assert_eq!(v["file"], "door.puml");
        assert_eq!(v["line"], 2);
        assert_eq!(v["column"], 1);
        assert_eq!(v["kind"], "parse");
        assert_eq!(v["message"], "boom");
    }

    #[test]
    fn build_error_json_uses_given_file() {
        let e = BuildError::UndeclaredVertex {
            name: "Ghost".to_owned(),
            line: 4,
            column: 9,
        };
        let v = e.to_json_value("door.puml");
        assert_eq!(v["file"], "door.puml");
        assert_eq!(v["line"], 4);
        assert!(v["message"].as_str().unwrap().contains("'Ghost'"));
    }
}
