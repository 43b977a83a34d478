use std::path::Path;
use std::process;

use fsmgen_core::compile::parse_file;
use fsmgen_core::parse_tree::{NodeId, ParseTree};
use serde_json::{json, Map, Value};

use super::report_core_error;
use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    match parse_file(file) {
        Ok(tree) => match output {
            OutputFormat::Text => print!("{}", tree),
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&node_json(&tree, tree.root()))
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        },
        Err(e) => {
            report_core_error(&e, output, quiet);
            process::exit(1);
        }
    }
}

/// Nested `{kind, text?, line, column, children?}` objects.
fn node_json(tree: &ParseTree, id: NodeId) -> Value {
    let token = tree.token(id);
    let mut obj = Map::new();
    obj.insert("kind".to_owned(), json!(token.kind.as_str()));
    if !token.text.is_empty() {
        obj.insert("text".to_owned(), json!(token.text));
    }
    obj.insert("line".to_owned(), json!(token.start_line));
    obj.insert("column".to_owned(), json!(token.start_col));
    let children = tree.children(id);
    if !children.is_empty() {
        let children: Vec<Value> = children.iter().map(|&c| node_json(tree, c)).collect();
        obj.insert("children".to_owned(), Value::Array(children));
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_tree_mirrors_the_dump() {
        let tree = fsmgen_core::parse("@startuml\nA --> B\n@enduml\n", "t.puml").unwrap();
        let v = node_json(&tree, tree.root());
        assert_eq!(v["kind"], "root");
        let decls = &v["children"][1];
        assert_eq!(decls["kind"], "declarations");
        let transition = &decls["children"][0];
        assert_eq!(transition["kind"], "transition_declaration");
        assert_eq!(transition["children"][1]["kind"], "ARROW");
        assert_eq!(transition["children"][1]["text"], "-->");
        assert_eq!(transition["children"][2]["column"], 7);
    }
}
