//! Interchange JSON for a built [`StateMachine`].
//!
//! Entities are emitted as flat arrays in creation order and refer to each
//! other by id. Optional fields are omitted when unset.

use crate::model::{
    Action, Event, Guard, Region, StateMachine, Transition, Vertex, VertexId, VertexKind,
};
use serde_json::{json, Map, Value};

pub fn to_json(sm: &StateMachine) -> Value {
    let mut m = Map::new();
    m.insert("kind".to_owned(), json!("StateMachine"));
    m.insert("id".to_owned(), json!(sm.id));
    m.insert("name".to_owned(), json!(sm.name));
    if let Some(d) = &sm.description {
        m.insert("description".to_owned(), json!(d));
    }
    m.insert("metadata".to_owned(), serialize_metadata(sm));
    m.insert("region".to_owned(), json!(sm.top_region().id));
    m.insert(
        "regions".to_owned(),
        Value::Array(sm.regions().map(|r| serialize_region(sm, r)).collect()),
    );
    m.insert(
        "vertices".to_owned(),
        Value::Array(sm.vertices().map(|v| serialize_vertex(sm, v)).collect()),
    );
    m.insert(
        "transitions".to_owned(),
        Value::Array(sm.transitions().map(|t| serialize_transition(sm, t)).collect()),
    );
    m.insert(
        "events".to_owned(),
        Value::Array(sm.events().map(serialize_event).collect()),
    );
    m.insert(
        "guards".to_owned(),
        Value::Array(sm.guards().map(serialize_guard).collect()),
    );
    m.insert(
        "actions".to_owned(),
        Value::Array(sm.actions().map(serialize_action).collect()),
    );
    Value::Object(m)
}

/// Pretty-printed interchange text with a trailing newline.
pub fn to_json_string(sm: &StateMachine) -> String {
    let mut out = serde_json::to_string_pretty(&to_json(sm)).unwrap_or_default();
    out.push('\n');
    out
}

fn serialize_metadata(sm: &StateMachine) -> Value {
    let md = &sm.metadata;
    let mut m = Map::new();
    m.insert("model_version_major".to_owned(), json!(md.model_version_major));
    m.insert("model_version_minor".to_owned(), json!(md.model_version_minor));
    if let Some(src) = &md.source_diagram {
        m.insert("source_diagram".to_owned(), json!(src));
    }
    Value::Object(m)
}

fn vertex_ids(sm: &StateMachine, ids: &[VertexId]) -> Value {
    json!(ids.iter().map(|&v| sm.vertex(v).id.as_str()).collect::<Vec<_>>())
}

fn serialize_region(sm: &StateMachine, r: &Region) -> Value {
    let mut m = Map::new();
    m.insert("kind".to_owned(), json!("Region"));
    m.insert("id".to_owned(), json!(r.id));
    if let Some(n) = &r.name {
        m.insert("name".to_owned(), json!(n));
    }
    if let Some(d) = &r.description {
        m.insert("description".to_owned(), json!(d));
    }
    if let Some(s) = r.state {
        m.insert("state".to_owned(), json!(sm.vertex(s).id));
    }
    m.insert("initial_state".to_owned(), json!(sm.vertex(r.initial_state).id));
    m.insert("terminal_state".to_owned(), json!(sm.vertex(r.terminal_state).id));
    m.insert("sub_vertices".to_owned(), vertex_ids(sm, &r.sub_vertices));
    let transitions: Vec<&str> = r
        .transitions
        .iter()
        .map(|&t| sm.transition(t).id.as_str())
        .collect();
    m.insert("transitions".to_owned(), json!(transitions));
    Value::Object(m)
}

fn serialize_vertex(sm: &StateMachine, v: &Vertex) -> Value {
    let kind = match &v.kind {
        VertexKind::State(_) => "State",
        VertexKind::Choice => "Choice",
        VertexKind::InitialState => "InitialState",
        VertexKind::TerminalState => "TerminalState",
    };
    let mut m = Map::new();
    m.insert("kind".to_owned(), json!(kind));
    m.insert("id".to_owned(), json!(v.id));
    if let Some(n) = &v.name {
        m.insert("name".to_owned(), json!(n));
    }
    if let Some(d) = &v.description {
        m.insert("description".to_owned(), json!(d));
    }
    if let Some(s) = &v.stereotype {
        m.insert("stereotype".to_owned(), json!(s));
    }
    m.insert("region".to_owned(), json!(sm.region(v.region).id));
    let incoming: Vec<&str> = v
        .incoming_transitions
        .iter()
        .map(|&t| sm.transition(t).id.as_str())
        .collect();
    let outgoing: Vec<&str> = v
        .outgoing_transitions
        .iter()
        .map(|&t| sm.transition(t).id.as_str())
        .collect();
    m.insert("incoming_transitions".to_owned(), json!(incoming));
    m.insert("outgoing_transitions".to_owned(), json!(outgoing));

    if let VertexKind::State(data) = &v.kind {
        m.insert("type".to_owned(), json!(data.type_.as_str()));
        let entry: Vec<&str> = data
            .entry_actions
            .iter()
            .map(|&a| sm.action(a).id.as_str())
            .collect();
        let exit: Vec<&str> = data
            .exit_actions
            .iter()
            .map(|&a| sm.action(a).id.as_str())
            .collect();
        let regions: Vec<&str> = data
            .sub_regions
            .iter()
            .map(|&r| sm.region(r).id.as_str())
            .collect();
        m.insert("entry_actions".to_owned(), json!(entry));
        m.insert("exit_actions".to_owned(), json!(exit));
        m.insert("sub_regions".to_owned(), json!(regions));
    }
    Value::Object(m)
}

fn serialize_transition(sm: &StateMachine, t: &Transition) -> Value {
    let mut m = Map::new();
    m.insert("kind".to_owned(), json!("Transition"));
    m.insert("id".to_owned(), json!(t.id));
    m.insert("source".to_owned(), json!(sm.vertex(t.source).id));
    m.insert("target".to_owned(), json!(sm.vertex(t.target).id));
    m.insert("type".to_owned(), json!(t.type_.as_str()));
    if let Some(s) = &t.stereotype {
        m.insert("stereotype".to_owned(), json!(s));
    }
    if let Some(e) = t.trigger {
        m.insert("trigger".to_owned(), json!(sm.event(e).id));
    }
    if let Some(g) = t.guard {
        m.insert("guard".to_owned(), json!(sm.guard(g).id));
    }
    if let Some(a) = t.action {
        m.insert("action".to_owned(), json!(sm.action(a).id));
    }
    Value::Object(m)
}

fn serialize_event(e: &Event) -> Value {
    json!({ "kind": "Event", "id": e.id, "name": e.name })
}

fn serialize_guard(g: &Guard) -> Value {
    json!({ "kind": "Guard", "id": g.id, "condition": g.condition })
}

fn serialize_action(a: &Action) -> Value {
    json!({ "kind": "Action", "id": a.id, "text": a.text })
}
