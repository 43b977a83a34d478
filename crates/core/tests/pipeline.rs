//! End-to-end: fixture diagrams through compile() into the model.

use fsmgen_core::model::{StateMachine, StateType, VertexKind};
use fsmgen_core::{compile, compile_str, BuildError, BuildOptions, Error};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

fn build(name: &str) -> StateMachine {
    compile(&fixture(name), BuildOptions::default())
        .unwrap_or_else(|e| panic!("{}: {}", name, e))
}

fn action_texts(sm: &StateMachine, ids: &[fsmgen_core::model::ActionId]) -> Vec<String> {
    ids.iter().map(|&a| sm.action(a).text.clone()).collect()
}

// ──────────────────────────────────────────────
// door.puml
// ──────────────────────────────────────────────

#[test]
fn door_counts() {
    let sm = build("door.puml");
    assert_eq!(sm.description.as_deref(), Some("Door"));
    assert_eq!(sm.states().count(), 3);
    assert_eq!(sm.transitions().count(), 6);
    assert_eq!(sm.events().count(), 5);
    assert_eq!(sm.guards().count(), 1);
    assert_eq!(sm.actions().count(), 5);
    assert_eq!(sm.regions().count(), 1);
}

#[test]
fn door_source_diagram_is_recorded() {
    let sm = build("door.puml");
    let source = sm.metadata.source_diagram.unwrap();
    assert!(source.ends_with("door.puml"), "{}", source);
}

#[test]
fn door_guarded_transition() {
    let sm = build("door.puml");
    let closed = sm.find_state("Closed").unwrap();
    let to_opened = closed
        .outgoing_transitions
        .iter()
        .map(|&t| sm.transition(t))
        .find(|t| sm.vertex(t.target).name.as_deref() == Some("Opened"))
        .unwrap();
    assert_eq!(sm.event(to_opened.trigger.unwrap()).name, "open");
    assert_eq!(sm.guard(to_opened.guard.unwrap()).condition, "not locked");
    assert_eq!(sm.action(to_opened.action.unwrap()).text, "swing()");
}

#[test]
fn door_locked_state() {
    let sm = build("door.puml");
    let locked = sm.find_state("Locked").unwrap();
    assert_eq!(locked.stereotype.as_deref(), Some("Secure"));
    let data = locked.state().unwrap();
    assert_eq!(action_texts(&sm, &data.entry_actions), vec!["led_on()"]);
    assert_eq!(action_texts(&sm, &data.exit_actions), vec!["led_off()"]);
    assert_eq!(
        sm.find_state("Opened").unwrap().description.as_deref(),
        Some("the door is open")
    );
}

#[test]
fn door_pseudostates() {
    let sm = build("door.puml");
    let top = sm.top_region();
    let initial = sm.vertex(top.initial_state);
    let terminal = sm.vertex(top.terminal_state);
    assert_eq!(initial.outgoing_transitions.len(), 1);
    assert_eq!(terminal.incoming_transitions.len(), 1);
    let first = sm.transition(initial.outgoing_transitions[0]);
    assert_eq!(sm.vertex(first.target).name.as_deref(), Some("Closed"));
}

// ──────────────────────────────────────────────
// composite.puml
// ──────────────────────────────────────────────

#[test]
fn composite_structure() {
    let sm = build("composite.puml");
    assert_eq!(sm.states().count(), 4);
    assert_eq!(sm.regions().count(), 3);
    assert_eq!(sm.transitions().count(), 7);

    let a = sm.find_state("A").unwrap();
    assert_eq!(a.description.as_deref(), Some("Region Entry and Exit"));
    let a_data = a.state().unwrap();
    assert_eq!(a_data.type_, StateType::Composite);
    let a_region = a_data.sub_regions[0];
    let names: Vec<_> = sm
        .region_states(a_region)
        .map(|v| v.name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "C"]);

    let c = sm.find_state("C").unwrap();
    let c_region = c.state().unwrap().sub_regions[0];
    assert_eq!(c.region, a_region);
    let c1 = sm.find_state("C1").unwrap();
    assert_eq!(c1.region, c_region);
    assert_eq!(c1.state().unwrap().type_, StateType::Simple);
}

#[test]
fn composite_actions_in_order() {
    let sm = build("composite.puml");
    for (name, entry, exit) in [
        ("A", "action(\"Entered State A\")", "action(\"Exited State A\")"),
        ("B", "action(\"Entered State B\")", "action(\"Exited State B\")"),
        ("C", "action(\"Entered State C\")", "action(\"Exited State C\")"),
    ] {
        let data = sm.find_state(name).unwrap().state().unwrap();
        assert_eq!(action_texts(&sm, &data.entry_actions), vec![entry], "{}", name);
        assert_eq!(action_texts(&sm, &data.exit_actions), vec![exit], "{}", name);
    }
}

#[test]
fn composite_markers_bind_to_their_own_region() {
    let sm = build("composite.puml");
    let a = sm.find_state("A").unwrap();
    let a_region = sm.region(a.state().unwrap().sub_regions[0]);
    let into_b = sm.transition(sm.vertex(a_region.initial_state).outgoing_transitions[0]);
    assert_eq!(sm.vertex(into_b.target).name.as_deref(), Some("B"));
    let from_c = sm.transition(sm.vertex(a_region.terminal_state).incoming_transitions[0]);
    assert_eq!(sm.vertex(from_c.source).name.as_deref(), Some("C"));
    assert_eq!(sm.vertex(sm.top_region().terminal_state).incoming_transitions.len(), 1);
}

// ──────────────────────────────────────────────
// choice.puml
// ──────────────────────────────────────────────

#[test]
fn choice_branches() {
    let sm = build("choice.puml");
    assert_eq!(sm.choices().count(), 1);
    assert_eq!(sm.states().count(), 4);
    let check = sm.choices().next().unwrap();
    assert!(matches!(check.kind, VertexKind::Choice));
    let guards: Vec<_> = check
        .outgoing_transitions
        .iter()
        .map(|&t| sm.guard(sm.transition(t).guard.unwrap()).condition.clone())
        .collect();
    assert_eq!(guards, vec!["value > limit", "else"]);
}

#[test]
fn choice_fixture_keeps_specific_stereotypes() {
    let sm = build("choice.puml");
    let fault = sm.find_state("Fault").unwrap();
    assert_eq!(fault.stereotype.as_deref(), Some("exitPoint"));
    let alarm = sm.transition(fault.incoming_transitions[0]);
    assert_eq!(sm.action(alarm.action.unwrap()).text, "raise_alarm()");
    assert!(alarm.trigger.is_none());
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

#[test]
fn missing_end_marker_fails_at_end_of_file() {
    let err = compile(&fixture("errors/missing_end.puml"), BuildOptions::default()).unwrap_err();
    let Error::Parse(e) = err else {
        panic!("expected a parse error, got {:?}", err);
    };
    assert_eq!((e.line, e.column), (4, 1));
    assert!(e.file.ends_with("missing_end.puml"));
}

#[test]
fn strict_build_rejects_undeclared_target() {
    let options = BuildOptions {
        implicit_states: false,
        ..BuildOptions::default()
    };
    let err = compile(&fixture("undeclared.puml"), options).unwrap_err();
    let Error::Build { source, .. } = err else {
        panic!("expected a build error, got {:?}", err);
    };
    assert_eq!(
        source,
        BuildError::UndeclaredVertex {
            name: "Unknown".to_owned(),
            line: 4,
            column: 11,
        }
    );
}

#[test]
fn implicit_build_accepts_undeclared_target() {
    let sm = build("undeclared.puml");
    assert!(sm.find_state("Unknown").is_some());
}

#[test]
fn custom_machine_id_prefixes_every_entity() {
    let options = BuildOptions {
        statemachine_id: "door".to_owned(),
        name: "Door".to_owned(),
        ..BuildOptions::default()
    };
    let sm = compile(&fixture("door.puml"), options).unwrap();
    assert_eq!(sm.name, "Door");
    assert!(sm.vertices().all(|v| v.id.starts_with("door.")));
    assert!(sm.transitions().all(|t| t.id.starts_with("door.transition")));
}

#[test]
fn crlf_input_builds_the_same_model() {
    let lf = "@startuml\nstate A\n[*] --> A : go\n@enduml\n";
    let crlf = lf.replace('\n', "\r\n");
    let a = compile_str(lf, "lf.puml", BuildOptions::default()).unwrap();
    let b = compile_str(&crlf, "crlf.puml", BuildOptions::default()).unwrap();
    assert_eq!(a, b);
}
