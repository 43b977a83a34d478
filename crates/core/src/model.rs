//! State machine model: regions, vertices, transitions and the
//! event/guard/action entities hanging off transitions.
//!
//! All entities are owned by the [`StateMachine`] arena and refer to each
//! other through typed indices. Every entity also carries a string id of the
//! form `"{machine_id}.{type}{ordinal}"`, unique within the machine and
//! assigned once at creation.

use std::collections::HashMap;

// ──────────────────────────────────────────────
// Handles
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuardId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

/// What a string id points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Region(RegionId),
    Vertex(VertexId),
    Transition(TransitionId),
    Event(EventId),
    Guard(GuardId),
    Action(ActionId),
}

/// Borrowed view of any entity, as returned by [`StateMachine::entity`].
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Region(&'a Region),
    Vertex(&'a Vertex),
    Transition(&'a Transition),
    Event(&'a Event),
    Guard(&'a Guard),
    Action(&'a Action),
}

// ──────────────────────────────────────────────
// Entities
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Owning state; `None` for the machine's top region.
    pub state: Option<VertexId>,
    pub initial_state: VertexId,
    pub terminal_state: VertexId,
    /// States and choices, in declaration order.
    pub sub_vertices: Vec<VertexId>,
    pub transitions: Vec<TransitionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateType {
    Simple,
    Composite,
}

impl StateType {
    pub fn as_str(self) -> &'static str {
        match self {
            StateType::Simple => "Simple",
            StateType::Composite => "Composite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionType {
    External,
    Internal,
    Local,
}

impl TransitionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionType::External => "External",
            TransitionType::Internal => "Internal",
            TransitionType::Local => "Local",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateData {
    /// `Composite` exactly when `sub_regions` is non-empty.
    pub type_: StateType,
    pub entry_actions: Vec<ActionId>,
    pub exit_actions: Vec<ActionId>,
    pub sub_regions: Vec<RegionId>,
}

impl Default for StateData {
    fn default() -> Self {
        StateData {
            type_: StateType::Simple,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            sub_regions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VertexKind {
    State(StateData),
    Choice,
    InitialState,
    TerminalState,
}

impl VertexKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            VertexKind::State(_) => EntityType::State,
            VertexKind::Choice => EntityType::Choice,
            VertexKind::InitialState => EntityType::InitialState,
            VertexKind::TerminalState => EntityType::TerminalState,
        }
    }
}

/// A transition endpoint: a state or a pseudostate.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub stereotype: Option<String>,
    pub region: RegionId,
    pub incoming_transitions: Vec<TransitionId>,
    pub outgoing_transitions: Vec<TransitionId>,
    pub kind: VertexKind,
}

impl Vertex {
    pub fn state(&self) -> Option<&StateData> {
        match &self.kind {
            VertexKind::State(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_state(&self) -> bool {
        matches!(self.kind, VertexKind::State(_))
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, VertexKind::Choice)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: String,
    pub source: VertexId,
    pub target: VertexId,
    pub type_: TransitionType,
    pub stereotype: Option<String>,
    pub trigger: Option<EventId>,
    pub guard: Option<GuardId>,
    pub action: Option<ActionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    pub id: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub model_version_major: u32,
    pub model_version_minor: u32,
    /// Path of the diagram the model was built from, when known.
    pub source_diagram: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            model_version_major: 1,
            model_version_minor: 0,
            source_diagram: None,
        }
    }
}

// ──────────────────────────────────────────────
// Ids
// ──────────────────────────────────────────────

/// Entity types, as they appear in generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Region,
    State,
    Choice,
    InitialState,
    TerminalState,
    Transition,
    Event,
    Guard,
    Action,
}

impl EntityType {
    const COUNT: usize = 9;

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Region => "region",
            EntityType::State => "state",
            EntityType::Choice => "choice",
            EntityType::InitialState => "initialstate",
            EntityType::TerminalState => "terminalstate",
            EntityType::Transition => "transition",
            EntityType::Event => "event",
            EntityType::Guard => "guard",
            EntityType::Action => "action",
        }
    }
}

/// One counter per entity type; ordinals start at 1.
#[derive(Debug, Clone, Default, PartialEq)]
struct IdCounters([usize; EntityType::COUNT]);

impl IdCounters {
    fn next(&mut self, ty: EntityType) -> usize {
        let counter = &mut self.0[ty as usize];
        *counter += 1;
        *counter
    }
}

// ──────────────────────────────────────────────
// StateMachine
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StateMachine {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub metadata: Metadata,
    region: RegionId,
    regions: Vec<Region>,
    vertices: Vec<Vertex>,
    transitions: Vec<Transition>,
    events: Vec<Event>,
    guards: Vec<Guard>,
    actions: Vec<Action>,
    index: HashMap<String, EntityRef>,
    counters: IdCounters,
}

/// Optional parts of a new transition.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransitionParts {
    pub stereotype: Option<String>,
    pub trigger: Option<String>,
    pub guard: Option<String>,
    pub action: Option<String>,
}

impl StateMachine {
    /// An empty machine: just the top region and its pseudostates.
    pub(crate) fn new(id: &str, name: &str, metadata: Metadata) -> Self {
        let mut sm = StateMachine {
            id: id.to_owned(),
            name: name.to_owned(),
            description: None,
            metadata,
            region: RegionId(0),
            regions: Vec::new(),
            vertices: Vec::new(),
            transitions: Vec::new(),
            events: Vec::new(),
            guards: Vec::new(),
            actions: Vec::new(),
            index: HashMap::new(),
            counters: IdCounters::default(),
        };
        sm.region = sm.add_region(None);
        sm
    }

    fn mint(&mut self, ty: EntityType, target: EntityRef) -> String {
        let id = format!("{}.{}{}", self.id, ty.as_str(), self.counters.next(ty));
        tracing::debug!(id = %id, "entity created");
        self.index.insert(id.clone(), target);
        id
    }

    /// A region with its own initial and terminal pseudostates.
    fn add_region(&mut self, owner: Option<VertexId>) -> RegionId {
        let rid = RegionId(self.regions.len());
        let id = self.mint(EntityType::Region, EntityRef::Region(rid));
        let initial_state = self.push_vertex(rid, None, VertexKind::InitialState);
        let terminal_state = self.push_vertex(rid, None, VertexKind::TerminalState);
        self.regions.push(Region {
            id,
            name: None,
            description: None,
            state: owner,
            initial_state,
            terminal_state,
            sub_vertices: Vec::new(),
            transitions: Vec::new(),
        });
        rid
    }

    fn push_vertex(&mut self, region: RegionId, name: Option<&str>, kind: VertexKind) -> VertexId {
        let vid = VertexId(self.vertices.len());
        let id = self.mint(kind.entity_type(), EntityRef::Vertex(vid));
        self.vertices.push(Vertex {
            id,
            name: name.map(str::to_owned),
            description: None,
            stereotype: None,
            region,
            incoming_transitions: Vec::new(),
            outgoing_transitions: Vec::new(),
            kind,
        });
        vid
    }

    /// Adds a named state or choice to `region`.
    pub(crate) fn add_vertex(&mut self, region: RegionId, name: &str, kind: VertexKind) -> VertexId {
        let vid = self.push_vertex(region, Some(name), kind);
        self.regions[region.0].sub_vertices.push(vid);
        vid
    }

    /// Creates a sub-region owned by `state`, which becomes composite.
    pub(crate) fn add_sub_region(&mut self, state: VertexId) -> RegionId {
        let rid = self.add_region(Some(state));
        if let VertexKind::State(data) = &mut self.vertices[state.0].kind {
            data.sub_regions.push(rid);
            data.type_ = StateType::Composite;
        }
        rid
    }

    pub(crate) fn add_action(&mut self, text: &str) -> ActionId {
        let aid = ActionId(self.actions.len());
        let id = self.mint(EntityType::Action, EntityRef::Action(aid));
        self.actions.push(Action {
            id,
            text: text.to_owned(),
        });
        aid
    }

    fn add_event(&mut self, name: &str) -> EventId {
        let eid = EventId(self.events.len());
        let id = self.mint(EntityType::Event, EntityRef::Event(eid));
        self.events.push(Event {
            id,
            name: name.to_owned(),
        });
        eid
    }

    fn add_guard(&mut self, condition: &str) -> GuardId {
        let gid = GuardId(self.guards.len());
        let id = self.mint(EntityType::Guard, EntityRef::Guard(gid));
        self.guards.push(Guard {
            id,
            condition: condition.to_owned(),
        });
        gid
    }

    /// Adds a transition owned by `region` and links it into both endpoints.
    pub(crate) fn add_transition(
        &mut self,
        region: RegionId,
        source: VertexId,
        target: VertexId,
        parts: TransitionParts,
    ) -> TransitionId {
        let tid = TransitionId(self.transitions.len());
        let id = self.mint(EntityType::Transition, EntityRef::Transition(tid));
        let trigger = parts.trigger.as_deref().map(|t| self.add_event(t));
        let guard = parts.guard.as_deref().map(|g| self.add_guard(g));
        let action = parts.action.as_deref().map(|a| self.add_action(a));
        self.transitions.push(Transition {
            id,
            source,
            target,
            type_: TransitionType::Internal,
            stereotype: parts.stereotype,
            trigger,
            guard,
            action,
        });
        self.regions[region.0].transitions.push(tid);
        self.vertices[source.0].outgoing_transitions.push(tid);
        self.vertices[target.0].incoming_transitions.push(tid);
        tid
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }

    /// The state or choice named `name` declared directly in `region`.
    pub fn lookup(&self, region: RegionId, name: &str) -> Option<VertexId> {
        self.regions[region.0]
            .sub_vertices
            .iter()
            .copied()
            .find(|&v| self.vertices[v.0].name.as_deref() == Some(name))
    }

    // -- Queries -----------------------------------------------

    pub fn entity(&self, id: &str) -> Option<Entity<'_>> {
        let entity = match *self.index.get(id)? {
            EntityRef::Region(r) => Entity::Region(self.region(r)),
            EntityRef::Vertex(v) => Entity::Vertex(self.vertex(v)),
            EntityRef::Transition(t) => Entity::Transition(self.transition(t)),
            EntityRef::Event(e) => Entity::Event(self.event(e)),
            EntityRef::Guard(g) => Entity::Guard(self.guard(g)),
            EntityRef::Action(a) => Entity::Action(self.action(a)),
        };
        Some(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    pub fn top_region(&self) -> &Region {
        self.region(self.region)
    }

    pub fn top_region_id(&self) -> RegionId {
        self.region
    }

    // Handles come from this machine only; they index the arenas directly.

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.0]
    }

    pub fn event(&self, id: EventId) -> &Event {
        &self.events[id.0]
    }

    pub fn guard(&self, id: GuardId) -> &Guard {
        &self.guards[id.0]
    }

    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Every vertex, pseudostates included.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn states(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_state())
    }

    pub fn choices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_choice())
    }

    pub fn initial_states(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices
            .iter()
            .filter(|v| matches!(v.kind, VertexKind::InitialState))
    }

    pub fn terminal_states(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices
            .iter()
            .filter(|v| matches!(v.kind, VertexKind::TerminalState))
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn guards(&self) -> impl Iterator<Item = &Guard> {
        self.guards.iter()
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// The first state named `name`, searching all regions in creation order.
    pub fn find_state(&self, name: &str) -> Option<&Vertex> {
        self.states().find(|v| v.name.as_deref() == Some(name))
    }

    /// Handle of the first state named `name`.
    pub fn find_state_id(&self, name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.is_state() && v.name.as_deref() == Some(name))
            .map(VertexId)
    }

    /// States declared directly in `region`.
    pub fn region_states(&self, region: RegionId) -> impl Iterator<Item = &Vertex> {
        self.regions[region.0]
            .sub_vertices
            .iter()
            .map(|&v| &self.vertices[v.0])
            .filter(|v| v.is_state())
    }
}
