use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use ai_core::{NodeState, ScopeId};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A small, allocation-friendly trace event.
///
/// This is intentionally "dumb data" so it can be recorded during simulation and
/// later rendered by tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    /// Stable id of the agent whose tree produced the event.
    pub agent: u64,
    pub node: Option<Cow<'static, str>>,
    /// Blackboard segment index of `node`.
    pub scope: Option<u32>,
    pub state: Option<NodeState>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            agent: 0,
            node: None,
            scope: None,
            state: None,
        }
    }

    /// Event describing the state a node reported during a tick.
    pub fn node_state(tick: u64, node: &'static str, scope: ScopeId, state: NodeState) -> Self {
        Self::new(tick, "bt.node")
            .with_node(node, scope)
            .with_state(state)
    }

    pub fn with_agent(mut self, agent: u64) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_node(mut self, node: &'static str, scope: ScopeId) -> Self {
        self.node = Some(Cow::Borrowed(node));
        self.scope = Some(scope.index() as u32);
        self
    }

    pub fn with_state(mut self, state: NodeState) -> Self {
        self.state = Some(state);
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards events to the `tracing` subscriber at `TRACE` level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&mut self, event: TraceEvent) {
        tracing::trace!(
            tick = event.tick,
            agent = event.agent,
            tag = %event.tag,
            node = event.node.as_deref().unwrap_or("-"),
            state = event.state.map(NodeState::as_str).unwrap_or("-"),
            "ai trace"
        );
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Events recorded for `tick`, in emission order.
    pub fn at_tick(&self, tick: u64) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Lets the caller keep a handle on a sink it gave away to a tree.
impl<T: TraceSink> TraceSink for Rc<RefCell<T>> {
    fn emit(&mut self, event: TraceEvent) {
        self.borrow_mut().emit(event);
    }
}
