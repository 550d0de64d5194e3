use ai_core::{AgentId, Blackboard, NodeState, ScopeId, TickContext, WorldMut};
use ai_tools::{TraceEvent, TraceSink};

use crate::{Node, TreeError};

/// A behaviour tree bound to its own blackboard.
///
/// Construction walks the node graph once, allocating one blackboard segment per
/// node and resolving every leaf's publish scope. A tree that constructs cleanly
/// never fails to evaluate.
pub struct Tree<W>
where
    W: WorldMut + 'static,
{
    root: Box<dyn Node<W>>,
    blackboard: Blackboard,
    last: Option<NodeState>,
    ticks: u64,
    trace: Option<Box<dyn TraceSink>>,
}

impl<W> Tree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(mut root: Box<dyn Node<W>>) -> Result<Self, TreeError> {
        let mut blackboard = Blackboard::new();
        blackboard.relabel(ScopeId::ROOT, root.label());
        root.attach(ScopeId::ROOT, &mut blackboard)?;
        tracing::debug!(
            root = root.label(),
            segments = blackboard.scope_count(),
            "behaviour tree built"
        );
        Ok(Self {
            root,
            blackboard,
            last: None,
            ticks: 0,
            trace: None,
        })
    }

    /// Report every visited node to `sink` after each evaluation.
    pub fn with_trace(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn set_trace(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.trace = sink;
    }

    /// Run one full traversal from the root.
    pub fn evaluate(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> NodeState {
        self.blackboard.begin_pass();
        let state = self
            .root
            .evaluate(ctx, agent, world, &mut self.blackboard);
        self.blackboard.record_state(ScopeId::ROOT, state);
        self.ticks += 1;
        self.last = Some(state);

        if let Some(sink) = self.trace.as_mut() {
            let id = agent.stable_id();
            for scope in self.blackboard.scopes() {
                let Some(visited) = self.blackboard.visited_state(scope) else {
                    continue;
                };
                let label = self.blackboard.label(scope).unwrap_or("node");
                sink.emit(TraceEvent::node_state(ctx.tick, label, scope, visited).with_agent(id));
            }
        }
        state
    }

    /// Forget everything learned at runtime: blackboard contents, node counters
    /// and the last status. The node graph and its scopes are kept.
    pub fn reset(&mut self) {
        self.blackboard.clear_all();
        self.root.reset();
        self.last = None;
        tracing::debug!(root = self.root.label(), "behaviour tree reset");
    }

    pub fn last_status(&self) -> Option<NodeState> {
        self.last
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn root_label(&self) -> &'static str {
        self.root.label()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }
}

impl<W> core::fmt::Debug for Tree<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root.label())
            .field("segments", &self.blackboard.scope_count())
            .field("last", &self.last)
            .field("ticks", &self.ticks)
            .finish()
    }
}
