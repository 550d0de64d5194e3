//! Composite nodes.
//!
//! Both composites are stateless between ticks: every evaluation walks the
//! children from the first one, so a higher-priority branch whose precondition
//! starts holding pre-empts a lower-priority branch that was `Running`.

use ai_core::{Blackboard, NodeState, ScopeId, TickContext, WorldMut};

use crate::{Node, TreeError};

struct Children<W>
where
    W: WorldMut + 'static,
{
    nodes: Vec<Box<dyn Node<W>>>,
    scopes: Vec<ScopeId>,
}

impl<W> Children<W>
where
    W: WorldMut + 'static,
{
    fn new(nodes: Vec<Box<dyn Node<W>>>) -> Self {
        Self {
            nodes,
            scopes: Vec::new(),
        }
    }

    fn attach(
        &mut self,
        owner: &'static str,
        scope: ScopeId,
        blackboard: &mut Blackboard,
    ) -> Result<(), TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::EmptyComposite { label: owner });
        }
        self.scopes.clear();
        for child in self.nodes.iter_mut() {
            let child_scope = blackboard.add_scope(scope, child.label());
            child.attach(child_scope, blackboard)?;
            self.scopes.push(child_scope);
        }
        Ok(())
    }

    /// Evaluate children in order until `stop` says otherwise.
    fn run(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
        stop: impl Fn(NodeState) -> bool,
    ) -> Option<(usize, NodeState)> {
        for (i, child) in self.nodes.iter_mut().enumerate() {
            let state = child.evaluate(ctx, agent, world, blackboard);
            if let Some(scope) = self.scopes.get(i) {
                blackboard.record_state(*scope, state);
            }
            if stop(state) {
                return Some((i, state));
            }
        }
        None
    }

    fn reset(&mut self) {
        for c in self.nodes.iter_mut() {
            c.reset();
        }
    }

    fn halt_from(&mut self, first: usize) {
        for c in self.nodes.iter_mut().skip(first) {
            c.halt();
        }
    }
}

/// Priority selection: the first child that does not fail decides.
///
/// - `Success` or `Running` from a child stops the scan and is returned as-is.
/// - `Failure` moves on to the next child.
/// - All children failing (or no children at all) yields `Failure`.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    label: &'static str,
    children: Children<W>,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn Node<W>>>) -> Self {
        Self {
            label: "selector",
            children: Children::new(children),
        }
    }

    /// Label the selector; leaves can publish into it with `ScopeSelector::Named`.
    pub fn named(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn len(&self) -> usize {
        self.children.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.nodes.is_empty()
    }
}

impl<W> Node<W> for Selector<W>
where
    W: WorldMut + 'static,
{
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        self.children
            .run(ctx, agent, world, blackboard, |s| s != NodeState::Failure)
            .map_or(NodeState::Failure, |(_, state)| state)
    }

    fn attach(&mut self, scope: ScopeId, blackboard: &mut Blackboard) -> Result<(), TreeError> {
        self.children.attach(self.label, scope, blackboard)
    }

    fn reset(&mut self) {
        self.children.reset();
    }

    fn halt(&mut self) {
        self.children.halt_from(0);
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

/// Precondition gating: every child must succeed.
///
/// - `Failure` or `Running` from a child stops the scan and is returned as-is.
///   On `Failure` the children after it are [halted](Node::halt).
/// - `Success` moves on to the next child.
/// - All children succeeding yields `Success`; an empty sequence yields `Failure`.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    label: &'static str,
    children: Children<W>,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn Node<W>>>) -> Self {
        Self {
            label: "sequence",
            children: Children::new(children),
        }
    }

    pub fn named(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn len(&self) -> usize {
        self.children.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.nodes.is_empty()
    }
}

impl<W> Node<W> for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if self.children.nodes.is_empty() {
            return NodeState::Failure;
        }
        match self
            .children
            .run(ctx, agent, world, blackboard, |s| s != NodeState::Success)
        {
            Some((i, NodeState::Failure)) => {
                self.children.halt_from(i + 1);
                NodeState::Failure
            }
            Some((_, state)) => state,
            None => NodeState::Success,
        }
    }

    fn attach(&mut self, scope: ScopeId, blackboard: &mut Blackboard) -> Result<(), TreeError> {
        self.children.attach(self.label, scope, blackboard)
    }

    fn reset(&mut self) {
        self.children.reset();
    }

    fn halt(&mut self) {
        self.children.halt_from(0);
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

/// Shorthand for a boxed, labelled [`Selector`].
pub fn selector<W>(label: &'static str, children: Vec<Box<dyn Node<W>>>) -> Box<dyn Node<W>>
where
    W: WorldMut + 'static,
{
    Box::new(Selector::new(children).named(label))
}

/// Shorthand for a boxed, labelled [`Sequence`].
pub fn sequence<W>(label: &'static str, children: Vec<Box<dyn Node<W>>>) -> Box<dyn Node<W>>
where
    W: WorldMut + 'static,
{
    Box::new(Sequence::new(children).named(label))
}
