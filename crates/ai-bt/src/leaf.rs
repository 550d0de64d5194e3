use ai_core::{Blackboard, NodeState, ScopeId, TickContext, WorldMut};

use crate::{LeafScope, Node, ScopeSelector, TreeError};

/// Decision leaf backed by a closure. The closure sees the blackboard from the
/// leaf's own segment.
pub struct Condition<F> {
    label: &'static str,
    scope: LeafScope,
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(cond: F) -> Self {
        Self {
            label: "condition",
            scope: LeafScope::new(ScopeSelector::Own),
            cond,
        }
    }

    pub fn named(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl<F, W> Node<W> for Condition<F>
where
    F: FnMut(&TickContext, W::Agent, &W, &Blackboard, ScopeId) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        NodeState::from_bool((self.cond)(ctx, agent, &*world, &*blackboard, self.scope.own()))
    }

    fn attach(&mut self, scope: ScopeId, blackboard: &mut Blackboard) -> Result<(), TreeError> {
        self.scope.attach(self.label, scope, blackboard)
    }

    fn label(&self) -> &'static str {
        self.label
    }
}
