use ai_core::{Blackboard, NodeState, ScopeId, TickContext, WorldMut};

use crate::TreeError;

/// One evaluable unit of a behaviour tree.
pub trait Node<W>: 'static
where
    W: WorldMut + 'static,
{
    /// Evaluate for the current tick.
    ///
    /// Must not change the tree's shape. Missing blackboard data is a normal
    /// `Failure`, never a panic.
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> NodeState;

    /// Bind this node to its blackboard segment.
    ///
    /// Called exactly once by [`crate::Tree::new`]. Composites allocate a segment per
    /// child and recurse; leaves resolve the scope they publish into.
    fn attach(&mut self, _scope: ScopeId, _blackboard: &mut Blackboard) -> Result<(), TreeError> {
        Ok(())
    }

    /// Restore node-local counters to their construction-time values.
    fn reset(&mut self) {}

    /// A [`crate::Sequence`] failed before reaching this node.
    ///
    /// Leaves whose counters belong to one engagement drop them here. Paused
    /// leaves never fail, so a pause never halts anything.
    fn halt(&mut self) {}

    fn label(&self) -> &'static str {
        "node"
    }
}

impl<W> Node<W> for Box<dyn Node<W>>
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
        (**self).evaluate(ctx, agent, world, blackboard)
    }

    fn attach(&mut self, scope: ScopeId, blackboard: &mut Blackboard) -> Result<(), TreeError> {
        (**self).attach(scope, blackboard)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn halt(&mut self) {
        (**self).halt()
    }

    fn label(&self) -> &'static str {
        (**self).label()
    }
}
