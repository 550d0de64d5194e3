#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ai_bt::{LeafScope, Node, ScopeSelector, TreeError};
use ai_core::{BbKey, Blackboard, NodeState, ScopeId, TickContext, WorldMut, WorldView};

#[derive(Debug, Default)]
pub struct World;

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1, 0)
}

/// Leaf whose result is controlled from the outside and which counts its
/// evaluations.
pub struct Scripted {
    pub label: &'static str,
    pub state: Rc<Cell<NodeState>>,
    pub calls: Rc<Cell<u32>>,
}

impl Scripted {
    pub fn new(label: &'static str, state: NodeState) -> (Self, Rc<Cell<NodeState>>, Rc<Cell<u32>>) {
        let s = Rc::new(Cell::new(state));
        let c = Rc::new(Cell::new(0));
        (
            Self {
                label,
                state: s.clone(),
                calls: c.clone(),
            },
            s,
            c,
        )
    }

    pub fn boxed(label: &'static str, state: NodeState) -> (Box<dyn Node<World>>, Rc<Cell<NodeState>>, Rc<Cell<u32>>) {
        let (node, s, c) = Self::new(label, state);
        (Box::new(node), s, c)
    }
}

impl Node<World> for Scripted {
    fn evaluate(&mut self, _: &TickContext, _: u64, _: &mut World, _: &mut Blackboard) -> NodeState {
        self.calls.set(self.calls.get() + 1);
        self.state.get()
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

/// Leaf that writes `value` under `key` into its publish scope and succeeds.
pub struct Publish {
    pub scope: LeafScope,
    pub key: BbKey<u32>,
    pub value: u32,
}

impl Publish {
    pub fn boxed(selector: ScopeSelector, key: BbKey<u32>, value: u32) -> Box<dyn Node<World>> {
        Box::new(Self {
            scope: LeafScope::new(selector),
            key,
            value,
        })
    }
}

impl Node<World> for Publish {
    fn evaluate(&mut self, _: &TickContext, _: u64, _: &mut World, bb: &mut Blackboard) -> NodeState {
        self.scope.publish(bb, self.key, self.value);
        NodeState::Success
    }

    fn attach(&mut self, scope: ScopeId, bb: &mut Blackboard) -> Result<(), TreeError> {
        self.scope.attach("publish", scope, bb)
    }

    fn label(&self) -> &'static str {
        "publish"
    }
}

/// Leaf that records what it can see under `key` on each tick.
pub struct Observe {
    pub scope: LeafScope,
    pub key: BbKey<u32>,
    pub seen: Rc<RefCell<Vec<Option<u32>>>>,
}

impl Observe {
    pub fn boxed(key: BbKey<u32>) -> (Box<dyn Node<World>>, Rc<RefCell<Vec<Option<u32>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        (
            Box::new(Self {
                scope: LeafScope::new(ScopeSelector::Own),
                key,
                seen: seen.clone(),
            }),
            seen,
        )
    }
}

impl Node<World> for Observe {
    fn evaluate(&mut self, _: &TickContext, _: u64, _: &mut World, bb: &mut Blackboard) -> NodeState {
        let value = self.scope.get(bb, self.key);
        self.seen.borrow_mut().push(value);
        NodeState::from_bool(value.is_some())
    }

    fn attach(&mut self, scope: ScopeId, bb: &mut Blackboard) -> Result<(), TreeError> {
        self.scope.attach("observe", scope, bb)
    }

    fn label(&self) -> &'static str {
        "observe"
    }
}

/// Leaf with a tick counter that returns `Running` until `limit` ticks pass.
pub struct Countdown {
    pub limit: u32,
    pub count: u32,
    pub resets: Rc<Cell<u32>>,
}

impl Node<World> for Countdown {
    fn evaluate(&mut self, _: &TickContext, _: u64, _: &mut World, _: &mut Blackboard) -> NodeState {
        self.count += 1;
        if self.count >= self.limit {
            NodeState::Success
        } else {
            NodeState::Running
        }
    }

    fn reset(&mut self) {
        self.count = 0;
        self.resets.set(self.resets.get() + 1);
    }

    fn label(&self) -> &'static str {
        "countdown"
    }
}

/// Leaf that runs forever and counts how often a sequence halted it.
pub struct Halting {
    pub ticks: u32,
    pub halts: Rc<Cell<u32>>,
}

impl Halting {
    pub fn boxed() -> (Box<dyn Node<World>>, Rc<Cell<u32>>) {
        let halts = Rc::new(Cell::new(0));
        (
            Box::new(Self {
                ticks: 0,
                halts: halts.clone(),
            }),
            halts,
        )
    }
}

impl Node<World> for Halting {
    fn evaluate(&mut self, _: &TickContext, _: u64, _: &mut World, _: &mut Blackboard) -> NodeState {
        self.ticks += 1;
        NodeState::Running
    }

    fn halt(&mut self) {
        self.ticks = 0;
        self.halts.set(self.halts.get() + 1);
    }

    fn label(&self) -> &'static str {
        "halting"
    }
}
