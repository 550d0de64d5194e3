#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of evaluating a node for one tick.
///
/// There is no separate lifecycle: every tick is a fresh traversal, and a node
/// that returns [`NodeState::Running`] is simply re-entered on the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeState {
    Running,
    Success,
    Failure,
}

impl NodeState {
    pub fn is_running(self) -> bool {
        matches!(self, NodeState::Running)
    }

    pub fn is_success(self) -> bool {
        matches!(self, NodeState::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, NodeState::Failure)
    }

    /// `true` for `Success` and `Failure`.
    pub fn is_done(self) -> bool {
        !self.is_running()
    }

    pub fn from_bool(ok: bool) -> Self {
        if ok {
            NodeState::Success
        } else {
            NodeState::Failure
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeState::Running => "running",
            NodeState::Success => "success",
            NodeState::Failure => "failure",
        }
    }
}

impl core::fmt::Display for NodeState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
