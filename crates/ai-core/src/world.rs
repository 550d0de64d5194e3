use crate::AgentId;

/// Read-only world access.
///
/// The core crate intentionally does not prescribe which queries a world must
/// expose; subsystems define extension traits on top of it (perception queries,
/// navigation and animation actuators, game flags).
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
