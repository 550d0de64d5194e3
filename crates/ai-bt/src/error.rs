use thiserror::Error;

/// Tree construction errors. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("composite `{label}` has no children")]
    EmptyComposite { label: &'static str },

    #[error("node `{node}` publishes {distance} levels up but sits at depth {depth}")]
    ScopeOutOfRange {
        node: &'static str,
        distance: u16,
        depth: u16,
    },

    #[error("node `{node}` publishes into `{label}`, which is not one of its ancestors")]
    UnknownScope {
        node: &'static str,
        label: &'static str,
    },
}
