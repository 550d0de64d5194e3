use std::path::PathBuf;

use ai_bt::TreeError;
use ai_perception::PerceptionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnemyError {
    #[error("failed to read tuning file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning YAML")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid tuning value `{field}`: {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    #[error("agent {0} is already registered")]
    DuplicateAgent(u64),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Perception(#[from] PerceptionError),
}
