use thiserror::Error;

/// Which collaborator call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LabelExtraction,
    Generation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::LabelExtraction => write!(f, "label-extraction"),
            Stage::Generation => write!(f, "generation"),
        }
    }
}

/// Error type for a single submission.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("no input provided")]
    NoInput,

    #[error("{stage} request failed: {detail}")]
    Upstream { stage: Stage, detail: String },

    #[error("generation response missing expected text field")]
    ResponseShape,
}

impl OrchestratorError {
    pub fn upstream(stage: Stage, detail: impl Into<String>) -> Self {
        OrchestratorError::Upstream {
            stage,
            detail: detail.into(),
        }
    }
}
