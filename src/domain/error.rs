// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// The two recognised fatal conditions of the pipeline, plus a
// malformed-dataset case. Everything else travels as a plain
// anyhow error and ends the process with a failure code.
//
// Exit code policy:
//   dataset missing / unreadable / malformed → 1
//   no checkpoint in the checkpoint directory → 0 ("nothing to do")

use std::process::ExitCode;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset '{path}' could not be loaded: {reason}")]
    DatasetNotFound { path: String, reason: String },

    #[error("dataset is malformed: {0}")]
    InvalidDataset(String),

    #[error("no checkpoint found in '{0}'")]
    NoCheckpointFound(String),
}

impl PipelineError {
    /// Short message shown to the user on stdout before exiting.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::DatasetNotFound { .. } | PipelineError::InvalidDataset(_) => {
                "No dataset was found."
            }
            PipelineError::NoCheckpointFound(_) => "No trained model was found.",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::DatasetNotFound { .. } | PipelineError::InvalidDataset(_) => 1,
            PipelineError::NoCheckpointFound(_) => 0,
        }
    }
}

/// Map the outcome of a pipeline run to the process exit status.
/// Errors that are not a `PipelineError` anywhere in their chain fail with 1.
pub fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => pipeline_error(e).map_or(1, PipelineError::exit_code),
    }
}

pub fn exit_code_for(result: &anyhow::Result<()>) -> ExitCode {
    ExitCode::from(exit_status(result))
}

/// Find the first `PipelineError` in an error chain, if any.
pub fn pipeline_error(err: &anyhow::Error) -> Option<&PipelineError> {
    err.chain().find_map(|cause| cause.downcast_ref::<PipelineError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_dataset_errors_exit_with_one() {
        let e = PipelineError::DatasetNotFound { path: "height.pkl".into(), reason: "gone".into() };
        assert_eq!(e.exit_code(), 1);
        assert_eq!(PipelineError::InvalidDataset("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_missing_checkpoint_exits_with_zero() {
        let r: anyhow::Result<()> = Err(PipelineError::NoCheckpointFound("out_models".into()).into());
        assert_eq!(exit_status(&r), 0);
    }

    #[test]
    fn test_pipeline_error_found_behind_context() {
        let r: anyhow::Result<()> = Err(PipelineError::NoCheckpointFound("m".into()))
            .context("restoring encoder");
        let e = r.as_ref().unwrap_err();
        assert!(matches!(pipeline_error(e), Some(PipelineError::NoCheckpointFound(_))));
    }

    #[test]
    fn test_other_errors_fail() {
        let r: anyhow::Result<()> = Err(anyhow::anyhow!("shape mismatch"));
        assert_eq!(exit_status(&r), 1);
        assert_eq!(exit_status(&Ok(())), 0);
    }
}
