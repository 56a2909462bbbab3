//! Orchestration-level errors, composing the per-crate error type the
//! way `video_audio_common::ProcessingError` composes plugin errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Esi(#[from] esi_common::EsiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no inverse methods were configured for this run")]
    NoMethodsConfigured,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
