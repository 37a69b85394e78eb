use cardcycle_config::ConfigError;
use cardcycle_core::CoreError;
use thiserror::Error;

/// Failures surfaced by [`crate::Tracker`].
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Nothing to export: there are no cards")]
    NothingToExport,
}

impl TrackerError {
    /// Whether the failure is a recoverable "not found" notice.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::Core(err) if err.is_not_found())
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
