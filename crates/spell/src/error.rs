use ortho_config::ConfigError;
use thiserror::Error;

use crate::host::HostError;
use crate::oracle::LoadError;

/// Errors surfaced by [`crate::SpellEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
	/// The dictionary could not be loaded; the engine did not activate.
	#[error("failed to load dictionary: {0}")]
	Load(#[from] LoadError),
	/// The configuration snapshot is invalid.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The host rejected a correction edit.
	#[error(transparent)]
	Host(#[from] HostError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
