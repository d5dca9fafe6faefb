// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML file, environment, command line.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::MirrorConfigLayer;
use crate::sections::{
	ActorConfigLayer, DestinationConfigLayer, LogFormat, LoggingConfigLayer, SourceConfigLayer,
	SyncConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	Cli = 100,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<MirrorConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<MirrorConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(MirrorConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is skipped.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub const SYSTEM_PATH: &'static str = "/etc/mirrorsync/config.toml";

	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(Self::SYSTEM_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<MirrorConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(MirrorConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: MirrorConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: MIRRORSYNC_<SECTION>_<FIELD>. Tokens are not read here; see
/// [`crate::load_config`].
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<MirrorConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(MirrorConfigLayer {
			source: Some(SourceConfigLayer {
				url: env_var("MIRRORSYNC_SOURCE_URL"),
				username: env_var("MIRRORSYNC_SOURCE_USERNAME"),
			}),
			destination: Some(DestinationConfigLayer {
				url: env_var("MIRRORSYNC_DESTINATION_URL"),
				username: env_var("MIRRORSYNC_DESTINATION_USERNAME"),
				disposable: env_bool("MIRRORSYNC_DESTINATION_DISPOSABLE"),
			}),
			sync: Some(SyncConfigLayer {
				network_timeout_secs: env_u64("MIRRORSYNC_SYNC_NETWORK_TIMEOUT_SECS")?,
				workspace_root: env_var("MIRRORSYNC_SYNC_WORKSPACE_ROOT").map(PathBuf::from),
				stale_after_secs: env_u64("MIRRORSYNC_SYNC_STALE_AFTER_SECS")?,
				prune: env_bool("MIRRORSYNC_SYNC_PRUNE"),
				verify: env_bool("MIRRORSYNC_SYNC_VERIFY"),
			}),
			actor: Some(ActorConfigLayer {
				name: env_var("MIRRORSYNC_ACTOR_NAME"),
				email: env_var("MIRRORSYNC_ACTOR_EMAIL"),
			}),
			logging: Some(LoggingConfigLayer {
				level: env_var("MIRRORSYNC_LOG_LEVEL"),
				format: env_log_format("MIRRORSYNC_LOG_FORMAT")?,
			}),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_log_format(name: &str) -> Result<Option<LogFormat>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|message| ConfigError::InvalidValue {
				key: name.to_string(),
				message,
			}),
		None => Ok(None),
	}
}

/// Values given as command-line flags. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
	pub source_url: Option<String>,
	pub destination_url: Option<String>,
	pub workspace_root: Option<PathBuf>,
	pub network_timeout_secs: Option<u64>,
	pub prune: Option<bool>,
	pub verify: Option<bool>,
	pub log_level: Option<String>,
	pub log_format: Option<LogFormat>,
}

/// Command-line source, the highest precedence.
pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"command-line"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<MirrorConfigLayer, ConfigError> {
		let o = self.overrides.clone();
		Ok(MirrorConfigLayer {
			source: Some(SourceConfigLayer {
				url: o.source_url,
				username: None,
			}),
			destination: Some(DestinationConfigLayer {
				url: o.destination_url,
				username: None,
				disposable: None,
			}),
			sync: Some(SyncConfigLayer {
				network_timeout_secs: o.network_timeout_secs,
				workspace_root: o.workspace_root,
				stale_after_secs: None,
				prune: o.prune,
				verify: o.verify,
			}),
			actor: None,
			logging: Some(LoggingConfigLayer {
				level: o.log_level,
				format: o.log_format,
			}),
		})
	}
}
