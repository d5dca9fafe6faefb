// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the mirror-sync tool.
//!
//! This crate provides:
//! - Layered configuration from defaults, a TOML file, the environment and
//!   command-line flags
//! - Consistent environment variable naming (`MIRRORSYNC_*`)
//! - Token loading from `MIRRORSYNC_{SOURCE,DESTINATION}_TOKEN[_FILE]` only
//!
//! # Usage
//!
//! ```ignore
//! use mirrorsync_config::{load_config, CliOverrides};
//!
//! let config = load_config(None, CliOverrides::default())?;
//! println!("mirroring {} -> {}", config.source.url, config.destination.endpoint.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::MirrorConfigLayer;
pub use sections::*;
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
};

use std::path::PathBuf;

use mirrorsync_common_config::{load_secret_env, SecretString};
use serde::Serialize;
use tracing::{debug, info};

pub const SOURCE_TOKEN_VAR: &str = "MIRRORSYNC_SOURCE_TOKEN";
pub const DESTINATION_TOKEN_VAR: &str = "MIRRORSYNC_DESTINATION_TOKEN";

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, Serialize)]
pub struct MirrorConfig {
	pub source: EndpointConfig,
	pub destination: DestinationConfig,
	pub sync: SyncConfig,
	pub actor: ActorConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Command-line flags
/// 2. Environment variables (`MIRRORSYNC_*`)
/// 3. Config file (`config_path`, or `/etc/mirrorsync/config.toml`)
/// 4. Built-in defaults
pub fn load_config(
	config_path: Option<PathBuf>,
	cli: CliOverrides,
) -> Result<MirrorConfig, ConfigError> {
	let toml = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};

	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(toml),
		Box::new(EnvSource),
		Box::new(CliSource::new(cli)),
	];

	finalize(merge_sources(sources)?)
}

/// Merge the given sources in precedence order.
pub fn merge_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<MirrorConfigLayer, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = MirrorConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}
	Ok(merged)
}

/// Finalize a merged layer, reading endpoint tokens from the environment.
pub fn finalize(layer: MirrorConfigLayer) -> Result<MirrorConfig, ConfigError> {
	let source_token =
		load_secret_env(SOURCE_TOKEN_VAR).map_err(|e| ConfigError::Secret(e.to_string()))?;
	let destination_token =
		load_secret_env(DESTINATION_TOKEN_VAR).map_err(|e| ConfigError::Secret(e.to_string()))?;

	resolve(layer, source_token, destination_token)
}

/// Finalize a merged layer with explicitly supplied tokens.
pub fn resolve(
	layer: MirrorConfigLayer,
	source_token: Option<SecretString>,
	destination_token: Option<SecretString>,
) -> Result<MirrorConfig, ConfigError> {
	let source = layer.source.unwrap_or_default().finalize(source_token)?;
	let destination = layer
		.destination
		.unwrap_or_default()
		.finalize(destination_token)?;
	let sync = layer.sync.unwrap_or_default().finalize();
	let actor = layer.actor.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&destination, &sync)?;

	Ok(MirrorConfig {
		source,
		destination,
		sync,
		actor,
		logging,
	})
}

impl MirrorConfig {
	/// Emit the resolved settings. Call once a subscriber is installed;
	/// loading itself happens before logging is configured.
	pub fn log_summary(&self) {
		info!(
			source = %self.source.url,
			destination = %self.destination.endpoint.url,
			source_token = self.source.token.is_some(),
			destination_token = self.destination.endpoint.token.is_some(),
			timeout_secs = self.sync.network_timeout_secs,
			prune = self.sync.prune,
			verify = self.sync.verify,
			"Mirror configuration loaded"
		);
	}
}

/// Validate cross-field configuration rules.
fn validate_config(destination: &DestinationConfig, sync: &SyncConfig) -> Result<(), ConfigError> {
	if !destination.disposable {
		return Err(ConfigError::Validation(
			"destination.disposable is false. Every run force-overwrites the destination's \
			 branches and tags; set MIRRORSYNC_DESTINATION_DISPOSABLE=true (or remove the \
			 setting) only for a destination that may be overwritten."
				.to_string(),
		));
	}

	if sync.network_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"sync.network_timeout_secs must be greater than zero".to_string(),
		));
	}

	Ok(())
}
