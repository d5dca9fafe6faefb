// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sync run configuration section.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 600;
const DEFAULT_STALE_AFTER_SECS: u64 = 86400; // 24 hours

fn default_workspace_root() -> PathBuf {
	std::env::temp_dir().join("mirrorsync")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncConfigLayer {
	pub network_timeout_secs: Option<u64>,
	pub workspace_root: Option<PathBuf>,
	pub stale_after_secs: Option<u64>,
	pub prune: Option<bool>,
	pub verify: Option<bool>,
}

impl SyncConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.network_timeout_secs.is_some() {
			self.network_timeout_secs = other.network_timeout_secs;
		}
		if other.workspace_root.is_some() {
			self.workspace_root = other.workspace_root;
		}
		if other.stale_after_secs.is_some() {
			self.stale_after_secs = other.stale_after_secs;
		}
		if other.prune.is_some() {
			self.prune = other.prune;
		}
		if other.verify.is_some() {
			self.verify = other.verify;
		}
	}

	pub fn finalize(self) -> SyncConfig {
		SyncConfig {
			network_timeout_secs: self
				.network_timeout_secs
				.unwrap_or(DEFAULT_NETWORK_TIMEOUT_SECS),
			workspace_root: self.workspace_root.unwrap_or_else(default_workspace_root),
			stale_after_secs: self.stale_after_secs.unwrap_or(DEFAULT_STALE_AFTER_SECS),
			prune: self.prune.unwrap_or(true),
			verify: self.verify.unwrap_or(false),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
	pub network_timeout_secs: u64,
	pub workspace_root: PathBuf,
	pub stale_after_secs: u64,
	pub prune: bool,
	pub verify: bool,
}

impl SyncConfig {
	pub fn network_timeout(&self) -> Duration {
		Duration::from_secs(self.network_timeout_secs)
	}

	pub fn stale_after(&self) -> Duration {
		Duration::from_secs(self.stale_after_secs)
	}
}

impl Default for SyncConfig {
	fn default() -> Self {
		SyncConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = SyncConfig::default();
		assert_eq!(config.network_timeout_secs, 600);
		assert_eq!(config.stale_after_secs, 86400);
		assert!(config.prune);
		assert!(!config.verify);
		assert!(config.workspace_root.ends_with("mirrorsync"));
	}

	#[test]
	fn test_durations() {
		let config = SyncConfigLayer {
			network_timeout_secs: Some(30),
			stale_after_secs: Some(120),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.network_timeout(), Duration::from_secs(30));
		assert_eq!(config.stale_after(), Duration::from_secs(120));
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = SyncConfigLayer {
			network_timeout_secs: Some(600),
			prune: Some(true),
			..Default::default()
		};
		base.merge(SyncConfigLayer {
			prune: Some(false),
			verify: Some(true),
			..Default::default()
		});
		assert_eq!(base.network_timeout_secs, Some(600));
		assert_eq!(base.prune, Some(false));
		assert_eq!(base.verify, Some(true));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: SyncConfigLayer = toml::from_str(
			r#"
workspace_root = "/var/lib/mirrorsync"
verify = true
"#,
		)
		.unwrap();
		assert_eq!(
			layer.workspace_root,
			Some(PathBuf::from("/var/lib/mirrorsync"))
		);
		assert_eq!(layer.verify, Some(true));
		assert!(layer.prune.is_none());
	}
}
