// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Actor identity exported to git processes.

use serde::{Deserialize, Serialize};

fn default_name() -> String {
	"mirrorsync".to_string()
}

fn default_email() -> String {
	"mirrorsync@localhost".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActorConfigLayer {
	pub name: Option<String>,
	pub email: Option<String>,
}

impl ActorConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.name.is_some() {
			self.name = other.name;
		}
		if other.email.is_some() {
			self.email = other.email;
		}
	}

	pub fn finalize(self) -> ActorConfig {
		ActorConfig {
			name: self.name.unwrap_or_else(default_name),
			email: self.email.unwrap_or_else(default_email),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorConfig {
	pub name: String,
	pub email: String,
}

impl Default for ActorConfig {
	fn default() -> Self {
		Self {
			name: default_name(),
			email: default_email(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layer_finalize_defaults() {
		let config = ActorConfigLayer::default().finalize();
		assert_eq!(config, ActorConfig::default());
		assert_eq!(config.name, "mirrorsync");
	}

	#[test]
	fn test_merge_keeps_unset_fields() {
		let mut base = ActorConfigLayer {
			name: Some("github-actions".to_string()),
			email: Some("actions@github.com".to_string()),
		};
		base.merge(ActorConfigLayer {
			name: Some("mirror-bot".to_string()),
			email: None,
		});
		let config = base.finalize();
		assert_eq!(config.name, "mirror-bot");
		assert_eq!(config.email, "actions@github.com");
	}
}
