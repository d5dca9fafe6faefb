// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source and destination repository sections.
//!
//! Tokens are never read from TOML or CLI flags. They are passed into
//! `finalize` after being loaded from `MIRRORSYNC_*_TOKEN[_FILE]`.

use mirrorsync_common_config::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourceConfigLayer {
	pub url: Option<String>,
	pub username: Option<String>,
}

impl SourceConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
	}

	pub fn finalize(self, token: Option<SecretString>) -> Result<EndpointConfig, ConfigError> {
		let url = require_url(self.url, "source.url", "MIRRORSYNC_SOURCE_URL")?;
		Ok(EndpointConfig {
			url,
			username: self.username,
			token,
		})
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DestinationConfigLayer {
	pub url: Option<String>,
	pub username: Option<String>,
	pub disposable: Option<bool>,
}

impl DestinationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.disposable.is_some() {
			self.disposable = other.disposable;
		}
	}

	pub fn finalize(self, token: Option<SecretString>) -> Result<DestinationConfig, ConfigError> {
		let url = require_url(self.url, "destination.url", "MIRRORSYNC_DESTINATION_URL")?;
		Ok(DestinationConfig {
			endpoint: EndpointConfig {
				url,
				username: self.username,
				token,
			},
			disposable: self.disposable.unwrap_or(true),
		})
	}
}

fn require_url(url: Option<String>, key: &str, env: &str) -> Result<String, ConfigError> {
	match url.map(|u| u.trim().to_string()) {
		Some(u) if !u.is_empty() => Ok(u),
		_ => Err(ConfigError::Validation(format!(
			"{key} is required (set it in the config file, {env}, or on the command line)"
		))),
	}
}

/// A resolved repository location plus its optional credential.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EndpointConfig {
	pub url: String,
	pub username: Option<String>,
	pub token: Option<SecretString>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DestinationConfig {
	#[serde(flatten)]
	pub endpoint: EndpointConfig,
	/// Destination refs are force-overwritten; must be `true` to run.
	pub disposable: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_source_requires_url() {
		let err = SourceConfigLayer::default().finalize(None).unwrap_err();
		assert!(err.to_string().contains("source.url"));
		assert!(err.to_string().contains("MIRRORSYNC_SOURCE_URL"));
	}

	#[test]
	fn test_blank_url_counts_as_missing() {
		let layer = DestinationConfigLayer {
			url: Some("   ".to_string()),
			..Default::default()
		};
		assert!(matches!(
			layer.finalize(None),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_destination_is_disposable_by_default() {
		let layer = DestinationConfigLayer {
			url: Some("https://gitlab.com/org/mirror.git".to_string()),
			..Default::default()
		};
		let config = layer.finalize(None).unwrap();
		assert!(config.disposable);
		assert_eq!(config.endpoint.url, "https://gitlab.com/org/mirror.git");
	}

	#[test]
	fn test_token_is_attached() {
		let layer = SourceConfigLayer {
			url: Some("https://github.com/org/repo.git".to_string()),
			username: Some("x-access-token".to_string()),
		};
		let config = layer
			.finalize(Some(SecretString::new("ghs_abc".to_string())))
			.unwrap();
		assert_eq!(config.token.as_ref().unwrap().expose(), "ghs_abc");
		assert_eq!(config.username.as_deref(), Some("x-access-token"));
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = DestinationConfigLayer {
			url: Some("https://old.example.com/r.git".to_string()),
			username: Some("oauth2".to_string()),
			disposable: None,
		};
		base.merge(DestinationConfigLayer {
			url: Some("https://new.example.com/r.git".to_string()),
			username: None,
			disposable: Some(false),
		});
		assert_eq!(base.url.as_deref(), Some("https://new.example.com/r.git"));
		assert_eq!(base.username.as_deref(), Some("oauth2"));
		assert_eq!(base.disposable, Some(false));
	}

	#[test]
	fn test_token_serializes_redacted() {
		let config = EndpointConfig {
			url: "https://github.com/org/repo.git".to_string(),
			username: None,
			token: Some(SecretString::new("ghp_hidden".to_string())),
		};
		let rendered = toml::to_string(&config).unwrap();
		assert!(!rendered.contains("ghp_hidden"));
		assert!(rendered.contains("[REDACTED]"));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: DestinationConfigLayer = toml::from_str(
			r#"
url = "https://gitlab.com/org/mirror.git"
"#,
		)
		.unwrap();
		assert!(layer.url.is_some());
		assert!(layer.disposable.is_none());
	}

	#[test]
	fn test_token_key_in_toml_is_rejected() {
		let result: Result<SourceConfigLayer, _> = toml::from_str(
			r#"
url = "https://github.com/org/repo.git"
token = "ghp_should_not_be_here"
"#,
		);
		assert!(result.is_err());
	}
}
