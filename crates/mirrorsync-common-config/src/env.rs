// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loading repository tokens from the environment.
//!
//! Schedulers hand credentials to the tool either as a plain variable
//! (`MIRRORSYNC_SOURCE_TOKEN`) or as a path to a mounted secret file
//! (`MIRRORSYNC_SOURCE_TOKEN_FILE`). The file form wins when both are set.

use std::path::PathBuf;
use std::{env, fs};

use mirrorsync_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load `var` from the environment, preferring `{var}_FILE` when present.
///
/// One trailing newline is stripped from file contents. Empty direct values
/// count as unset, so an exported-but-blank variable does not produce an
/// empty credential.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let mut content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		if content.ends_with('\n') {
			content.pop();
			if content.ends_with('\r') {
				content.pop();
			}
		}
		return Ok(Some(SecretString::new(content)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}
