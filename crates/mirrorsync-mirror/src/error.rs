// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Every message carried here has already been scrubbed of credentials.
#[derive(Error, Debug)]
pub enum SyncError {
	#[error("authentication failed for {endpoint}: {message}")]
	Authentication { endpoint: String, message: String },

	#[error("network error talking to {endpoint}: {message}")]
	Network { endpoint: String, message: String },

	#[error("mirror clone failed: {message}")]
	Clone { message: String },

	#[error("destination rejected {namespace} push: {message}")]
	PushRejected { namespace: String, message: String },

	#[error("{operation} timed out after {}s", after.as_secs())]
	Timeout { operation: String, after: Duration },

	#[error("workspace error: {message}: {source}")]
	Workspace {
		message: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid repository endpoint: {0}")]
	InvalidEndpoint(String),

	#[error("git is not installed or not in PATH")]
	GitNotInstalled,
}

/// Flat classification of a [`SyncError`], used for exit codes and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	Authentication,
	Network,
	Clone,
	PushRejected,
	Timeout,
	Workspace,
	InvalidEndpoint,
	GitNotInstalled,
}

impl ErrorKind {
	/// Process exit code for a run that failed with this kind.
	pub fn exit_code(self) -> i32 {
		match self {
			ErrorKind::InvalidEndpoint | ErrorKind::GitNotInstalled => 2,
			ErrorKind::Authentication => 3,
			ErrorKind::Network => 4,
			ErrorKind::Clone => 5,
			ErrorKind::PushRejected => 6,
			ErrorKind::Timeout => 7,
			ErrorKind::Workspace => 8,
		}
	}
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ErrorKind::Authentication => "authentication",
			ErrorKind::Network => "network",
			ErrorKind::Clone => "clone",
			ErrorKind::PushRejected => "push_rejected",
			ErrorKind::Timeout => "timeout",
			ErrorKind::Workspace => "workspace",
			ErrorKind::InvalidEndpoint => "invalid_endpoint",
			ErrorKind::GitNotInstalled => "git_not_installed",
		};
		f.write_str(s)
	}
}

impl SyncError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			SyncError::Authentication { .. } => ErrorKind::Authentication,
			SyncError::Network { .. } => ErrorKind::Network,
			SyncError::Clone { .. } => ErrorKind::Clone,
			SyncError::PushRejected { .. } => ErrorKind::PushRejected,
			SyncError::Timeout { .. } => ErrorKind::Timeout,
			SyncError::Workspace { .. } => ErrorKind::Workspace,
			SyncError::InvalidEndpoint(_) => ErrorKind::InvalidEndpoint,
			SyncError::GitNotInstalled => ErrorKind::GitNotInstalled,
		}
	}

	pub fn exit_code(&self) -> i32 {
		self.kind().exit_code()
	}

	pub(crate) fn workspace(message: impl Into<String>, source: std::io::Error) -> Self {
		SyncError::Workspace {
			message: message.into(),
			source,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exit_codes_are_distinct_per_failure_class() {
		let kinds = [
			ErrorKind::Authentication,
			ErrorKind::Network,
			ErrorKind::Clone,
			ErrorKind::PushRejected,
			ErrorKind::Timeout,
			ErrorKind::Workspace,
		];
		let mut codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
		codes.sort();
		codes.dedup();
		assert_eq!(codes, vec![3, 4, 5, 6, 7, 8]);
		assert_eq!(ErrorKind::InvalidEndpoint.exit_code(), 2);
	}

	#[test]
	fn timeout_message_names_operation() {
		let err = SyncError::Timeout {
			operation: "push tags".to_string(),
			after: Duration::from_secs(600),
		};
		assert_eq!(err.to_string(), "push tags timed out after 600s");
		assert_eq!(err.kind(), ErrorKind::Timeout);
	}

	#[test]
	fn kind_serializes_snake_case() {
		let json = serde_json::to_string(&ErrorKind::PushRejected).unwrap();
		assert_eq!(json, "\"push_rejected\"");
		assert_eq!(ErrorKind::PushRejected.to_string(), "push_rejected");
	}
}
