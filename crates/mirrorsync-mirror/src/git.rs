// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

// Clone/fetch/push go through the git CLI: gitoxide does not support push,
// and using one tool for both directions keeps error text uniform.

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{trace, warn};

use crate::endpoint::RepositoryEndpoint;
use crate::error::SyncError;
use crate::refs::RefNamespace;

/// Identity exported to every git process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
	pub name: String,
	pub email: String,
}

impl Default for Actor {
	fn default() -> Self {
		Self {
			name: "mirrorsync".to_string(),
			email: "mirrorsync@localhost".to_string(),
		}
	}
}

/// The step a git invocation belongs to; drives error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
	Clone,
	Push(RefNamespace),
	Verify,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Stage::Clone => f.write_str("clone"),
			Stage::Push(ns) => write!(f, "push {ns}"),
			Stage::Verify => f.write_str("verify"),
		}
	}
}

#[derive(Debug)]
pub(crate) enum GitFailure {
	NotInstalled,
	Spawn(std::io::Error),
	TimedOut(Duration),
	Failed { code: Option<i32>, stderr: String },
}

/// Run git in `cwd` and return trimmed stdout.
///
/// Prompts and credential helpers are disabled so a rejected credential
/// fails immediately. With a `timeout` the child is killed once it expires.
pub(crate) async fn run_git(
	cwd: &Path,
	args: &[&str],
	actor: &Actor,
	timeout: Option<Duration>,
) -> Result<String, GitFailure> {
	let mut cmd = Command::new("git");
	cmd.arg("-c")
		.arg("credential.helper=")
		.arg("-c")
		.arg("core.askPass=")
		.args(args)
		.current_dir(cwd)
		.env("GIT_TERMINAL_PROMPT", "0")
		.env("GIT_ASKPASS", "")
		.env_remove("SSH_ASKPASS")
		.env("LC_ALL", "C")
		.env("GIT_AUTHOR_NAME", &actor.name)
		.env("GIT_AUTHOR_EMAIL", &actor.email)
		.env("GIT_COMMITTER_NAME", &actor.name)
		.env("GIT_COMMITTER_EMAIL", &actor.email)
		.stdin(Stdio::null())
		.kill_on_drop(true);

	if std::env::var_os("GIT_SSH_COMMAND").is_none() {
		cmd.env("GIT_SSH_COMMAND", "ssh -o BatchMode=yes");
	}

	// Arguments may hold an authenticated URL; only the subcommand is traced.
	trace!(
		subcommand = args.first().copied().unwrap_or_default(),
		cwd = %cwd.display(),
		"running git command"
	);

	let output = match timeout {
		Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
			Ok(result) => result,
			Err(_) => return Err(GitFailure::TimedOut(limit)),
		},
		None => cmd.output().await,
	}
	.map_err(|e| {
		if e.kind() == std::io::ErrorKind::NotFound {
			warn!("git not found in PATH");
			GitFailure::NotInstalled
		} else {
			GitFailure::Spawn(e)
		}
	})?;

	if output.status.success() {
		Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
	} else {
		Err(GitFailure::Failed {
			code: output.status.code(),
			stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
		})
	}
}

const AUTH_PATTERNS: &[&str] = &[
	"authentication failed",
	"could not read username",
	"could not read password",
	"invalid username or password",
	"permission denied",
	"http 401",
	"http 403",
	"returned error: 401",
	"returned error: 403",
	"access denied",
];

const NETWORK_PATTERNS: &[&str] = &[
	"could not resolve host",
	"connection refused",
	"connection timed out",
	"failed to connect",
	"unable to access",
	"early eof",
	"the remote end hung up",
	"connection reset",
];

const REJECTED_PATTERNS: &[&str] = &[
	"[remote rejected]",
	"! [rejected]",
	"protected branch",
	"pre-receive hook declined",
	"denied",
];

/// Map a failed git invocation onto the error taxonomy.
///
/// `endpoint` is the remote the stage talks to; stderr is scrubbed of
/// credentials before it is stored.
pub(crate) fn classify(
	failure: GitFailure,
	stage: Stage,
	endpoint: &RepositoryEndpoint,
) -> SyncError {
	let (code, stderr) = match failure {
		GitFailure::NotInstalled => return SyncError::GitNotInstalled,
		GitFailure::Spawn(source) => {
			return SyncError::workspace(format!("failed to start git for {stage}"), source)
		}
		GitFailure::TimedOut(after) => {
			return SyncError::Timeout {
				operation: stage.to_string(),
				after,
			}
		}
		GitFailure::Failed { code, stderr } => (code, stderr),
	};

	let message = scrub(&stderr, endpoint);
	let message = if message.is_empty() {
		format!("git exited with status {}", code.unwrap_or(-1))
	} else {
		message
	};
	let lower = message.to_lowercase();
	let matches = |patterns: &[&str]| patterns.iter().any(|p| lower.contains(p));
	let endpoint_name = endpoint.display_url().to_string();

	if matches(AUTH_PATTERNS) {
		return SyncError::Authentication {
			endpoint: endpoint_name,
			message,
		};
	}
	if matches(NETWORK_PATTERNS) {
		return SyncError::Network {
			endpoint: endpoint_name,
			message,
		};
	}

	match stage {
		Stage::Clone => SyncError::Clone { message },
		Stage::Push(namespace) => SyncError::PushRejected {
			namespace: namespace.to_string(),
			message,
		},
		Stage::Verify if matches(REJECTED_PATTERNS) => SyncError::PushRejected {
			namespace: stage.to_string(),
			message,
		},
		Stage::Verify => SyncError::Network {
			endpoint: endpoint_name,
			message,
		},
	}
}

/// Remove the endpoint's authenticated URL, registered tokens and any URL
/// user-info from git output.
pub(crate) fn scrub(text: &str, endpoint: &RepositoryEndpoint) -> String {
	let without_url = text.replace(endpoint.authenticated_url(), endpoint.display_url());
	mirrorsync_redact::redact(&without_url).trim().to_string()
}
