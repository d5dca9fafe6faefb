// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use tracing::{debug, instrument};

use crate::endpoint::RepositoryEndpoint;
use crate::error::{Result, SyncError};
use crate::git::{classify, run_git, Actor, Stage};
use crate::refs::{diff_refs, parse_ls_remote, RefMap, RefNamespace};
use crate::workspace::MirrorWorkspace;

/// Force-push one namespace from the workspace to `destination`.
///
/// With `prune`, destination refs in the namespace that the workspace does
/// not have are deleted. A namespace with no local refs is never handed to
/// `git push`, which refuses an empty match; stale destination refs are
/// deleted explicitly instead.
#[instrument(skip_all, fields(destination = %destination.display_url(), namespace = %namespace))]
pub async fn push_namespace(
	workspace: &MirrorWorkspace,
	destination: &RepositoryEndpoint,
	namespace: RefNamespace,
	local: &RefMap,
	prune: bool,
	actor: &Actor,
	network_timeout: Duration,
) -> Result<()> {
	if namespace.count(local) == 0 {
		return clear_namespace(workspace, destination, namespace, prune, actor, network_timeout)
			.await;
	}

	let mut args = vec!["push", "--quiet"];
	if prune {
		args.push("--prune");
	}
	args.push(destination.authenticated_url());
	args.push(namespace.refspec());

	debug!(prune, "force-pushing namespace");
	run_git(workspace.path(), &args, actor, Some(network_timeout))
		.await
		.map_err(|f| classify(f, Stage::Push(namespace), destination))?;

	Ok(())
}

async fn clear_namespace(
	workspace: &MirrorWorkspace,
	destination: &RepositoryEndpoint,
	namespace: RefNamespace,
	prune: bool,
	actor: &Actor,
	network_timeout: Duration,
) -> Result<()> {
	if !prune {
		debug!("source has no refs in namespace, nothing to push");
		return Ok(());
	}

	let output = run_git(
		workspace.path(),
		&[
			"ls-remote",
			namespace.ls_remote_flag(),
			destination.authenticated_url(),
		],
		actor,
		Some(network_timeout),
	)
	.await
	.map_err(|f| classify(f, Stage::Push(namespace), destination))?;

	let stale: Vec<String> = parse_ls_remote(&output)
		.into_keys()
		.filter(|name| name.starts_with(namespace.prefix()))
		.collect();
	if stale.is_empty() {
		debug!("source and destination have no refs in namespace");
		return Ok(());
	}

	debug!(refs = stale.len(), "deleting destination refs absent from source");
	let mut args = vec!["push", "--quiet", "--delete", destination.authenticated_url()];
	args.extend(stale.iter().map(String::as_str));
	run_git(workspace.path(), &args, actor, Some(network_timeout))
		.await
		.map_err(|f| classify(f, Stage::Push(namespace), destination))?;

	Ok(())
}

/// Compare the destination's branches and tags with the workspace.
///
/// Extra destination refs only count as a mismatch when `exact` is set.
#[instrument(skip_all, fields(destination = %destination.display_url()))]
pub async fn verify_destination(
	workspace: &MirrorWorkspace,
	destination: &RepositoryEndpoint,
	expected: &RefMap,
	exact: bool,
	actor: &Actor,
	network_timeout: Duration,
) -> Result<()> {
	let output = run_git(
		workspace.path(),
		&[
			"ls-remote",
			"--heads",
			"--tags",
			destination.authenticated_url(),
		],
		actor,
		Some(network_timeout),
	)
	.await
	.map_err(|f| classify(f, Stage::Verify, destination))?;

	let actual = parse_ls_remote(&output);
	let differing = diff_refs(expected, &actual, exact);
	if differing.is_empty() {
		debug!(refs = actual.len(), "destination matches workspace");
		return Ok(());
	}

	const SHOWN: usize = 10;
	let mut message = format!(
		"{} ref(s) differ after push: {}",
		differing.len(),
		differing
			.iter()
			.take(SHOWN)
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(", ")
	);
	if differing.len() > SHOWN {
		message.push_str(", ...");
	}

	Err(SyncError::PushRejected {
		namespace: Stage::Verify.to_string(),
		message,
	})
}
