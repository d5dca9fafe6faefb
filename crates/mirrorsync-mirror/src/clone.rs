// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::endpoint::RepositoryEndpoint;
use crate::error::Result;
use crate::git::{classify, run_git, Actor, Stage};
use crate::refs::{list_refs, RefMap, RefNamespace};
use crate::workspace::MirrorWorkspace;

/// Make a full bare mirror of `source` inside `workspace`.
///
/// Every branch and tag is fetched with complete history. The source URL is
/// passed to `fetch` directly and never stored in the workspace config.
#[instrument(skip_all, fields(source = %source.display_url()))]
pub async fn mirror_clone(
	workspace: &MirrorWorkspace,
	source: &RepositoryEndpoint,
	actor: &Actor,
	network_timeout: Duration,
) -> Result<RefMap> {
	let dir = workspace.path();

	run_git(dir, &["init", "--bare", "--quiet", "."], actor, None)
		.await
		.map_err(|f| classify(f, Stage::Clone, source))?;

	debug!("fetching all branches and tags");
	run_git(
		dir,
		&[
			"fetch",
			"--quiet",
			"--prune",
			"--update-head-ok",
			source.authenticated_url(),
			RefNamespace::Branches.refspec(),
			RefNamespace::Tags.refspec(),
		],
		actor,
		Some(network_timeout),
	)
	.await
	.map_err(|f| classify(f, Stage::Clone, source))?;

	let refs = list_refs(dir)?;
	info!(
		branches = RefNamespace::Branches.count(&refs),
		tags = RefNamespace::Tags.count(&refs),
		"mirror clone complete"
	);
	Ok(refs)
}
