// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::clone::mirror_clone;
use crate::endpoint::RepositoryEndpoint;
use crate::error::Result;
use crate::git::Actor;
use crate::push::{push_namespace, verify_destination};
use crate::refs::{RefMap, RefNamespace};
use crate::report::{NamespaceOutcome, ReportBuilder, SyncReport};
use crate::workspace::{sweep_stale, MirrorWorkspace};

#[derive(Debug, Clone)]
pub struct SyncOptions {
	pub workspace_root: PathBuf,
	/// Bound applied to each fetch, push and ls-remote.
	pub network_timeout: Duration,
	pub stale_after: Duration,
	pub prune: bool,
	pub verify: bool,
	pub actor: Actor,
}

impl Default for SyncOptions {
	fn default() -> Self {
		Self {
			workspace_root: std::env::temp_dir().join("mirrorsync"),
			network_timeout: Duration::from_secs(600),
			stale_after: Duration::from_secs(86400),
			prune: true,
			verify: false,
			actor: Actor::default(),
		}
	}
}

/// Mirror every branch and tag of `source` onto `destination`.
///
/// Destination refs are force-overwritten. Returns `Err` only when the run
/// cannot reach the push phase (workspace or clone failure); after that the
/// outcome of every step is in the [`SyncReport`]. The workspace is removed
/// on every path.
#[instrument(skip_all, fields(source = %source.display_url(), destination = %destination.display_url()))]
pub async fn sync(
	source: &RepositoryEndpoint,
	destination: &RepositoryEndpoint,
	options: &SyncOptions,
) -> Result<SyncReport> {
	let started_at = Utc::now();
	let clock = Instant::now();

	match sweep_stale(&options.workspace_root, options.stale_after) {
		Ok(0) => {}
		Ok(removed) => info!(removed, "swept stale workspaces"),
		Err(e) => warn!(error = %e, "stale workspace sweep failed"),
	}

	let workspace = MirrorWorkspace::create(&options.workspace_root)?;

	let refs = match mirror_clone(&workspace, source, &options.actor, options.network_timeout).await
	{
		Ok(refs) => refs,
		Err(e) => {
			error!(error = %e, kind = %e.kind(), "mirror clone failed");
			if let Err(cleanup) = workspace.release() {
				warn!(error = %cleanup, "workspace cleanup after failed clone also failed");
			}
			return Err(e);
		}
	};

	let mut builder = ReportBuilder::new();
	let branches =
		push_and_record(&mut builder, &workspace, destination, RefNamespace::Branches, &refs, options)
			.await;
	let tags =
		push_and_record(&mut builder, &workspace, destination, RefNamespace::Tags, &refs, options)
			.await;

	let verification = if options.verify && branches.is_success() && tags.is_success() {
		let result = verify_destination(
			&workspace,
			destination,
			&refs,
			options.prune,
			&options.actor,
			options.network_timeout,
		)
		.await;
		if let Err(e) = &result {
			error!(error = %e, "destination verification failed");
		}
		Some(result)
	} else {
		None
	};
	let verification = builder.step(verification);

	let cleanup = workspace.release();
	if let Err(e) = &cleanup {
		error!(error = %e, "workspace cleanup failed");
	}
	let cleanup = builder.step(Some(cleanup));

	let report = SyncReport {
		source: source.display_url().to_string(),
		destination: destination.display_url().to_string(),
		cloned_branches: RefNamespace::Branches.count(&refs),
		cloned_tags: RefNamespace::Tags.count(&refs),
		branches,
		tags,
		verification,
		cleanup,
		started_at,
		finished_at: Utc::now(),
		duration_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
		failures: builder.into_failures(),
	};

	info!(
		succeeded = report.succeeded(),
		duration_ms = report.duration_ms,
		"sync finished"
	);
	Ok(report)
}

async fn push_and_record(
	builder: &mut ReportBuilder,
	workspace: &MirrorWorkspace,
	destination: &RepositoryEndpoint,
	namespace: RefNamespace,
	refs: &RefMap,
	options: &SyncOptions,
) -> NamespaceOutcome {
	let result = push_namespace(
		workspace,
		destination,
		namespace,
		refs,
		options.prune,
		&options.actor,
		options.network_timeout,
	)
	.await
	.map(|()| namespace.count(refs));

	let outcome = builder.namespace(result);
	match &outcome {
		NamespaceOutcome::Pushed { refs } => info!(namespace = %namespace, refs, "namespace pushed"),
		NamespaceOutcome::Failed { kind, message } => {
			error!(namespace = %namespace, kind = %kind, error = %message, "namespace push failed")
		}
	}
	outcome
}
