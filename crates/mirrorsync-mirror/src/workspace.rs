// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SyncError};

pub const WORKSPACE_PREFIX: &str = "mirrorsync-ws-";

/// Exclusively owned scratch directory holding the bare mirror for one run.
///
/// Removed by [`MirrorWorkspace::release`], or on drop if the run is
/// abandoned (including cancellation of the owning future).
#[derive(Debug)]
pub struct MirrorWorkspace {
	dir: Option<TempDir>,
	path: PathBuf,
}

impl MirrorWorkspace {
	/// Create a fresh workspace under `root`, creating `root` if needed.
	pub fn create(root: &Path) -> Result<Self> {
		std::fs::create_dir_all(root).map_err(|e| {
			SyncError::workspace(format!("cannot create workspace root {}", root.display()), e)
		})?;

		let dir = tempfile::Builder::new()
			.prefix(WORKSPACE_PREFIX)
			.tempdir_in(root)
			.map_err(|e| {
				SyncError::workspace(format!("cannot create workspace in {}", root.display()), e)
			})?;

		let path = dir.path().to_path_buf();
		debug!(path = %path.display(), "created mirror workspace");
		Ok(Self {
			dir: Some(dir),
			path,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Remove the workspace directory, reporting failures.
	pub fn release(mut self) -> Result<()> {
		let Some(dir) = self.dir.take() else {
			return Ok(());
		};
		dir.close().map_err(|e| {
			SyncError::workspace(format!("cannot remove workspace {}", self.path.display()), e)
		})?;
		debug!(path = %self.path.display(), "released mirror workspace");
		Ok(())
	}
}

impl Drop for MirrorWorkspace {
	fn drop(&mut self) {
		if self.dir.is_some() {
			warn!(path = %self.path.display(), "mirror workspace dropped without release, removing");
		}
	}
}

/// Delete workspaces under `root` left behind by runs that never cleaned up.
///
/// Only directories named `mirrorsync-ws-*` whose modification time is older
/// than `stale_after` are touched. Returns the number removed.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn sweep_stale(root: &Path, stale_after: Duration) -> Result<usize> {
	let entries = match std::fs::read_dir(root) {
		Ok(entries) => entries,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
		Err(e) => {
			return Err(SyncError::workspace(
				format!("cannot read workspace root {}", root.display()),
				e,
			))
		}
	};

	let now = SystemTime::now();
	let mut removed = 0;

	for entry in entries.flatten() {
		let name = entry.file_name();
		if !name.to_string_lossy().starts_with(WORKSPACE_PREFIX) {
			continue;
		}

		let Ok(metadata) = entry.metadata() else {
			continue;
		};
		if !metadata.is_dir() {
			continue;
		}

		let age = metadata
			.modified()
			.ok()
			.and_then(|modified| now.duration_since(modified).ok())
			.unwrap_or_default();
		if age <= stale_after {
			continue;
		}

		let path = entry.path();
		match std::fs::remove_dir_all(&path) {
			Ok(()) => {
				info!(path = %path.display(), age_secs = age.as_secs(), "removed stale workspace");
				removed += 1;
			}
			Err(e) => warn!(path = %path.display(), error = %e, "failed to remove stale workspace"),
		}
	}

	Ok(removed)
}
