// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorKind, SyncError};

/// Result of pushing one ref namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NamespaceOutcome {
	/// `refs` is the number of workspace refs in the namespace.
	Pushed { refs: usize },
	Failed { kind: ErrorKind, message: String },
}

impl NamespaceOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, NamespaceOutcome::Pushed { .. })
	}
}

/// Result of a step that may be disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
	Succeeded,
	Skipped,
	Failed { kind: ErrorKind, message: String },
}

impl StepOutcome {
	pub fn is_failure(&self) -> bool {
		matches!(self, StepOutcome::Failed { .. })
	}
}

/// Outcome of a sync run that reached the push phase.
#[derive(Debug, Serialize)]
pub struct SyncReport {
	pub source: String,
	pub destination: String,
	pub cloned_branches: usize,
	pub cloned_tags: usize,
	pub branches: NamespaceOutcome,
	pub tags: NamespaceOutcome,
	pub verification: StepOutcome,
	pub cleanup: StepOutcome,
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
	pub duration_ms: u64,
	/// Underlying errors in step order: branches, tags, verification, cleanup.
	#[serde(skip)]
	pub(crate) failures: Vec<SyncError>,
}

impl SyncReport {
	/// Both namespaces pushed, verification (if enabled) passed, and the
	/// workspace was released.
	pub fn succeeded(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn first_failure(&self) -> Option<ErrorKind> {
		self.failures.first().map(SyncError::kind)
	}

	pub fn failures(&self) -> &[SyncError] {
		&self.failures
	}

	/// Convert a failed report into its first error.
	pub fn into_result(mut self) -> Result<SyncReport, SyncError> {
		if self.failures.is_empty() {
			Ok(self)
		} else {
			Err(self.failures.remove(0))
		}
	}
}

/// Collects step results in order while a run progresses.
pub(crate) struct ReportBuilder {
	failures: Vec<SyncError>,
}

impl ReportBuilder {
	pub(crate) fn new() -> Self {
		Self {
			failures: Vec::new(),
		}
	}

	pub(crate) fn namespace(&mut self, result: Result<usize, SyncError>) -> NamespaceOutcome {
		match result {
			Ok(refs) => NamespaceOutcome::Pushed { refs },
			Err(e) => {
				let outcome = NamespaceOutcome::Failed {
					kind: e.kind(),
					message: e.to_string(),
				};
				self.failures.push(e);
				outcome
			}
		}
	}

	pub(crate) fn step(&mut self, result: Option<Result<(), SyncError>>) -> StepOutcome {
		match result {
			None => StepOutcome::Skipped,
			Some(Ok(())) => StepOutcome::Succeeded,
			Some(Err(e)) => {
				let outcome = StepOutcome::Failed {
					kind: e.kind(),
					message: e.to_string(),
				};
				self.failures.push(e);
				outcome
			}
		}
	}

	pub(crate) fn into_failures(self) -> Vec<SyncError> {
		self.failures
	}
}
