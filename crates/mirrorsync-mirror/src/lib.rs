// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-way, destructive mirroring of a git repository's branches and tags.
//!
//! A run clones a full bare mirror of the source into a scratch
//! [`MirrorWorkspace`], force-pushes `refs/heads/*` and then `refs/tags/*`
//! to the destination, and removes the workspace again:
//!
//! ```ignore
//! let source = RepositoryEndpoint::new("https://github.com/org/repo.git", None, Some(&read_token))?;
//! let destination = RepositoryEndpoint::new("https://gitlab.com/org/repo.git", Some("oauth2"), Some(&write_token))?;
//! let report = mirrorsync_mirror::sync(&source, &destination, &SyncOptions::default()).await?;
//! ```
//!
//! Credentials only ever live in the endpoint's authenticated URL. Tokens are
//! registered with `mirrorsync-redact` so they cannot surface in logs or
//! error messages.

pub mod clone;
pub mod endpoint;
pub mod error;
mod git;
pub mod push;
pub mod refs;
pub mod report;
pub mod sync;
pub mod workspace;

pub use endpoint::{RepositoryEndpoint, Transport};
pub use error::{ErrorKind, Result, SyncError};
pub use git::Actor;
pub use refs::{RefMap, RefNamespace};
pub use report::{NamespaceOutcome, StepOutcome, SyncReport};
pub use sync::{sync, SyncOptions};
pub use workspace::{sweep_stale, MirrorWorkspace, WORKSPACE_PREFIX};
