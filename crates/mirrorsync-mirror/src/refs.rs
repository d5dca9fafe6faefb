// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SyncError};

/// Full ref name (`refs/heads/main`) to hex object id.
pub type RefMap = BTreeMap<String, String>;

/// The two ref namespaces that are mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefNamespace {
	Branches,
	Tags,
}

impl RefNamespace {
	pub const ALL: [RefNamespace; 2] = [RefNamespace::Branches, RefNamespace::Tags];

	pub fn prefix(self) -> &'static str {
		match self {
			RefNamespace::Branches => "refs/heads/",
			RefNamespace::Tags => "refs/tags/",
		}
	}

	/// Forced refspec mapping the namespace onto itself.
	pub fn refspec(self) -> &'static str {
		match self {
			RefNamespace::Branches => "+refs/heads/*:refs/heads/*",
			RefNamespace::Tags => "+refs/tags/*:refs/tags/*",
		}
	}

	/// `git ls-remote` flag restricting output to this namespace.
	pub fn ls_remote_flag(self) -> &'static str {
		match self {
			RefNamespace::Branches => "--heads",
			RefNamespace::Tags => "--tags",
		}
	}

	pub fn count(self, refs: &RefMap) -> usize {
		refs.keys().filter(|name| name.starts_with(self.prefix())).count()
	}
}

impl fmt::Display for RefNamespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RefNamespace::Branches => f.write_str("branches"),
			RefNamespace::Tags => f.write_str("tags"),
		}
	}
}

/// Read every branch and tag of the repository at `repo_path`.
pub fn list_refs(repo_path: &Path) -> Result<RefMap> {
	let repo = gix::open(repo_path).map_err(|e| SyncError::Clone {
		message: format!("failed to open workspace repository: {e}"),
	})?;

	let references = repo.references().map_err(|e| SyncError::Clone {
		message: format!("failed to read refs: {e}"),
	})?;

	let mut refs = RefMap::new();
	for namespace in RefNamespace::ALL {
		let iter = references
			.prefixed(namespace.prefix())
			.map_err(|e| SyncError::Clone {
				message: format!("failed to list {namespace}: {e}"),
			})?;

		for reference in iter.flatten() {
			if let Some(id) = reference.try_id() {
				refs.insert(
					reference.name().as_bstr().to_string(),
					id.detach().to_string(),
				);
			}
		}
	}

	Ok(refs)
}

/// Parse `git ls-remote --heads --tags` output. Peeled `^{}` entries are skipped.
pub fn parse_ls_remote(output: &str) -> RefMap {
	output
		.lines()
		.filter_map(|line| {
			let (oid, name) = line.split_once('\t')?;
			if name.ends_with("^{}") {
				return None;
			}
			Some((name.trim().to_string(), oid.trim().to_string()))
		})
		.collect()
}

/// Names of refs whose state on `actual` differs from `expected`.
///
/// Refs present only on `actual` count as differences when `exact` is set.
pub fn diff_refs(expected: &RefMap, actual: &RefMap, exact: bool) -> Vec<String> {
	let mut differing: Vec<String> = expected
		.iter()
		.filter(|(name, oid)| actual.get(*name) != Some(*oid))
		.map(|(name, _)| name.clone())
		.collect();

	if exact {
		differing.extend(
			actual
				.keys()
				.filter(|name| !expected.contains_key(*name))
				.cloned(),
		);
	}

	differing.sort();
	differing
}

#[cfg(test)]
mod tests {
	use super::*;

	const OID_A: &str = "1111111111111111111111111111111111111111";
	const OID_B: &str = "2222222222222222222222222222222222222222";

	fn map(entries: &[(&str, &str)]) -> RefMap {
		entries
			.iter()
			.map(|(n, o)| (n.to_string(), o.to_string()))
			.collect()
	}

	#[test]
	fn refspecs_force_each_namespace() {
		assert_eq!(RefNamespace::Branches.refspec(), "+refs/heads/*:refs/heads/*");
		assert_eq!(RefNamespace::Tags.refspec(), "+refs/tags/*:refs/tags/*");
	}

	#[test]
	fn count_by_namespace() {
		let refs = map(&[
			("refs/heads/main", OID_A),
			("refs/heads/dev", OID_A),
			("refs/tags/v1", OID_B),
		]);
		assert_eq!(RefNamespace::Branches.count(&refs), 2);
		assert_eq!(RefNamespace::Tags.count(&refs), 1);
	}

	#[test]
	fn ls_remote_skips_peeled_tags() {
		let output = format!(
			"{OID_A}\trefs/heads/main\n{OID_B}\trefs/tags/v1.0\n{OID_A}\trefs/tags/v1.0^{{}}\n"
		);
		let refs = parse_ls_remote(&output);
		assert_eq!(refs.len(), 2);
		assert_eq!(refs["refs/tags/v1.0"], OID_B);
	}

	#[test]
	fn diff_reports_moved_and_missing_refs() {
		let expected = map(&[("refs/heads/main", OID_A), ("refs/tags/v1", OID_A)]);
		let actual = map(&[("refs/heads/main", OID_B)]);
		assert_eq!(
			diff_refs(&expected, &actual, false),
			vec!["refs/heads/main".to_string(), "refs/tags/v1".to_string()]
		);
	}

	#[test]
	fn extra_refs_only_count_when_exact() {
		let expected = map(&[("refs/heads/main", OID_A)]);
		let actual = map(&[("refs/heads/main", OID_A), ("refs/heads/stale", OID_B)]);
		assert!(diff_refs(&expected, &actual, false).is_empty());
		assert_eq!(
			diff_refs(&expected, &actual, true),
			vec!["refs/heads/stale".to_string()]
		);
	}

	#[test]
	fn list_refs_reads_branches_and_tags() {
		let temp_dir = tempfile::TempDir::new().unwrap();
		let repo_path = temp_dir.path();

		let init = std::process::Command::new("git")
			.args(["init", "--bare", "--quiet"])
			.current_dir(repo_path)
			.output();
		if init.is_err() {
			eprintln!("git not available, skipping");
			return;
		}

		std::fs::create_dir_all(repo_path.join("refs/tags")).unwrap();
		std::fs::write(repo_path.join("refs/heads/main"), format!("{OID_A}\n")).unwrap();
		std::fs::write(repo_path.join("refs/tags/v1"), format!("{OID_B}\n")).unwrap();

		let refs = list_refs(repo_path).unwrap();
		assert_eq!(refs.get("refs/heads/main").map(String::as_str), Some(OID_A));
		assert_eq!(refs.get("refs/tags/v1").map(String::as_str), Some(OID_B));
		assert_eq!(refs.len(), 2);
	}
}
