// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Literal secrets known to this process, longest first so that a token
/// containing another registered token is scrubbed as a whole.
static REGISTERED: Lazy<RwLock<Vec<String>>> = Lazy::new(|| RwLock::new(Vec::new()));

/// Register a literal value that must never be emitted.
///
/// Empty values are ignored; registering the same value twice is a no-op.
pub fn register_secret(value: &str) {
	if value.is_empty() {
		return;
	}

	let mut secrets = REGISTERED.write();
	if secrets.iter().any(|s| s == value) {
		return;
	}
	secrets.push(value.to_string());
	secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
}

pub(crate) fn find_registered(input: &str, out: &mut Vec<(usize, usize)>) {
	let secrets = REGISTERED.read();
	for secret in secrets.iter() {
		for (start, matched) in input.match_indices(secret.as_str()) {
			out.push((start, start + matched.len()));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn duplicates_are_stored_once() {
		register_secret("registry-dup-token");
		register_secret("registry-dup-token");

		let count = REGISTERED
			.read()
			.iter()
			.filter(|s| *s == "registry-dup-token")
			.count();
		assert_eq!(count, 1);
	}

	#[test]
	fn empty_is_ignored() {
		register_secret("");
		assert!(REGISTERED.read().iter().all(|s| !s.is_empty()));
	}

	#[test]
	fn finds_every_occurrence() {
		register_secret("registry-find-token");
		let mut found = Vec::new();
		find_registered("a registry-find-token b registry-find-token", &mut found);
		assert_eq!(found.len(), 2);
	}
}
