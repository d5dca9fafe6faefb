// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use regex::Regex;

/// A pattern for a credential shape that can show up in git output.
pub struct Rule {
	pub id: &'static str,
	pub regex: Regex,
	/// Capture group holding the secret; `0` means the whole match.
	pub secret_group: usize,
	/// Cheap lowercase pre-filter; the regex only runs if one keyword is present.
	pub keywords: &'static [&'static str],
}

impl Rule {
	pub fn new(
		id: &'static str,
		pattern: &str,
		secret_group: usize,
		keywords: &'static [&'static str],
	) -> Self {
		Self {
			id,
			// Patterns are compile-time constants covered by the crate tests.
			regex: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid rule {id}: {e}")),
			secret_group,
			keywords,
		}
	}

	pub fn should_check(&self, text_lower: &str) -> bool {
		self.keywords.is_empty() || self.keywords.iter().any(|kw| text_lower.contains(kw))
	}
}
