// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential scrubbing for git output and log lines.
//!
//! Two sources of matches are combined:
//!
//! - literal secrets registered at runtime with [`register_secret`] (the
//!   access tokens of the current run), replaced by `[REDACTED:credential]`
//! - built-in rules for credential shapes, most importantly the user-info
//!   part of a URL (`https://token@host/...`), replaced by
//!   `[REDACTED:<rule-id>]`

mod registry;
mod rule;

use std::borrow::Cow;

use once_cell::sync::Lazy;

pub use registry::register_secret;
pub use rule::Rule;

const REGISTERED_RULE_ID: &str = "credential";

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
	vec![
		Rule::new(
			"url-userinfo",
			r"(?i)\b[a-z][a-z0-9+.-]*://([^/\s@]+)@",
			1,
			&["://"],
		),
		Rule::new("github-token", r"\bgh[pousr]_[A-Za-z0-9]{20,}\b", 0, &["gh"]),
		Rule::new(
			"github-fine-grained-pat",
			r"\bgithub_pat_[A-Za-z0-9_]{20,}\b",
			0,
			&["github_pat_"],
		),
		Rule::new("gitlab-token", r"\bglpat-[A-Za-z0-9_-]{20,}\b", 0, &["glpat-"]),
		Rule::new(
			"authorization-header",
			r"(?i)authorization:\s*(?:basic|bearer|token)\s+(\S+)",
			1,
			&["authorization"],
		),
	]
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
	pub rule_id: &'static str,
	pub start: usize,
	pub end: usize,
}

fn find_matches(input: &str) -> Vec<Detection> {
	let mut matches = Vec::new();

	let mut literal = Vec::new();
	registry::find_registered(input, &mut literal);
	matches.extend(literal.into_iter().map(|(start, end)| Detection {
		rule_id: REGISTERED_RULE_ID,
		start,
		end,
	}));

	let input_lower = input.to_lowercase();
	for rule in RULES.iter() {
		if !rule.should_check(&input_lower) {
			continue;
		}

		for cap in rule.regex.captures_iter(input) {
			let Some(m) = cap.get(rule.secret_group) else {
				continue;
			};
			matches.push(Detection {
				rule_id: rule.id,
				start: m.start(),
				end: m.end(),
			});
		}
	}

	// Earliest start wins; on a tie the longer match covers more.
	matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

	let mut deduped: Vec<Detection> = Vec::new();
	for m in matches {
		if let Some(last) = deduped.last_mut() {
			if m.start < last.end {
				last.end = last.end.max(m.end);
				continue;
			}
		}
		deduped.push(m);
	}

	deduped
}

/// Replace every detected credential in `input`.
///
/// Returns `Cow::Borrowed` when nothing was found.
pub fn redact(input: &str) -> Cow<'_, str> {
	let matches = find_matches(input);

	if matches.is_empty() {
		return Cow::Borrowed(input);
	}

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for m in matches {
		result.push_str(&input[last_end..m.start]);
		result.push_str("[REDACTED:");
		result.push_str(m.rule_id);
		result.push(']');
		last_end = m.end;
	}

	result.push_str(&input[last_end..]);
	Cow::Owned(result)
}

pub fn contains_secrets(input: &str) -> bool {
	!find_matches(input).is_empty()
}

pub fn detect(input: &str) -> Vec<Detection> {
	find_matches(input)
}
