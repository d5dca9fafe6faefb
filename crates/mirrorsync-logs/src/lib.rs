// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log output for mirrorsync with credential redaction.
//!
//! - [`RedactingWriter`] / [`RedactingMakeWriter`]: scrub registered tokens
//!   and URL user-info from every formatted line
//! - [`init`]: install the process-wide subscriber (env filter + fmt layer
//!   writing to stderr through the redacting writer)
//!
//! # Usage
//!
//! ```ignore
//! mirrorsync_logs::init("info", mirrorsync_logs::Format::Text)?;
//! tracing::info!("starting mirror run");
//! ```

mod redacting_writer;

pub use redacting_writer::{RedactingMakeWriter, RedactingWriter};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
	#[default]
	Text,
	Json,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
	#[error("invalid log filter '{filter}': {message}")]
	Filter { filter: String, message: String },

	#[error("a global subscriber is already installed")]
	AlreadyInstalled,
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init(default_filter: &str, format: Format) -> Result<(), InitError> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(default_filter).map_err(|e| InitError::Filter {
			filter: default_filter.to_string(),
			message: e.to_string(),
		})?,
	};

	let writer = RedactingMakeWriter::new(std::io::stderr);
	let registry = tracing_subscriber::registry().with(filter);

	let result = match format {
		Format::Text => registry
			.with(tracing_subscriber::fmt::layer().with_writer(writer))
			.try_init(),
		Format::Json => registry
			.with(tracing_subscriber::fmt::layer().json().with_writer(writer))
			.try_init(),
	};

	result.map_err(|_| InitError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_filter_is_reported() {
		// Only meaningful when RUST_LOG does not override the default.
		if std::env::var_os("RUST_LOG").is_some() {
			return;
		}
		let err = init("mirrorsync=[", Format::Text).unwrap_err();
		assert!(matches!(err, InitError::Filter { .. }));
	}

	#[test]
	fn default_format_is_text() {
		assert_eq!(Format::default(), Format::Text);
	}
}
