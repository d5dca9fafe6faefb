// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper for repository access tokens and authenticated URLs.
//!
//! A [`Secret<T>`] only hands out its value through [`Secret::expose`]. Every
//! formatting path (`Debug`, `Display`, serde) prints [`REDACTED`], and the
//! inner value is zeroized when the wrapper is dropped.
//!
//! ```
//! use mirrorsync_common_secret::SecretString;
//!
//! let token = SecretString::new("ghp_example".to_string());
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(token.expose(), "ghp_example");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder printed wherever a secret would otherwise be rendered.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be printed, serialized or logged in the clear.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: a token or a URL with embedded credentials.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Access the wrapped value. Every call site is a place the secret leaves
	/// the wrapper, so keep them few and easy to audit.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// True when the wrapped string is empty or only whitespace.
	pub fn is_blank(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn debug_and_display_hide_token() {
		let token = SecretString::new("glpat-abcdef123456".to_string());

		assert_eq!(format!("{token}"), REDACTED);
		let debug = format!("{token:?}");
		assert!(debug.contains(REDACTED));
		assert!(!debug.contains("glpat-abcdef123456"));
	}

	#[test]
	fn option_of_secret_is_redacted() {
		let token = Some(SecretString::new("ghp_option".to_string()));
		assert!(!format!("{token:?}").contains("ghp_option"));
	}

	#[test]
	fn blank_detection() {
		assert!(SecretString::new(String::new()).is_blank());
		assert!(SecretString::new("  \n".to_string()).is_blank());
		assert!(!SecretString::new("t".to_string()).is_blank());
	}

	#[test]
	fn clone_keeps_value() {
		let token = SecretString::new("abc".to_string());
		assert_eq!(token.clone(), token);
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serializes_as_placeholder_and_deserializes_value() {
		let token = SecretString::new("ghp_serialized".to_string());
		let json = serde_json::to_string(&token).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));

		let parsed: SecretString = serde_json::from_str("\"ghp_parsed\"").unwrap();
		assert_eq!(parsed.expose(), "ghp_parsed");
	}

	proptest! {
		#[test]
		fn formatting_never_contains_value(inner in "[a-zA-Z0-9_-]{4,40}") {
			prop_assume!(!REDACTED.contains(&inner) && !"Secret".contains(&inner));
			let secret = SecretString::new(inner.clone());
			let shown = secret.to_string();
			let debugged = format!("{:?}", secret);
			prop_assert!(!shown.contains(&inner));
			prop_assert!(!debugged.contains(&inner));
		}
	}
}
