// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared configuration primitives for mirrorsync.
//!
//! - [`Secret<T>`] / [`SecretString`], re-exported from
//!   [`mirrorsync_common_secret`]
//! - [`load_secret_env`] for reading tokens from `VAR` or `VAR_FILE`

pub mod env;

pub use mirrorsync_common_secret::{Secret, SecretString, REDACTED};

pub use env::{load_secret_env, SecretEnvError};
