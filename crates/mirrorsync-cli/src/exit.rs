// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::process::ExitCode;

use mirrorsync_mirror::{ErrorKind, SyncReport};

pub const CONFIG: u8 = 2;
pub const INTERRUPTED: u8 = 130;

fn code(kind: ErrorKind) -> u8 {
	u8::try_from(kind.exit_code()).unwrap_or(1)
}

pub fn from_kind(kind: ErrorKind) -> ExitCode {
	ExitCode::from(code(kind))
}

pub fn from_report(report: &SyncReport) -> ExitCode {
	match report.first_failure() {
		None => ExitCode::SUCCESS,
		Some(kind) => from_kind(kind),
	}
}
