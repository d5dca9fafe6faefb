// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! mirror-sync: one-way force mirror of a repository's branches and tags.
//!
//! Meant to be invoked by a scheduler (CI push hook, daily cron, manual
//! dispatch). Endpoint URLs come from config/env/flags; tokens only from
//! `MIRRORSYNC_SOURCE_TOKEN[_FILE]` and `MIRRORSYNC_DESTINATION_TOKEN[_FILE]`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use mirrorsync_config::{load_config, CliOverrides, LogFormat, MirrorConfig};
use mirrorsync_mirror::{Actor, RepositoryEndpoint, SyncOptions};

mod exit;
mod version;

/// Force-mirror every branch and tag of a source repository to a destination.
#[derive(Parser, Debug)]
#[command(name = "mirror-sync", version, about, long_about = None)]
struct Args {
	#[command(flatten)]
	sync: SyncArgs,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(clap::Args, Debug, Clone, Default)]
struct SyncArgs {
	/// Path to configuration file (default: /etc/mirrorsync/config.toml)
	#[arg(short, long, global = true, env = "MIRRORSYNC_CONFIG")]
	config: Option<PathBuf>,

	/// Source repository URL (overrides config)
	#[arg(long, global = true)]
	source_url: Option<String>,

	/// Destination repository URL (overrides config)
	#[arg(long, global = true)]
	destination_url: Option<String>,

	/// Directory under which the transient mirror workspace is created
	#[arg(long, global = true)]
	workspace_root: Option<PathBuf>,

	/// Bound in seconds for each fetch and push
	#[arg(long, global = true)]
	timeout_secs: Option<u64>,

	/// Keep destination refs that no longer exist in the source
	#[arg(long, global = true)]
	no_prune: bool,

	/// Compare destination refs with the mirror after pushing
	#[arg(long, global = true)]
	verify: bool,

	/// Print the sync report as JSON on stdout
	#[arg(long, global = true)]
	json: bool,

	/// Log level or filter directive (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
	/// Run a sync (default)
	Sync,
	/// Load and validate configuration, then print it with secrets redacted
	Check,
	/// Show version information
	Version,
}

impl From<&SyncArgs> for CliOverrides {
	fn from(args: &SyncArgs) -> Self {
		CliOverrides {
			source_url: args.source_url.clone(),
			destination_url: args.destination_url.clone(),
			workspace_root: args.workspace_root.clone(),
			network_timeout_secs: args.timeout_secs,
			prune: args.no_prune.then_some(false),
			verify: args.verify.then_some(true),
			log_level: args.log_level.clone(),
			log_format: None,
		}
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return ExitCode::SUCCESS;
	}

	dotenvy::dotenv().ok();

	let config = match load_config(args.sync.config.clone(), CliOverrides::from(&args.sync)) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("mirror-sync: configuration error: {e}");
			return ExitCode::from(exit::CONFIG);
		}
	};

	if let Err(e) = init_tracing(&config) {
		eprintln!("mirror-sync: {e:#}");
		return ExitCode::from(exit::CONFIG);
	}
	config.log_summary();

	let result = match args.command {
		Some(Command::Check) => run_check(&config),
		_ => run_sync(&config, args.sync.json),
	};

	result.unwrap_or_else(|e| {
		error!(error = %format!("{e:#}"), "mirror-sync failed");
		ExitCode::from(exit::CONFIG)
	})
}

fn init_tracing(config: &MirrorConfig) -> Result<()> {
	let format = match config.logging.format {
		LogFormat::Text => mirrorsync_logs::Format::Text,
		LogFormat::Json => mirrorsync_logs::Format::Json,
	};
	mirrorsync_logs::init(&config.logging.level, format).context("failed to initialise logging")
}

fn build_endpoints(config: &MirrorConfig) -> mirrorsync_mirror::Result<(RepositoryEndpoint, RepositoryEndpoint)> {
	let source = RepositoryEndpoint::new(
		&config.source.url,
		config.source.username.as_deref(),
		config.source.token.as_ref(),
	)?;
	let destination = RepositoryEndpoint::new(
		&config.destination.endpoint.url,
		config.destination.endpoint.username.as_deref(),
		config.destination.endpoint.token.as_ref(),
	)?;
	Ok((source, destination))
}

fn sync_options(config: &MirrorConfig) -> SyncOptions {
	SyncOptions {
		workspace_root: config.sync.workspace_root.clone(),
		network_timeout: config.sync.network_timeout(),
		stale_after: config.sync.stale_after(),
		prune: config.sync.prune,
		verify: config.sync.verify,
		actor: Actor {
			name: config.actor.name.clone(),
			email: config.actor.email.clone(),
		},
	}
}

fn run_check(config: &MirrorConfig) -> Result<ExitCode> {
	if let Err(e) = build_endpoints(config) {
		error!(error = %e, "endpoint check failed");
		return Ok(exit::from_kind(e.kind()));
	}

	let rendered = toml::to_string_pretty(config).context("failed to render configuration")?;
	println!("{rendered}");
	info!("configuration is valid");
	Ok(ExitCode::SUCCESS)
}

fn run_sync(config: &MirrorConfig, json: bool) -> Result<ExitCode> {
	let (source, destination) = match build_endpoints(config) {
		Ok(endpoints) => endpoints,
		Err(e) => {
			error!(error = %e, "invalid repository endpoint");
			return Ok(exit::from_kind(e.kind()));
		}
	};
	let options = sync_options(config);

	warn!(
		destination = %destination,
		prune = options.prune,
		"destination branches and tags will be force-overwritten to match the source"
	);
	if !source.has_credential() {
		info!(source = %source, "no source credential supplied, cloning anonymously");
	}

	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.context("failed to start async runtime")?;

	let outcome = runtime.block_on(async {
		tokio::select! {
			result = mirrorsync_mirror::sync(&source, &destination, &options) => Some(result),
			signal = shutdown_signal() => {
				warn!(signal, "interrupted, abandoning sync and removing workspace");
				None
			}
		}
	});

	let report = match outcome {
		None => return Ok(ExitCode::from(exit::INTERRUPTED)),
		Some(Err(e)) => {
			error!(error = %e, kind = %e.kind(), "sync failed before pushing");
			return Ok(exit::from_kind(e.kind()));
		}
		Some(Ok(report)) => report,
	};

	if json {
		let rendered = serde_json::to_string_pretty(&report).context("failed to render report")?;
		println!("{rendered}");
	}

	if report.succeeded() {
		info!(
			branches = report.cloned_branches,
			tags = report.cloned_tags,
			duration_ms = report.duration_ms,
			"mirror sync complete"
		);
	} else {
		for failure in report.failures() {
			error!(error = %failure, kind = %failure.kind(), "mirror sync step failed");
		}
	}

	Ok(exit::from_report(&report))
}

async fn shutdown_signal() -> &'static str {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			warn!(error = %e, "failed to install SIGINT handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				warn!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => "SIGINT",
		() = terminate => "SIGTERM",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use std::time::Duration;

	#[test]
	fn cli_definition_is_consistent() {
		Args::command().debug_assert();
	}

	#[test]
	fn sync_is_the_default_command() {
		let args = Args::try_parse_from(["mirror-sync", "--verify"]).unwrap();
		assert!(args.command.is_none());
		assert!(args.sync.verify);
	}

	#[test]
	fn flags_after_subcommand_are_accepted() {
		let args = Args::try_parse_from([
			"mirror-sync",
			"sync",
			"--no-prune",
			"--timeout-secs",
			"30",
			"--destination-url",
			"https://gitlab.com/org/mirror.git",
		])
		.unwrap();
		assert_eq!(args.command, Some(Command::Sync));

		let overrides = CliOverrides::from(&args.sync);
		assert_eq!(overrides.prune, Some(false));
		assert_eq!(overrides.verify, None);
		assert_eq!(overrides.network_timeout_secs, Some(30));
		assert_eq!(
			overrides.destination_url.as_deref(),
			Some("https://gitlab.com/org/mirror.git")
		);
	}

	#[test]
	fn unset_flags_do_not_override() {
		let args = Args::try_parse_from(["mirror-sync", "check"]).unwrap();
		assert_eq!(CliOverrides::from(&args.sync), CliOverrides::default());
	}

	#[test]
	fn token_flags_do_not_exist() {
		assert!(Args::try_parse_from(["mirror-sync", "--source-token", "x"]).is_err());
	}

	#[test]
	fn options_follow_config() {
		let layer = mirrorsync_config::MirrorConfigLayer {
			source: Some(mirrorsync_config::SourceConfigLayer {
				url: Some("https://github.com/org/repo.git".to_string()),
				username: None,
			}),
			destination: Some(mirrorsync_config::DestinationConfigLayer {
				url: Some("https://gitlab.com/org/repo.git".to_string()),
				..Default::default()
			}),
			sync: Some(mirrorsync_config::SyncConfigLayer {
				network_timeout_secs: Some(42),
				prune: Some(false),
				..Default::default()
			}),
			..Default::default()
		};
		let config = mirrorsync_config::resolve(layer, None, None).unwrap();
		let options = sync_options(&config);

		assert_eq!(options.network_timeout, Duration::from_secs(42));
		assert!(!options.prune);
		assert_eq!(options.actor.name, "mirrorsync");
		assert!(build_endpoints(&config).is_ok());
	}
}
