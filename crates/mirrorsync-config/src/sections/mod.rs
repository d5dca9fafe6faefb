// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for mirror-sync.

pub mod actor;
pub mod endpoint;
pub mod logging;
pub mod sync;

pub use actor::{ActorConfig, ActorConfigLayer};
pub use endpoint::{DestinationConfig, DestinationConfigLayer, EndpointConfig, SourceConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use sync::{SyncConfig, SyncConfigLayer};
