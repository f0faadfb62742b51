//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `qianfan_client.operation` with the
//!   `operation` and `stage` (call site) fields, plus a debug event for every token refresh.
//! - Enable `metrics` to increment the `qianfan_client_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and to record finished
//!   operation latency in the `qianfan_client_operation_duration_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, endpoint::RouteKind};

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client-credentials exchange against the token endpoint.
	TokenRefresh,
	/// Chat completion.
	Chat,
	/// Plugin application call.
	Plugin,
	/// Text-to-image generation.
	Text2Image,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::TokenRefresh => "token_refresh",
			OperationKind::Chat => "chat",
			OperationKind::Plugin => "plugin",
			OperationKind::Text2Image => "text2image",
		}
	}
}
impl From<RouteKind> for OperationKind {
	fn from(kind: RouteKind) -> Self {
		match kind {
			RouteKind::Chat => OperationKind::Chat,
			RouteKind::Plugin => OperationKind::Plugin,
			RouteKind::Text2Image => OperationKind::Text2Image,
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
