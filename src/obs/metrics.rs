// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{OperationKind, OperationOutcome};

/// Counts one attempt, success, or failure in `qianfan_client_operation_total`.
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"qianfan_client_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long a finished operation took in `qianfan_client_operation_duration_seconds`.
///
/// Token waits are part of a content call's latency; the refresh itself is also recorded under
/// `token_refresh`.
pub fn record_operation_duration(
	kind: OperationKind,
	outcome: OperationOutcome,
	elapsed: StdDuration,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			"qianfan_client_operation_duration_seconds",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, elapsed);
	}
}

/// Records the outcome counter and the latency histogram for a finished operation.
pub fn record_operation_finished<T, E>(
	kind: OperationKind,
	result: &Result<T, E>,
	elapsed: StdDuration,
) {
	let outcome =
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure };

	record_operation_outcome(kind, outcome);
	record_operation_duration(kind, outcome, elapsed);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_is_a_noop_without_a_recorder() {
		record_operation_outcome(OperationKind::Text2Image, OperationOutcome::Attempt);
		record_operation_finished::<(), ()>(
			OperationKind::Chat,
			&Err(()),
			StdDuration::from_millis(12),
		);
	}
}
