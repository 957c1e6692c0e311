//! Optional observability helpers for redemption flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `voucher_otp.flow` with the `flow` (operation)
//!   and `stage` (call site) fields, plus a warning event whenever a failure is folded into a
//!   softer result.
//! - Enable `metrics` to increment the `voucher_otp_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Partner order-detail lookup.
	VerifyOrder,
	/// Rental number acquisition.
	ProvisionNumber,
	/// Rental status poll.
	PollOtp,
	/// Partner authorization-code exchange.
	ExchangeCode,
	/// Verify-then-provision orchestration.
	Redeem,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::VerifyOrder => "verify_order",
			FlowKind::ProvisionNumber => "provision_number",
			FlowKind::PollOtp => "poll_otp",
			FlowKind::ExchangeCode => "exchange_code",
			FlowKind::Redeem => "redeem",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a [`FlowSpan`] and records attempt plus success/failure outcomes.
pub(crate) async fn observe<T, E, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T, E>
where
	Fut: Future<Output = Result<T, E>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => record_flow_outcome(kind, FlowOutcome::Failure),
	}

	result
}
