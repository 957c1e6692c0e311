//! OTP status polling (`getStatus`).

// self
use crate::{
	_prelude::*,
	auth::ActivationId,
	obs::{self, FlowKind},
	rental::{RentalClient, StatusReply},
};

/// Result of one poll, as the customer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OtpStatus {
	/// No code yet (includes transient provider failures).
	Pending,
	/// Code delivered.
	Delivered {
		/// The OTP.
		code: String,
	},
	/// The activation deadline passed before delivery.
	Expired,
}
impl OtpStatus {
	/// Whether no further polling can change the outcome.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Pending)
	}

	/// Delivered code, if any.
	pub fn code(&self) -> Option<&str> {
		match self {
			Self::Delivered { code } => Some(code),
			_ => None,
		}
	}
}

impl RentalClient {
	/// Fetches and classifies the provider status of `activation_id`, propagating every failure.
	pub async fn status(&self, activation_id: &ActivationId) -> Result<StatusReply> {
		obs::observe(FlowKind::PollOtp, "status", self.status_once(activation_id)).await
	}

	async fn status_once(&self, activation_id: &ActivationId) -> Result<StatusReply> {
		let line = self.call("getStatus", &[("id", activation_id.as_str())]).await?;

		Ok(StatusReply::parse(&line)?)
	}

	/// Polls once. Anything but a delivered code, including transport and protocol failures, is
	/// [`OtpStatus::Pending`]; failures are logged. The poller never reports
	/// [`OtpStatus::Expired`], deadlines belong to the caller.
	pub async fn poll(&self, activation_id: &ActivationId) -> OtpStatus {
		match self.status(activation_id).await {
			Ok(StatusReply::Delivered { code }) => OtpStatus::Delivered { code },
			Ok(_) => OtpStatus::Pending,
			Err(e) => {
				obs::record_degraded(FlowKind::PollOtp, &e);

				OtpStatus::Pending
			},
		}
	}
}
