//! Caller-side OTP lifecycle: `Pending` until a code arrives or the activation deadline passes.
//!
//! `Delivered` and `Expired` are terminal. Once the deadline has passed the session reports
//! `Expired` without calling the provider, whatever the provider would have answered.

// self
use crate::{
	_prelude::*,
	rental::{Activation, OtpStatus, RentalClient},
};

/// Tracks one activation through its OTP lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpSession {
	activation: Activation,
	status: OtpStatus,
	polls: u32,
}
impl OtpSession {
	/// Starts a pending session for `activation`.
	pub fn new(activation: Activation) -> Self {
		Self { activation, status: OtpStatus::Pending, polls: 0 }
	}

	/// Tracked activation.
	pub fn activation(&self) -> &Activation {
		&self.activation
	}

	/// Current status.
	pub fn status(&self) -> &OtpStatus {
		&self.status
	}

	/// Whether the session has reached `Delivered` or `Expired`.
	pub fn is_terminal(&self) -> bool {
		self.status.is_terminal()
	}

	/// Provider polls issued so far.
	pub fn polls(&self) -> u32 {
		self.polls
	}

	/// Applies a poll result observed at `now`.
	pub fn observe(&mut self, now: OffsetDateTime, status: OtpStatus) -> &OtpStatus {
		if self.is_terminal() {
			return &self.status;
		}

		self.status =
			if self.activation.is_expired_at(now) { OtpStatus::Expired } else { status };

		&self.status
	}

	/// Polls the provider once at `now` unless the session is terminal or past its deadline.
	pub async fn advance(&mut self, rental: &RentalClient, now: OffsetDateTime) -> &OtpStatus {
		if self.is_terminal() {
			return &self.status;
		}
		if self.activation.is_expired_at(now) {
			self.status = OtpStatus::Expired;

			return &self.status;
		}

		let status = rental.poll(self.activation.id()).await;

		self.polls += 1;

		self.observe(now, status)
	}
}
