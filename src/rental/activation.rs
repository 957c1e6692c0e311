//! Rented number handle with a fixed deadline.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::ActivationId};

/// A rented virtual number. The deadline is fixed when the handle is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activation {
	id: ActivationId,
	phone_number: String,
	service_code: String,
	issued_at: OffsetDateTime,
	deadline: OffsetDateTime,
}
impl Activation {
	/// Creates a handle whose deadline is `issued_at + window`, clamped to the representable range.
	pub fn new(
		id: ActivationId,
		phone_number: impl Into<String>,
		service_code: impl Into<String>,
		issued_at: OffsetDateTime,
		window: Duration,
	) -> Self {
		let deadline = issued_at.checked_add(window).unwrap_or(if window.is_negative() {
			PrimitiveDateTime::MIN.assume_utc()
		} else {
			PrimitiveDateTime::MAX.assume_utc()
		});

		Self {
			id,
			phone_number: phone_number.into(),
			service_code: service_code.into(),
			issued_at,
			deadline,
		}
	}

	/// Provider activation id.
	pub fn id(&self) -> &ActivationId {
		&self.id
	}

	/// Rented phone number.
	pub fn phone_number(&self) -> &str {
		&self.phone_number
	}

	/// Rental service code the number was issued for.
	pub fn service_code(&self) -> &str {
		&self.service_code
	}

	/// Issue instant.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Instant after which the activation is expired.
	pub fn deadline(&self) -> OffsetDateTime {
		self.deadline
	}

	/// Whether `now` is past the deadline. The deadline instant itself still counts as live.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now > self.deadline
	}

	/// Time left before the deadline, zero once expired.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		(self.deadline - now).max(Duration::ZERO)
	}
}
