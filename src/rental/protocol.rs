//! Tagged-line replies of the rental provider.
//!
//! Replies look like `TAG` or `TAG:field:field`. Fields are positional and every documented tag is
//! matched explicitly; anything else is a [`ProtocolError::UnknownTag`].

// self
use crate::{_prelude::*, auth::ActivationId, error::ProtocolError, rental::ENDPOINT};

/// Reply to a `getNumber` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumberReply {
	/// `ACCESS_NUMBER:<id>:<number>`.
	Granted {
		/// Provider activation id.
		activation_id: ActivationId,
		/// Rented phone number, as the provider formats it.
		phone_number: String,
	},
	/// Any documented refusal.
	Rejected(NumberRejection),
}
impl NumberReply {
	/// Parses one reply line.
	pub fn parse(line: &str) -> Result<Self, ProtocolError> {
		let line = line.trim();
		let (tag, rest) = split_tag(line);
		let rejection = match tag {
			"ACCESS_NUMBER" => {
				let mut fields = rest.unwrap_or_default().split(':');
				let activation_id = ActivationId::new(required(fields.next(), "ACCESS_NUMBER", "id")?)?;
				let phone_number = required(fields.next(), "ACCESS_NUMBER", "number")?.to_owned();

				return Ok(Self::Granted { activation_id, phone_number });
			},
			"NO_NUMBERS" => NumberRejection::NoNumbers,
			"NO_BALANCE" => NumberRejection::NoBalance,
			"BAD_KEY" => NumberRejection::BadKey,
			"BAD_SERVICE" => NumberRejection::BadService,
			"BAD_ACTION" => NumberRejection::BadAction,
			"ERROR_SQL" => NumberRejection::ErrorSql,
			"BANNED" => NumberRejection::Banned { until: required(rest, "BANNED", "until")?.to_owned() },
			"WRONG_MAX_PRICE" => NumberRejection::WrongMaxPrice {
				min: required(rest, "WRONG_MAX_PRICE", "min")?.to_owned(),
			},
			_ => return Err(ProtocolError::UnknownTag { endpoint: ENDPOINT, line: line.to_owned() }),
		};

		Ok(Self::Rejected(rejection))
	}
}

/// Documented reasons the provider gives for not issuing a number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumberRejection {
	/// No numbers available for the service and country.
	NoNumbers,
	/// Account balance is too low.
	NoBalance,
	/// API key is invalid.
	BadKey,
	/// Service code is unknown to the provider.
	BadService,
	/// Action name is invalid.
	BadAction,
	/// Provider-side database error.
	ErrorSql,
	/// Account is banned until the given time.
	Banned {
		/// Provider-formatted end of the ban.
		until: String,
	},
	/// Configured maximum price is below the current minimum.
	WrongMaxPrice {
		/// Current minimum price.
		min: String,
	},
}
impl NumberRejection {
	/// Wire tag of the rejection.
	pub fn tag(&self) -> &'static str {
		match self {
			Self::NoNumbers => "NO_NUMBERS",
			Self::NoBalance => "NO_BALANCE",
			Self::BadKey => "BAD_KEY",
			Self::BadService => "BAD_SERVICE",
			Self::BadAction => "BAD_ACTION",
			Self::ErrorSql => "ERROR_SQL",
			Self::Banned { .. } => "BANNED",
			Self::WrongMaxPrice { .. } => "WRONG_MAX_PRICE",
		}
	}
}
impl Display for NumberRejection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Banned { until } => write!(f, "BANNED:{until}"),
			Self::WrongMaxPrice { min } => write!(f, "WRONG_MAX_PRICE:{min}"),
			other => f.write_str(other.tag()),
		}
	}
}

/// Reply to a `getStatus` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusReply {
	/// `STATUS_WAIT_CODE`: no SMS yet.
	WaitCode,
	/// `STATUS_WAIT_RETRY:<code>`: waiting for a further code after `last_code`.
	WaitRetry {
		/// Previously delivered code.
		last_code: String,
	},
	/// `STATUS_WAIT_RESEND`: waiting for the sender to resend.
	WaitResend,
	/// `STATUS_CANCEL`: activation cancelled.
	Cancelled,
	/// `STATUS_OK:<code>`: OTP delivered.
	Delivered {
		/// Delivered code.
		code: String,
	},
	/// `NO_ACTIVATION`: unknown activation id.
	NoActivation,
	/// `BAD_KEY`.
	BadKey,
	/// `BAD_ACTION`.
	BadAction,
	/// `ERROR_SQL`.
	ErrorSql,
}
impl StatusReply {
	/// Parses one reply line.
	pub fn parse(line: &str) -> Result<Self, ProtocolError> {
		let line = line.trim();
		let (tag, rest) = split_tag(line);
		let first = || rest.and_then(|r| r.split(':').next());

		Ok(match tag {
			"STATUS_WAIT_CODE" => Self::WaitCode,
			"STATUS_WAIT_RETRY" => Self::WaitRetry {
				last_code: required(first(), "STATUS_WAIT_RETRY", "last code")?.to_owned(),
			},
			"STATUS_WAIT_RESEND" => Self::WaitResend,
			"STATUS_CANCEL" => Self::Cancelled,
			"STATUS_OK" =>
				Self::Delivered { code: required(first(), "STATUS_OK", "code")?.to_owned() },
			"NO_ACTIVATION" => Self::NoActivation,
			"BAD_KEY" => Self::BadKey,
			"BAD_ACTION" => Self::BadAction,
			"ERROR_SQL" => Self::ErrorSql,
			_ => return Err(ProtocolError::UnknownTag { endpoint: ENDPOINT, line: line.to_owned() }),
		})
	}

	/// Delivered code, if any.
	pub fn code(&self) -> Option<&str> {
		match self {
			Self::Delivered { code } => Some(code),
			_ => None,
		}
	}
}

fn split_tag(line: &str) -> (&str, Option<&str>) {
	match line.split_once(':') {
		Some((tag, rest)) => (tag, Some(rest)),
		None => (line, None),
	}
}

fn required<'a>(
	field: Option<&'a str>,
	tag: &'static str,
	name: &'static str,
) -> Result<&'a str, ProtocolError> {
	field
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.ok_or(ProtocolError::MissingField { tag, field: name })
}
