//! Strongly typed identifiers for customer orders and provider activations.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}

			/// Returns the identifier as sent on the wire.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (order, activation).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (order, activation).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (order, activation).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { OrderId, "Partner order identifier submitted by the customer.", "Order" }
def_id! { ActivationId, "Rental-provider activation identifier.", "Activation" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.chars().count() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(OrderId::new(" 240101ABCD").is_err(), "Leading whitespace must be rejected.");
		assert!(OrderId::new("240101ABCD ").is_err(), "Trailing whitespace must be rejected.");

		let order = OrderId::new("240101ABCD").expect("Order fixture should be considered valid.");

		assert_eq!(order.as_ref(), "240101ABCD");
		assert!(ActivationId::new("").is_err());
		assert!(ActivationId::new("12 34").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: ActivationId =
			serde_json::from_str("\"99\"").expect("Activation id should deserialize successfully.");

		assert_eq!(id.as_ref(), "99");
		assert_eq!(serde_json::to_string(&id).expect("Activation id should serialize."), "\"99\"");
		assert!(serde_json::from_str::<ActivationId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_applies_to_characters() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		OrderId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(
			OrderId::new(&too_long),
			Err(IdentifierError::TooLong { kind: "Order", max: IDENTIFIER_MAX_LEN })
		));
	}

	#[test]
	fn borrow_supports_str_lookup() {
		let map: HashMap<ActivationId, u8> = HashMap::from_iter([(
			ActivationId::new("99").expect("Activation used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("99"), Some(&7));
		assert_eq!(format!("{:?}", OrderId::new("A1").expect("Order id should be valid.")), "Order(A1)");
	}
}
