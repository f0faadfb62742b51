//! Strongly typed identifiers for credentials and deployed services.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
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
// Identifiers end up in URL paths and query strings.
const RESERVED_CHARS: [char; 4] = ['/', '?', '#', '&'];

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of identifier (API key, secret key, plugin service).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (API key, secret key, plugin service).
		kind: &'static str,
	},
	/// The identifier contains a URL-reserved or control character.
	#[error("{kind} contains the reserved character {ch:?}.")]
	ReservedCharacter {
		/// Kind of identifier (API key, secret key, plugin service).
		kind: &'static str,
		/// Offending character.
		ch: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (API key, secret key, plugin service).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ApiKey, "Application API key, sent as the OAuth `client_id`.", "API key" }
def_id! {
	ServiceName,
	"Service-name suffix of a deployed plugin application, appended to the plugin route.",
	"Plugin service"
}

pub(crate) fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(ch) = view.chars().find(|ch| ch.is_control() || RESERVED_CHARS.contains(ch)) {
		return Err(IdentifierError::ReservedCharacter { kind, ch });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(ApiKey::new(" key-123").is_err(), "Leading whitespace must be rejected.");
		assert!(ApiKey::new("key-123 ").is_err(), "Trailing whitespace must be rejected.");

		let key = ApiKey::new("key-123").expect("API key fixture should be considered valid.");

		assert_eq!(key.as_ref(), "key-123");
		assert!(ServiceName::new("").is_err());
		assert!(ServiceName::new("with space").is_err());
	}

	#[test]
	fn service_names_cannot_escape_the_plugin_route() {
		assert_eq!(
			ServiceName::new("kb/../chat"),
			Err(IdentifierError::ReservedCharacter { kind: "Plugin service", ch: '/' })
		);
		assert!(ServiceName::new("kb?access_token=x").is_err());
		assert!(ServiceName::new("kb#frag").is_err());

		ServiceName::new("xyz_kb-01").expect("Plain service names should be accepted.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let service: ServiceName = serde_json::from_str("\"kb-42\"")
			.expect("Service name should deserialize successfully.");

		assert_eq!(service.as_ref(), "kb-42");
		assert!(serde_json::from_str::<ServiceName>("\"with space\"").is_err());
		assert!(serde_json::from_str::<ApiKey>("\"\"").is_err());
	}

	#[test]
	fn length_limits_apply() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ApiKey::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(ApiKey::new(&too_long), Err(IdentifierError::TooLong { .. })));
	}
}
