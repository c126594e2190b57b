//! Phone-number normalization into protocol addresses.
//!
//! Destination numbers arrive from the CRM in whatever shape an operator
//! typed them (`0532 123 45 67`, `+90 532 123 4567`, `5321234567`). They are
//! normalized into the national `90…` form and suffixed with the messaging
//! network's address domain. Normalization is total: any input yields an
//! address, and delivery failures for garbage numbers surface from the wire,
//! not from validation here.

use std::fmt;

/// Address domain appended to every normalized number.
pub const NETWORK_SUFFIX: &str = "@s.whatsapp.net";

/// Country prefix assumed for national-format numbers.
pub const COUNTRY_PREFIX: &str = "90";

/// A destination address in the messaging network's format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jid(String);

impl Jid {
    /// Normalize a raw phone number into a destination address.
    ///
    /// Steps:
    /// 1. strip every non-digit character,
    /// 2. `0xxxxxxxxxx` becomes `90xxxxxxxxxx`,
    /// 3. a bare 10-digit mobile number starting with `5` gets `90` prepended,
    /// 4. anything else not already starting with `90` gets `90` prepended,
    /// 5. the network suffix is appended.
    pub fn from_phone(raw: &str) -> Self {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        let national = if let Some(rest) = digits.strip_prefix('0') {
            format!("{COUNTRY_PREFIX}{rest}")
        } else if digits.starts_with('5') && digits.len() == 10 {
            format!("{COUNTRY_PREFIX}{digits}")
        } else if !digits.starts_with(COUNTRY_PREFIX) {
            format!("{COUNTRY_PREFIX}{digits}")
        } else {
            digits
        };

        Self(format!("{national}{NETWORK_SUFFIX}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digit prefix without the network suffix.
    pub fn digits(&self) -> &str {
        self.0.trim_end_matches(NETWORK_SUFFIX)
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
