use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opilo panel username.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Parameter name used by Opilo (`username`).
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Opilo panel password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
/// `Debug` output never contains the secret.
pub struct Password(String);

impl Password {
    /// Parameter name used by Opilo (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Credentials attached to every Opilo request.
pub struct Account {
    username: Username,
    password: Password,
}

impl Account {
    /// Create an account, validating both parts.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Opilo message id, assigned when a message is queued or received.
pub struct SmsId(u64);

impl SmsId {
    /// Parameter name used by Opilo for status lookups (`ids`).
    pub const FIELD: &'static str = "ids";

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SmsId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SmsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A message waiting to be sent.
///
/// Invariants: `from` and `to` are non-empty after trimming, `text` is non-empty
/// after trimming (the text itself is kept as given, whitespace included).
pub struct OutgoingSms {
    from: String,
    to: String,
    text: String,
}

impl OutgoingSms {
    /// Parameter name for the sender line (`from`).
    pub const FROM_FIELD: &'static str = "from";
    /// Parameter name for the recipient (`to`).
    pub const TO_FIELD: &'static str = "to";
    /// Parameter name for the body (`text`).
    pub const TEXT_FIELD: &'static str = "text";

    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let from = non_empty_trimmed(from.into(), Self::FROM_FIELD)?;
        let to = non_empty_trimmed(to.into(), Self::TO_FIELD)?;
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: Self::TEXT_FIELD,
            });
        }
        Ok(Self { from, to, text })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn non_empty_trimmed(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}
