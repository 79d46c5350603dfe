//! RSVP records, raw submissions, and validation.
//!
//! A browser form posts loosely-typed JSON: counts may arrive as numbers or as
//! strings, optional text may be missing or `null`. [`RsvpSubmission`] keeps
//! every field as it arrived and [`RsvpSubmission::validate`] turns it into a
//! [`ValidatedRsvp`], or a [`ValidationError`] naming the first offending field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Normalized email address: trimmed and lower-cased.
///
/// This is the uniqueness key of the record store. It can only be built
/// through [`EmailKey::parse`] (or deserialization, which normalizes the same
/// way), so an un-normalized string never reaches a backend as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailKey(String);

impl EmailKey {
    /// Normalize a raw email. Returns `None` when nothing is left after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use rsvp_core::EmailKey;
    ///
    /// let key = EmailKey::parse("  Jo@X.com ").unwrap();
    /// assert_eq!(key.as_str(), "jo@x.com");
    /// assert!(EmailKey::parse("   ").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// The normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailKey {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| "email cannot be empty".to_string())
    }
}

impl From<EmailKey> for String {
    fn from(key: EmailKey) -> Self {
        key.0
    }
}

/// A stored RSVP. One per normalized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    /// Guest name, trimmed and non-empty.
    pub name: String,
    /// Normalized email, the record's key.
    pub email: EmailKey,
    /// Whether the guest is coming.
    #[serde(default)]
    pub attending: bool,
    /// Number of adults in the party.
    #[serde(default)]
    pub adults: u32,
    /// Number of kids in the party.
    #[serde(default)]
    pub kids: u32,
    /// Dietary notes, possibly empty.
    #[serde(default)]
    pub dietary: String,
    /// Free-form comments, possibly empty.
    #[serde(default)]
    pub comments: String,
    /// Time of the last write for this email.
    #[serde(rename = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl RsvpRecord {
    /// Adults plus kids for this record.
    #[must_use]
    pub fn guest_count(&self) -> u64 {
        u64::from(self.adults) + u64::from(self.kids)
    }
}

/// Submission field, used to point validation errors at their source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// `name`
    Name,
    /// `email`
    Email,
    /// `attending`
    Attending,
    /// `adults`
    Adults,
    /// `kids`
    Kids,
    /// `dietary`
    Dietary,
    /// `comments`
    Comments,
}

impl Field {
    /// The JSON name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Attending => "attending",
            Self::Adults => "adults",
            Self::Kids => "kids",
            Self::Dietary => "dietary",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submission was rejected. Nothing was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// The offending field.
    pub field: Field,
    /// User-facing description of the problem.
    pub message: String,
}

impl ValidationError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw RSVP submission as posted by a client.
///
/// Every field is kept as the JSON value it arrived as. `None` means the
/// field was absent; `Some(Value::Null)` means it was sent as `null`. The
/// distinction matters for guest counts, where absent means zero but `null`
/// is not a number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RsvpSubmission {
    /// Guest name.
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    /// Guest email.
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    /// Attending flag: bool, `"yes"`/`"no"`, or `"true"`/`"false"`.
    #[serde(default, deserialize_with = "present")]
    pub attending: Option<Value>,
    /// Adult count: integer or integer string.
    #[serde(default, deserialize_with = "present")]
    pub adults: Option<Value>,
    /// Kid count: integer or integer string.
    #[serde(default, deserialize_with = "present")]
    pub kids: Option<Value>,
    /// Dietary notes.
    #[serde(default, deserialize_with = "present")]
    pub dietary: Option<Value>,
    /// Comments.
    #[serde(default, deserialize_with = "present")]
    pub comments: Option<Value>,
}

/// Wraps any value that is present in the input, including `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A submission that passed validation, ready to be timestamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRsvp {
    /// Trimmed name.
    pub name: String,
    /// Normalized email.
    pub email: EmailKey,
    /// Attending flag.
    pub attending: bool,
    /// Adult count.
    pub adults: u32,
    /// Kid count.
    pub kids: u32,
    /// Trimmed dietary notes.
    pub dietary: String,
    /// Trimmed comments.
    pub comments: String,
}

impl ValidatedRsvp {
    /// Stamp the submission into a record.
    #[must_use]
    pub fn into_record(self, updated_at: DateTime<Utc>) -> RsvpRecord {
        RsvpRecord {
            name: self.name,
            email: self.email,
            attending: self.attending,
            adults: self.adults,
            kids: self.kids,
            dietary: self.dietary,
            comments: self.comments,
            updated_at,
        }
    }
}

impl RsvpSubmission {
    /// Validate and normalize the submission.
    ///
    /// Fields are checked in declaration order and the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when:
    /// - `name` or `email` is missing, `null`, not text, or blank
    /// - `attending` is not a bool or one of `yes`/`no`/`true`/`false`
    /// - `adults` or `kids` is not a whole number, or is negative
    /// - `dietary` or `comments` is present but not text
    pub fn validate(&self) -> Result<ValidatedRsvp, ValidationError> {
        let name = required_text(self.name.as_ref(), Field::Name)?;
        let email_raw = required_text(self.email.as_ref(), Field::Email)?;
        let email = EmailKey::parse(&email_raw)
            .ok_or_else(|| ValidationError::new(Field::Email, "Email is required"))?;

        Ok(ValidatedRsvp {
            name,
            email,
            attending: attending_flag(self.attending.as_ref())?,
            adults: guest_count(self.adults.as_ref(), Field::Adults)?,
            kids: guest_count(self.kids.as_ref(), Field::Kids)?,
            dietary: optional_text(self.dietary.as_ref(), Field::Dietary)?,
            comments: optional_text(self.comments.as_ref(), Field::Comments)?,
        })
    }
}

fn required_text(value: Option<&Value>, field: Field) -> Result<String, ValidationError> {
    let required = || {
        let label = match field {
            Field::Name => "Name",
            Field::Email => "Email",
            other => other.as_str(),
        };
        ValidationError::new(field, format!("{label} is required"))
    };

    match value {
        None | Some(Value::Null) => Err(required()),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(required())
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(ValidationError::new(field, format!("{field} must be text"))),
    }
}

fn optional_text(value: Option<&Value>, field: Field) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.trim().to_string()),
        Some(_) => Err(ValidationError::new(field, format!("{field} must be text"))),
    }
}

fn attending_flag(value: Option<&Value>) -> Result<bool, ValidationError> {
    let invalid = || ValidationError::new(Field::Attending, "attending must be true or false");

    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" => Ok(false),
            _ => Err(invalid()),
        },
        Some(_) => Err(invalid()),
    }
}

fn guest_count(value: Option<&Value>, field: Field) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::new(field, format!("Invalid number of guests for {field}"));

    let count: i64 = match value {
        None => return Ok(0),
        // Fractions and values beyond i64 have no integer form.
        Some(Value::Number(number)) => number.as_i64().ok_or_else(invalid)?,
        Some(Value::String(text)) => text.trim().parse().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if count < 0 {
        return Err(ValidationError::new(
            field,
            format!("Number of guests cannot be negative ({field})"),
        ));
    }

    u32::try_from(count).map_err(|_| invalid())
}
