//! Typed constants.
//!
//! A [`Constant`] always carries a value of exactly one [`DataKind`]; the kind is
//! derived from the stored value, so the two can never disagree. Constructors that
//! take a declared kind (`Constant::parse`, `Constant::expect_kind`) fail when the
//! value does not fit it.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::Token;
use crate::error::{Error, Result};

/// The data kinds a constant can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Boolean,
    String,
    Number,
    Date,
    Binary,
    Guid,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Boolean => "boolean",
            DataKind::String => "string",
            DataKind::Number => "number",
            DataKind::Date => "date",
            DataKind::Binary => "binary",
            DataKind::Guid => "guid",
        };
        f.write_str(name)
    }
}

/// A numeric constant.
///
/// Floats are finite; use [`Constant::float`] to build one with that check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
}

impl Number {
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(f) => f.is_finite(),
            Number::Int(_) | Number::Decimal(_) => true,
        }
    }

    fn to_token(self) -> Token {
        match self {
            Number::Int(n) => Token::LitInt(n),
            Number::Float(f) => Token::LitFloat(f),
            Number::Decimal(d) => Token::LitDecimal(d),
        }
    }
}

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Constant {
    Boolean(bool),
    String(String),
    Number(Number),
    Date(NaiveDateTime),
    Binary(Vec<u8>),
    Guid(Uuid),
}

impl Constant {
    pub fn kind(&self) -> DataKind {
        match self {
            Constant::Boolean(_) => DataKind::Boolean,
            Constant::String(_) => DataKind::String,
            Constant::Number(_) => DataKind::Number,
            Constant::Date(_) => DataKind::Date,
            Constant::Binary(_) => DataKind::Binary,
            Constant::Guid(_) => DataKind::Guid,
        }
    }

    /// Build a float constant. NaN and infinities are rejected.
    pub fn float(f: f64) -> Result<Self> {
        if !f.is_finite() {
            return Err(Error::invalid_constant(
                DataKind::Number,
                format!("{f} is not a finite number"),
            ));
        }
        Ok(Constant::Number(Number::Float(f)))
    }

    /// Build a date-only constant.
    pub fn date(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| Constant::Date(d.and_time(NaiveTime::MIN)))
            .ok_or_else(|| {
                Error::invalid_constant(
                    DataKind::Date,
                    format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
                )
            })
    }

    /// Build a date-time constant.
    pub fn date_time(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(Constant::Date)
            .ok_or_else(|| {
                Error::invalid_constant(
                    DataKind::Date,
                    format!(
                        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} is not a valid timestamp"
                    ),
                )
            })
    }

    /// Parse `text` as a constant of the declared `kind`.
    ///
    /// Booleans accept `true`/`false`/`1`/`0`, numbers accept integer or decimal
    /// notation, dates accept `YYYY-MM-DD` with an optional ` HH:MM:SS` (or
    /// `THH:MM:SS`) time part, binary accepts an even-length hex string with an
    /// optional `0x` prefix.
    pub fn parse(kind: DataKind, text: &str) -> Result<Self> {
        let text = text.trim();
        let fail = |reason: &str| Error::invalid_constant(kind, format!("'{text}' {reason}"));

        match kind {
            DataKind::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Constant::Boolean(true)),
                "false" | "0" => Ok(Constant::Boolean(false)),
                _ => Err(fail("is not a boolean")),
            },
            DataKind::String => Ok(Constant::String(text.to_string())),
            DataKind::Number => {
                if let Ok(n) = text.parse::<i64>() {
                    return Ok(Constant::Number(Number::Int(n)));
                }
                text.parse::<Decimal>()
                    .map(|d| Constant::Number(Number::Decimal(d)))
                    .map_err(|_| fail("is not a number"))
            }
            DataKind::Date => {
                for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
                    if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                        return Ok(Constant::Date(dt));
                    }
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(|d| Constant::Date(d.and_time(NaiveTime::MIN)))
                    .map_err(|_| fail("is not a date"))
            }
            DataKind::Binary => {
                let hex = text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(text);
                decode_hex(hex)
                    .map(Constant::Binary)
                    .ok_or_else(|| fail("is not a hex string"))
            }
            DataKind::Guid => Uuid::parse_str(text)
                .map(Constant::Guid)
                .map_err(|_| fail("is not a guid")),
        }
    }

    /// Check that this constant has the declared kind.
    pub fn expect_kind(self, kind: DataKind) -> Result<Self> {
        if self.kind() == kind {
            Ok(self)
        } else {
            Err(Error::invalid_constant(
                kind,
                format!("value of kind {} does not match", self.kind()),
            ))
        }
    }

    /// A date constant is date-only when every time-of-day component is zero.
    pub fn is_date_only(&self) -> bool {
        matches!(self, Constant::Date(dt) if is_midnight(dt))
    }

    pub fn to_token(&self) -> Token {
        match self {
            Constant::Boolean(b) => Token::LitBool(*b),
            Constant::String(s) => Token::LitString(s.clone()),
            Constant::Number(n) => n.to_token(),
            Constant::Date(dt) if is_midnight(dt) => Token::LitDate(dt.date()),
            Constant::Date(dt) => Token::LitDateTime(*dt),
            Constant::Binary(bytes) => Token::LitBinary(bytes.clone()),
            Constant::Guid(g) => Token::LitGuid(*g),
        }
    }
}

fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 && dt.nanosecond() == 0
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

impl From<bool> for Constant {
    fn from(b: bool) -> Self {
        Constant::Boolean(b)
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::String(s.into())
    }
}

impl From<String> for Constant {
    fn from(s: String) -> Self {
        Constant::String(s)
    }
}

impl From<i64> for Constant {
    fn from(n: i64) -> Self {
        Constant::Number(Number::Int(n))
    }
}

impl From<i32> for Constant {
    fn from(n: i32) -> Self {
        Constant::Number(Number::Int(i64::from(n)))
    }
}

impl From<Decimal> for Constant {
    fn from(d: Decimal) -> Self {
        Constant::Number(Number::Decimal(d))
    }
}

impl From<NaiveDate> for Constant {
    fn from(d: NaiveDate) -> Self {
        Constant::Date(d.and_time(NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for Constant {
    fn from(dt: NaiveDateTime) -> Self {
        Constant::Date(dt)
    }
}

impl From<Uuid> for Constant {
    fn from(g: Uuid) -> Self {
        Constant::Guid(g)
    }
}

impl From<Vec<u8>> for Constant {
    fn from(bytes: Vec<u8>) -> Self {
        Constant::Binary(bytes)
    }
}
