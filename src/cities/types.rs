//! City records and the errors produced while syncing them.
//!
//! WIRE FORMAT
//! ===========
//! Keys are camelCase to match the JSON collection endpoint. Ids are
//! server-assigned and may arrive as JSON numbers or strings depending on the
//! backend, so `CityId` normalizes both to canonical text.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by city collection requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CityError {
    /// The request could not complete (connect, send, or body read failed).
    #[error("network request failed: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status { status: u16 },

    /// The response body did not have the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// CITY ID
// =============================================================================

/// Server-assigned city identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityId(String);

impl CityId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value when the id is a canonical decimal (`"73"`, not `"073"`).
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        match self.0.parse::<u64>() {
            Ok(n) if n.to_string() == self.0 => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for CityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for CityId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl FromStr for CityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_owned()))
    }
}

impl Serialize for CityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self::from(n),
            RawId::Text(s) => Self(s),
        })
    }
}

// =============================================================================
// CITY
// =============================================================================

/// Map coordinates of a visited city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// One visited-city record as held by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub city_name: String,
    pub country: String,
    #[serde(default)]
    pub emoji: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

/// A city that has not been assigned an id yet. Sent as the creation body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCity {
    pub city_name: String,
    pub country: String,
    #[serde(default)]
    pub emoji: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

impl NewCity {
    /// Attach a server-assigned id.
    #[must_use]
    pub fn with_id(self, id: CityId) -> City {
        City {
            id,
            city_name: self.city_name,
            country: self.country,
            emoji: self.emoji,
            date: self.date,
            notes: self.notes,
            position: self.position,
        }
    }
}
