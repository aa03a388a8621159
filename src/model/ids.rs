// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated identifier used across the model and protocol surfaces.
///
/// Ids travel inside comma-joined field values (`"k1,k3"`), so the only hard rules are that an
/// id is non-empty, carries no `,` and has no surrounding whitespace. Anything else (numeric
/// tracker ids, role names, usernames) is accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self { value, _marker: PhantomData })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsComma,
    SurroundingWhitespace,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsComma => f.write_str("id must not contain ','"),
            Self::SurroundingWhitespace => {
                f.write_str("id must not start or end with whitespace")
            }
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains(',') {
        return Err(IdError::ContainsComma);
    }
    if value.trim() != value {
        return Err(IdError::SurroundingWhitespace);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityIdTag {}
pub type EntityId = Id<EntityIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldNameTag {}
pub type FieldName = Id<FieldNameTag>;

/// Entity kind as named by the tracker's REST surface (`keyword`, `user`, `issue`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassNameTag {}
pub type ClassName = Id<ClassNameTag>;

#[cfg(test)]
mod tests {
    use super::{EntityId, Id, IdError};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_comma() {
        let result: Result<Id<()>, _> = Id::new("a,b");
        assert_eq!(result, Err(IdError::ContainsComma));
    }

    #[test]
    fn id_rejects_surrounding_whitespace() {
        let result: Result<Id<()>, _> = Id::new(" k1");
        assert_eq!(result, Err(IdError::SurroundingWhitespace));
        let result: Result<Id<()>, _> = Id::new("k1\t");
        assert_eq!(result, Err(IdError::SurroundingWhitespace));
    }

    #[test]
    fn id_accepts_inner_whitespace_and_symbols() {
        let id = EntityId::new("Project Lead").expect("id");
        assert_eq!(id.as_str(), "Project Lead");
    }

    #[test]
    fn id_round_trips_through_json() {
        let id = EntityId::new("42").expect("id");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"42\"");
        let back: EntityId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);

        let err = serde_json::from_str::<EntityId>("\"a,b\"").unwrap_err();
        assert!(err.to_string().contains("','"));
    }
}
