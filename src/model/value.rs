// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire format shared with the parent field: ids joined by an ASCII comma, no spaces.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::EntityId;

pub const SEPARATOR: char = ',';

/// The comma-joined id list written back into a parent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedValue(String);

impl SerializedValue {
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a EntityId>) -> Self {
        let mut out = String::new();
        for (idx, id) in ids.into_iter().enumerate() {
            if idx > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(id.as_str());
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        parse_field_value(&self.0)
    }
}

impl fmt::Display for SerializedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SerializedValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parses a parent field value into ordered, unique ids.
///
/// Field values may have been edited by hand, so segments are trimmed, empty segments are
/// dropped and repeated ids keep their first position. Never fails.
pub fn parse_field_value(raw: &str) -> Vec<EntityId> {
    let mut seen = BTreeSet::new();
    raw.split(SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| EntityId::new(segment).ok())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
