// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::EntityId;
use super::value::SerializedValue;

/// Whether a field accepts one id or a list of ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Single,
    #[default]
    Multi,
}

impl SelectionMode {
    pub fn from_multi(multi: bool) -> Self {
        if multi {
            Self::Multi
        } else {
            Self::Single
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(self, Self::Multi)
    }
}

/// Outcome of a single [`Selection::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

/// Selected entity ids for one field instance.
///
/// Ids are unique and kept in the order they were (most recently) switched on, which is the
/// order they serialize in. Equality compares membership only. Ids need not be present in any
/// candidate set: a selection survives filtering and re-search.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectionMode,
    ids: Vec<EntityId>,
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        Self { mode, ids: Vec::new() }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn toggle(&mut self, id: &EntityId) -> Toggle {
        if let Some(pos) = self.position(id) {
            self.ids.remove(pos);
            return Toggle::Off;
        }

        if self.mode == SelectionMode::Single {
            self.ids.clear();
        }
        self.ids.push(id.clone());
        Toggle::On
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn serialize(&self) -> SerializedValue {
        SerializedValue::from_ids(&self.ids)
    }

    /// Resets the selection to exactly `ids`, preserving their order.
    ///
    /// Duplicates keep their first position. In single mode only the last id survives.
    pub fn hydrate(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.ids.clear();
        for id in ids {
            if self.contains(&id) {
                continue;
            }
            if self.mode == SelectionMode::Single {
                self.ids.clear();
            }
            self.ids.push(id);
        }
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
            && self.ids.len() == other.ids.len()
            && self.ids.iter().all(|id| other.contains(id))
    }
}

impl Eq for Selection {}
