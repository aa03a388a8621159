// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::EntityId;

/// A selectable record (keyword, user, issue, role, ...).
///
/// Entities are immutable once fetched for a popup session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    label: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl Entity {
    pub fn new(id: EntityId, label: impl Into<String>) -> Self {
        Self { id, label: label.into(), attributes: BTreeMap::new() }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Ordered candidate rows for one popup session.
///
/// Order is the data source's natural order; nothing in the crate re-sorts a candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet {
    entities: Vec<Entity>,
}

impl CandidateSet {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.entities.iter().map(Entity::id)
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.entities
    }
}

impl FromIterator<Entity> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self { entities: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
