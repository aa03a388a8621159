// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A directory of `<class>.json` catalogs.
//!
//! Each file looks like the tracker's REST collection response:
//!
//! ```json
//! { "label": "name", "filterable": ["name", "status"],
//!   "collection": [ { "id": "1", "name": "urgent", "status": "open" } ] }
//! ```
//!
//! `label` names the record field shown as the row label and defaults to `name`. Every scalar
//! field other than `id` lands in the entity's attributes, the label field included, so a search
//! form can filter on it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::{Catalog, CandidateSource, FetchError, RecordError};
use crate::model::{CandidateSet, ClassName, Entity, EntityId};

const DEFAULT_LABEL_FIELD: &str = "name";

#[derive(Debug, Clone)]
pub struct CatalogFolder {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    filterable: BTreeSet<String>,
    collection: Vec<BTreeMap<String, Value>>,
}

impl CatalogFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_path(&self, class_name: &ClassName) -> PathBuf {
        self.root.join(format!("{}.json", class_name.as_str()))
    }

    /// Class names with a catalog file in the folder, sorted.
    pub fn class_names(&self) -> Result<Vec<ClassName>, FetchError> {
        let entries = fs::read_dir(&self.root)
            .map_err(|source| FetchError::Io { path: self.root.clone(), source })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| FetchError::Io { path: self.root.clone(), source })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(name) = ClassName::new(stem) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

impl CandidateSource for CatalogFolder {
    fn fetch_candidates(&self, class_name: &ClassName) -> Result<Catalog, FetchError> {
        let path = self.catalog_path(class_name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::UnknownClass { class_name: class_name.clone() });
            }
            Err(source) => return Err(FetchError::Io { path, source }),
        };

        let file: CatalogFile = serde_json::from_slice(&bytes)
            .map_err(|source| FetchError::Parse { path: path.clone(), source })?;
        let label_field = file.label.as_deref().unwrap_or(DEFAULT_LABEL_FIELD);

        let mut entities = Vec::with_capacity(file.collection.len());
        for (index, record) in file.collection.iter().enumerate() {
            let entity = entity_from_record(record, label_field)
                .map_err(|reason| FetchError::InvalidRecord { path: path.clone(), index, reason })?;
            entities.push(entity);
        }

        tracing::debug!(
            class = %class_name,
            path = %path.display(),
            rows = entities.len(),
            "loaded catalog"
        );
        Ok(Catalog::new(CandidateSet::new(entities), file.filterable))
    }
}

fn entity_from_record(
    record: &BTreeMap<String, Value>,
    label_field: &str,
) -> Result<Entity, RecordError> {
    let raw_id = record.get("id").and_then(scalar_text).ok_or(RecordError::MissingId)?;
    let id = EntityId::new(raw_id).map_err(RecordError::InvalidId)?;
    let label = record
        .get(label_field)
        .and_then(scalar_text)
        .ok_or_else(|| RecordError::MissingLabel { field: label_field.to_owned() })?;

    let mut entity = Entity::new(id, label);
    for (key, value) in record {
        if key == "id" {
            continue;
        }
        if let Some(text) = scalar_text(value) {
            entity = entity.with_attribute(key.clone(), text);
        }
    }
    Ok(entity)
}

/// Strings, numbers and booleans as text; nested values and `null` are skipped.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
