// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::{Catalog, CandidateSource, FetchError};
use crate::model::ClassName;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    catalogs: BTreeMap<ClassName, Catalog>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, class_name: ClassName, catalog: Catalog) -> Self {
        self.insert(class_name, catalog);
        self
    }

    pub fn insert(&mut self, class_name: ClassName, catalog: Catalog) {
        self.catalogs.insert(class_name, catalog);
    }

    pub fn class_names(&self) -> impl Iterator<Item = &ClassName> + '_ {
        self.catalogs.keys()
    }
}

impl CandidateSource for MemorySource {
    fn fetch_candidates(&self, class_name: &ClassName) -> Result<Catalog, FetchError> {
        self.catalogs
            .get(class_name)
            .cloned()
            .ok_or_else(|| FetchError::UnknownClass { class_name: class_name.clone() })
    }
}
