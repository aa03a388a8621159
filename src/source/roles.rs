// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Role names exposed as a selectable class.
//!
//! The user `roles` property is stored as a plain comma-joined string, but the selector treats
//! it like a multilink to a `role` class whose ids and labels are both the role name.

use std::collections::BTreeSet;

use super::Catalog;
use crate::model::{CandidateSet, Entity, EntityId};

pub const ROLE_CLASS: &str = "role";

/// Builds the `role` catalog from the security layer's role names, keeping their order.
///
/// Names that cannot be ids (blank, containing `,`) are skipped.
pub fn roles_catalog<S: AsRef<str>>(role_names: impl IntoIterator<Item = S>) -> Catalog {
    let mut seen = BTreeSet::new();
    let candidates = role_names
        .into_iter()
        .filter_map(|name| EntityId::new(name.as_ref().trim()).ok())
        .filter(|id| seen.insert(id.clone()))
        .map(|id| {
            let label = id.as_str().to_owned();
            Entity::new(id, label.clone()).with_attribute("name", label)
        })
        .collect::<CandidateSet>();

    Catalog::new(candidates, BTreeSet::from(["name".to_owned()]))
}
