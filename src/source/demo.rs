// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in tracker data for `--demo` and for tests.

use std::collections::BTreeSet;

use super::{roles_catalog, Catalog, MemorySource, ROLE_CLASS};
use crate::model::{CandidateSet, ClassName, Entity, EntityId};

pub const DEMO_ROLES: [&str; 3] = ["admin", "user", "anonymous"];

const KEYWORDS: [(&str, &str, &str); 8] = [
    ("1", "urgent", "open"),
    ("2", "regression", "open"),
    ("3", "docs", "closed"),
    ("4", "security", "open"),
    ("5", "performance", "open"),
    ("6", "wontfix", "closed"),
    ("7", "usability", "open"),
    ("8", "packaging", "closed"),
];

const USERS: [(&str, &str, &str, &str); 5] = [
    ("1", "admin", "Administrator", "admin"),
    ("2", "anonymous", "Anonymous", "anonymous"),
    ("3", "alice", "Alice Liddell", "user"),
    ("4", "bob", "Bob Builder", "user"),
    ("5", "carol", "Carol Danvers", "admin,user"),
];

const ISSUE_TITLES: [&str; 6] = [
    "Popup loses selection after search",
    "Keyword list ignores sort order",
    "Reset button clears checked rows",
    "Apply writes stale value",
    "Pagination shows wrong range",
    "Roles field rejects commas",
];

fn filterable(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

pub fn keyword_catalog() -> Catalog {
    let candidates = KEYWORDS
        .iter()
        .filter_map(|(raw_id, name, status)| {
            let entity = Entity::new(EntityId::new(*raw_id).ok()?, *name);
            Some(entity.with_attribute("name", *name).with_attribute("status", *status))
        })
        .collect::<CandidateSet>();
    Catalog::new(candidates, filterable(&["name", "status"]))
}

pub fn user_catalog() -> Catalog {
    let candidates = USERS
        .iter()
        .filter_map(|(raw_id, username, realname, roles)| {
            let entity = Entity::new(EntityId::new(*raw_id).ok()?, *username);
            Some(
                entity
                    .with_attribute("username", *username)
                    .with_attribute("realname", *realname)
                    .with_attribute("roles", *roles),
            )
        })
        .collect::<CandidateSet>();
    Catalog::new(candidates, filterable(&["username", "realname", "roles"]))
}

/// Sixty issues so the default page size of 50 spills onto a second page.
pub fn issue_catalog() -> Catalog {
    let candidates = (1..=60usize)
        .filter_map(|n| {
            let title = format!("{} ({n})", ISSUE_TITLES[(n - 1) % ISSUE_TITLES.len()]);
            let status = if n % 3 == 0 { "resolved" } else { "open" };
            let keyword = KEYWORDS[(n - 1) % KEYWORDS.len()].0;
            let entity = Entity::new(EntityId::new(n.to_string()).ok()?, title.clone());
            Some(
                entity
                    .with_attribute("title", title)
                    .with_attribute("status", status)
                    .with_attribute("keyword", keyword),
            )
        })
        .collect::<CandidateSet>();
    Catalog::new(candidates, filterable(&["title", "status", "keyword"]))
}

/// Keywords, users, issues and roles in memory.
pub fn demo_source() -> MemorySource {
    let catalogs = [
        ("keyword", keyword_catalog()),
        ("user", user_catalog()),
        ("issue", issue_catalog()),
        (ROLE_CLASS, roles_catalog(DEMO_ROLES)),
    ];

    let mut source = MemorySource::new();
    for (name, catalog) in catalogs {
        if let Ok(class_name) = ClassName::new(name) {
            source.insert(class_name, catalog);
        }
    }
    source
}
