// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{CandidateSet, Entity};

/// Pseudo-attribute that always filters on the entity id.
pub const ID_ATTRIBUTE: &str = "id";

/// Search-form key that carries the free-text term instead of an attribute filter.
pub const TEXT_KEY: &str = "text";

const FUZZY_RATIO_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    #[default]
    Substring,
    Fuzzy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Exact,
    #[default]
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    attribute: String,
    value: String,
    op: FilterOp,
}

impl AttributeFilter {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>, op: FilterOp) -> Self {
        Self { attribute: attribute.into(), value: value.into(), op }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    fn matches(&self, entity: &Entity) -> bool {
        let candidate = if self.attribute == ID_ATTRIBUTE {
            Some(entity.id().as_str())
        } else {
            entity.attribute(&self.attribute)
        };
        let Some(candidate) = candidate else {
            return false;
        };

        match self.op {
            FilterOp::Exact => candidate == self.value,
            FilterOp::Contains => {
                candidate.to_lowercase().contains(&self.value.trim().to_lowercase())
            }
        }
    }
}

/// Search criteria for one popup search. The empty query selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: Option<String>,
    filters: Vec<AttributeFilter>,
    text_match: TextMatch,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    pub fn with_filter(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
        op: FilterOp,
    ) -> Self {
        self.filters.push(AttributeFilter::new(attribute, value, op));
        self
    }

    /// Builds a query from search-form entries.
    ///
    /// Blank entries are skipped, `text` becomes the free-text term and every other key becomes a
    /// case-insensitive substring filter on the attribute of the same name.
    pub fn from_form<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (key, value) in entries {
            let (key, value) = (key.as_ref().trim(), value.as_ref().trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            if key == TEXT_KEY {
                query.text = Some(value.to_owned());
            } else {
                query.filters.push(AttributeFilter::new(key, value, FilterOp::Contains));
            }
        }
        query
    }

    /// The free-text term, if it is not blank.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|text| !text.is_empty())
    }

    pub fn filters(&self) -> &[AttributeFilter] {
        &self.filters
    }

    pub fn text_match(&self) -> TextMatch {
        self.text_match
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.filters.is_empty()
    }
}

/// Rows matching a query plus the filter clauses that were dropped as unrecognized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub rows: CandidateSet,
    pub ignored: Vec<String>,
}

/// Filters `candidates` down to the rows matching every clause of `query`.
///
/// Pure and order-preserving: output order is the candidate order. Filters on attributes outside
/// `filterable` (other than `id`) are ignored and reported rather than failing the search.
pub fn filter_candidates(
    candidates: &CandidateSet,
    query: &Query,
    filterable: &BTreeSet<String>,
) -> FilterOutcome {
    let mut ignored = Vec::new();
    let mut active = Vec::new();
    for filter in query.filters() {
        if filter.attribute() == ID_ATTRIBUTE || filterable.contains(filter.attribute()) {
            active.push(filter);
        } else {
            tracing::debug!(attribute = filter.attribute(), "ignoring filter on unknown attribute");
            ignored.push(filter.attribute().to_owned());
        }
    }

    let needle = query.text().map(str::to_lowercase);
    let rows = candidates
        .iter()
        .filter(|entity| {
            needle.as_deref().map_or(true, |needle| {
                text_matches(query.text_match(), needle, &entity.label().to_lowercase())
            })
        })
        .filter(|entity| active.iter().all(|filter| filter.matches(entity)))
        .cloned()
        .collect();

    FilterOutcome { rows, ignored }
}

fn text_matches(mode: TextMatch, needle: &str, haystack: &str) -> bool {
    match mode {
        TextMatch::Substring => haystack.contains(needle),
        TextMatch::Fuzzy => {
            haystack.contains(needle)
                || is_subsequence(needle, haystack)
                || rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars())
                    >= FUZZY_RATIO_THRESHOLD
        }
    }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle.chars().all(|wanted| hay.any(|ch| ch == wanted))
}

#[cfg(test)]
mod tests;
