// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Data sources that supply candidate sets per entity kind.
//!
//! The popup only ever sees the [`CandidateSource`] trait; the in-memory, folder-backed and roles
//! sources are interchangeable behind it.

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::{CandidateSet, ClassName, IdError};

pub mod demo;
pub mod folder;
pub mod memory;
pub mod roles;

pub use demo::demo_source;
pub use folder::CatalogFolder;
pub use memory::MemorySource;
pub use roles::{roles_catalog, ROLE_CLASS};

/// Everything a popup needs from the data source for one entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    candidates: CandidateSet,
    filterable: BTreeSet<String>,
}

impl Catalog {
    pub fn new(candidates: CandidateSet, filterable: BTreeSet<String>) -> Self {
        Self { candidates, filterable }
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Attribute names the search form may filter on for this kind.
    pub fn filterable(&self) -> &BTreeSet<String> {
        &self.filterable
    }

    pub fn into_parts(self) -> (CandidateSet, BTreeSet<String>) {
        (self.candidates, self.filterable)
    }
}

/// Supplies the full candidate set for an entity kind.
///
/// Called at most once per popup open; retries belong to whoever re-opens the popup.
pub trait CandidateSource: Send + Sync {
    fn fetch_candidates(&self, class_name: &ClassName) -> Result<Catalog, FetchError>;
}

impl<S: CandidateSource + ?Sized> CandidateSource for std::sync::Arc<S> {
    fn fetch_candidates(&self, class_name: &ClassName) -> Result<Catalog, FetchError> {
        (**self).fetch_candidates(class_name)
    }
}

#[derive(Debug)]
pub enum FetchError {
    UnknownClass { class_name: ClassName },
    Unavailable { reason: String },
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    InvalidRecord { path: PathBuf, index: usize, reason: RecordError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    MissingId,
    InvalidId(IdError),
    MissingLabel { field: String },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("record has no 'id'"),
            Self::InvalidId(err) => write!(f, "invalid id: {err}"),
            Self::MissingLabel { field } => write!(f, "record has no label field '{field}'"),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClass { class_name } => write!(f, "unknown class '{class_name}'"),
            Self::Unavailable { reason } => write!(f, "data source unavailable: {reason}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Parse { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidRecord { path, index, reason } => {
                write!(f, "invalid record #{index} in {path:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnknownClass { .. } | Self::Unavailable { .. } | Self::InvalidRecord { .. } => {
                None
            }
        }
    }
}
