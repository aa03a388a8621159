// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Button captions. Missing keys fall back to English, unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    #[serde(rename = "Apply")]
    pub apply: String,
    #[serde(rename = "Cancel")]
    pub cancel: String,
    #[serde(rename = "Next")]
    pub next: String,
    #[serde(rename = "Prev")]
    pub prev: String,
    #[serde(rename = "Search")]
    pub search: String,
    #[serde(rename = "Reset")]
    pub reset: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            apply: "Apply".to_owned(),
            cancel: "Cancel".to_owned(),
            next: "Next".to_owned(),
            prev: "Prev".to_owned(),
            search: "Search".to_owned(),
            reset: "Reset".to_owned(),
        }
    }
}

#[derive(Debug)]
pub enum LabelsError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for LabelsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for LabelsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl Labels {
    pub fn from_json_str(path: &Path, json: &str) -> Result<Self, LabelsError> {
        serde_json::from_str(json)
            .map_err(|source| LabelsError::Json { path: path.to_path_buf(), source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LabelsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| LabelsError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(path, &json)
    }
}
