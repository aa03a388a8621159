// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use crate::model::{FieldName, IdError};

/// Correlates a popup's Apply/Cancel with the opener session that created it.
///
/// Only the most recently issued handle for a field is active; older ones are stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionHandle {
    field: FieldName,
    serial: u64,
}

impl SessionHandle {
    pub(crate) fn new(field: FieldName, serial: u64) -> Self {
        Self { field, serial }
    }

    pub fn field(&self) -> &FieldName {
        &self.field
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.field, self.serial)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionHandleError {
    MissingSerial,
    InvalidSerial(String),
    InvalidField(IdError),
}

impl fmt::Display for SessionHandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSerial => f.write_str("session handle must look like '<field>#<serial>'"),
            Self::InvalidSerial(raw) => write!(f, "invalid session serial {raw:?}"),
            Self::InvalidField(err) => write!(f, "invalid session field: {err}"),
        }
    }
}

impl std::error::Error for SessionHandleError {}

impl FromStr for SessionHandle {
    type Err = SessionHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, serial) = s.rsplit_once('#').ok_or(SessionHandleError::MissingSerial)?;
        let serial = serial
            .parse::<u64>()
            .map_err(|_| SessionHandleError::InvalidSerial(serial.to_owned()))?;
        let field = FieldName::new(field).map_err(SessionHandleError::InvalidField)?;
        Ok(Self { field, serial })
    }
}
