// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::FieldName;

/// The parent page: a set of single-string fields.
pub trait FormFields {
    fn value(&self, field: &FieldName) -> Option<&str>;
    fn set_value(&mut self, field: &FieldName, value: String);
}

/// In-memory form that keeps fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentForm {
    fields: Vec<(FieldName, String)>,
}

impl ParentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set_value(&field, value.into());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, &str)> + '_ {
        self.fields.iter().map(|(field, value)| (field, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FormFields for ParentForm {
    fn value(&self, field: &FieldName) -> Option<&str> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, value)| value.as_str())
    }

    fn set_value(&mut self, field: &FieldName, value: String) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field.clone(), value)),
        }
    }
}
