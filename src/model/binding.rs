// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{ClassName, EntityId, FieldName};
use super::selection::SelectionMode;

/// Associates one popup session with the parent field it will write into.
///
/// Created when a popup opens and dropped together with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    field_name: FieldName,
    class_name: ClassName,
    mode: SelectionMode,
    initial_value: Vec<EntityId>,
}

impl FieldBinding {
    pub fn new(
        field_name: FieldName,
        class_name: ClassName,
        mode: SelectionMode,
        initial_value: Vec<EntityId>,
    ) -> Self {
        Self { field_name, class_name, mode, initial_value }
    }

    pub fn field_name(&self) -> &FieldName {
        &self.field_name
    }

    pub fn class_name(&self) -> &ClassName {
        &self.class_name
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_multi(&self) -> bool {
        self.mode.is_multi()
    }

    pub fn initial_value(&self) -> &[EntityId] {
        &self.initial_value
    }
}
