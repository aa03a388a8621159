// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Entities and candidate sets come from a data source; a selection holds the ids picked for one
//! field and serializes them into the comma-joined value the parent field stores.

pub mod binding;
pub mod entity;
pub mod ids;
pub mod selection;
pub mod value;

pub use binding::FieldBinding;
pub use entity::{CandidateSet, Entity};
pub use ids::{ClassName, EntityId, FieldName, Id, IdError};
pub use selection::{Selection, SelectionMode, Toggle};
pub use value::{parse_field_value, SerializedValue};
