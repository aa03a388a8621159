// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpField {
    pub field: String,
    pub value: String,
    /// Entity kind the field selects from, when the field is bound.
    pub class: Option<String>,
    pub multi: Option<bool>,
    /// Handle of the popup currently allowed to write this field.
    pub active_handle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormReadResponse {
    pub fields: Vec<McpField>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FormSetParams {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormSetResponse {
    pub field: McpField,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PopupOpenParams {
    pub field: String,
    /// Overrides the field's bound entity kind (required for unbound fields).
    pub class: Option<String>,
    /// Overrides the field's bound selection mode (defaults to multi for unbound fields).
    pub multi: Option<bool>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PopupHandleParams {
    pub handle: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct McpFilter {
    pub attribute: String,
    pub value: String,
    /// Case-sensitive equality instead of case-insensitive substring.
    pub exact: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PopupSearchParams {
    pub handle: String,
    /// Free-text term matched case-insensitively against row labels.
    pub text: Option<String>,
    pub filters: Option<Vec<McpFilter>>,
    /// Also accept subsequence and close fuzzy matches for `text`.
    pub fuzzy: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PopupToggleParams {
    pub handle: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PopupPageParams {
    pub handle: String,
    /// 1-based page index; out-of-range values clamp.
    pub page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpRow {
    pub id: String,
    pub label: String,
    pub checked: bool,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpPage {
    pub index: u64,
    pub size: u64,
    pub total: u64,
    pub page_count: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PopupSnapshot {
    pub handle: String,
    pub field: String,
    pub class: String,
    pub multi: bool,
    pub state: String,
    /// The value Apply would write right now.
    pub preview: String,
    pub page: McpPage,
    pub rows: Vec<McpRow>,
    pub filterable: Vec<String>,
    pub ignored_filters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpToggle {
    pub id: String,
    pub on: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PopupToggleResponse {
    pub toggled: Vec<McpToggle>,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpDelivery {
    /// `written`, `cancelled` or `stale`.
    pub kind: String,
    pub field: String,
    pub value: Option<String>,
    pub cause: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PopupCloseResponse {
    pub handle: String,
    pub state: String,
    pub deliveries: Vec<McpDelivery>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RolesListResponse {
    pub roles: Vec<String>,
}
