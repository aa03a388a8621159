// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// id parsing, popup/field mapping, and error translation.
fn parse_field(raw: &str) -> Result<FieldName, ErrorData> {
    FieldName::new(raw).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid field: {err}"),
            Some(serde_json::json!({ "field": raw })),
        )
    })
}

fn parse_class(raw: &str) -> Result<ClassName, ErrorData> {
    ClassName::new(raw).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid class: {err}"),
            Some(serde_json::json!({ "class": raw })),
        )
    })
}

fn parse_entity_id(raw: &str) -> Result<EntityId, ErrorData> {
    EntityId::new(raw).map_err(|err| {
        ErrorData::invalid_params(format!("invalid id: {err}"), Some(serde_json::json!({ "id": raw })))
    })
}

fn parse_handle(raw: &str) -> Result<SessionHandle, ErrorData> {
    raw.parse::<SessionHandle>().map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid handle: {err}"),
            Some(serde_json::json!({ "handle": raw })),
        )
    })
}

fn build_query(text: Option<String>, filters: Vec<McpFilter>, fuzzy: bool) -> Query {
    let mut query = Query::new();
    if let Some(text) = text {
        query = query.with_text(text);
    }
    if fuzzy {
        query = query.with_text_match(TextMatch::Fuzzy);
    }
    for McpFilter { attribute, value, exact } in filters {
        let op = if exact.unwrap_or(false) { FilterOp::Exact } else { FilterOp::Contains };
        query = query.with_filter(attribute, value, op);
    }
    query
}

fn popup_error(err: PopupError) -> ErrorData {
    match err {
        PopupError::Fetch(FetchError::UnknownClass { class_name }) => ErrorData::resource_not_found(
            format!("unknown class '{class_name}'"),
            Some(serde_json::json!({ "class": class_name.as_str() })),
        ),
        PopupError::Fetch(err) => {
            ErrorData::internal_error(format!("failed to load candidates: {err}"), None)
        }
        err @ PopupError::InvalidTransition { .. } => ErrorData::invalid_request(err.to_string(), None),
    }
}

fn field_summary(state: &McpState, field: &FieldName, value: &str) -> McpField {
    let bound = state.fields.iter().find(|request| &request.field == field);
    McpField {
        field: field.as_str().to_owned(),
        value: value.to_owned(),
        class: bound.map(|request| request.class.as_str().to_owned()),
        multi: bound.map(|request| request.mode.is_multi()),
        active_handle: state.opener.active_handle(field).map(ToString::to_string),
    }
}

fn popup_snapshot(popup: &PopupController) -> PopupSnapshot {
    let view = popup.page_view();
    let page = McpPage {
        index: view.index as u64,
        size: view.size as u64,
        total: view.total as u64,
        page_count: view.page_count() as u64,
        has_prev: view.has_prev(),
        has_next: view.has_next(),
        range: view.range_label(),
    };
    let rows = popup
        .rows()
        .into_iter()
        .map(|row| McpRow {
            id: row.entity.id().as_str().to_owned(),
            label: row.entity.label().to_owned(),
            checked: row.checked,
            attributes: row.entity.attributes().clone(),
        })
        .collect();
    let binding = popup.binding();

    PopupSnapshot {
        handle: popup.handle().to_string(),
        field: binding.field_name().as_str().to_owned(),
        class: binding.class_name().as_str().to_owned(),
        multi: binding.is_multi(),
        state: popup.state().to_string(),
        preview: popup.preview().into_string(),
        page,
        rows,
        filterable: popup.filterable().iter().cloned().collect(),
        ignored_filters: popup.ignored_filters().to_vec(),
    }
}

fn delivery_summary(delivery: Delivery) -> McpDelivery {
    match delivery {
        Delivery::Written { field, value } => McpDelivery {
            kind: "written".to_owned(),
            field: field.into_string(),
            value: Some(value.into_string()),
            cause: None,
        },
        Delivery::Cancelled { field, cause } => McpDelivery {
            kind: "cancelled".to_owned(),
            field: field.into_string(),
            value: None,
            cause,
        },
        Delivery::Stale { handle } => McpDelivery {
            kind: "stale".to_owned(),
            field: handle.field().as_str().to_owned(),
            value: None,
            cause: None,
        },
    }
}
