// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;

use crate::model::{ClassName, EntityId, FieldName, SelectionMode, Toggle};
use crate::opener::{Delivery, FormFields, OpenRequest, OpenerBinding, ParentForm, SessionHandle};
use crate::popup::{PopupController, PopupError};
use crate::query::{FilterOp, Page, Query, TextMatch};
use crate::source::{CandidateSource, FetchError, ROLE_CLASS};

use super::types::*;

#[derive(Debug)]
struct McpState {
    opener: OpenerBinding,
    /// Open popups keyed by their handle's display form.
    popups: BTreeMap<String, PopupController>,
    fields: Vec<OpenRequest>,
}

impl McpState {
    fn popup_mut(&mut self, handle: &SessionHandle) -> Result<&mut PopupController, ErrorData> {
        self.popups.get_mut(&handle.to_string()).ok_or_else(|| {
            ErrorData::resource_not_found(
                "no open popup with this handle",
                Some(serde_json::json!({ "handle": handle.to_string() })),
            )
        })
    }
}

#[derive(Clone)]
pub struct ClasshelpMcp {
    state: Arc<Mutex<McpState>>,
    source: Arc<dyn CandidateSource>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ClasshelpMcp {
    /// A server over `form`, where `fields` names the bound fields and their entity kinds.
    pub fn new(source: Arc<dyn CandidateSource>, form: ParentForm, fields: Vec<OpenRequest>) -> Self {
        Self {
            state: Arc::new(Mutex::new(McpState {
                opener: OpenerBinding::new(form),
                popups: BTreeMap::new(),
                fields,
            })),
            source,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Read every parent form field with its bound entity kind and active popup handle; start
    /// here, then call `popup.open` on a field.
    #[tool(name = "form.read")]
    async fn form_read(&self) -> Result<Json<FormReadResponse>, ErrorData> {
        let mut state = self.state.lock().await;
        state.opener.pump();
        let state = &*state;
        let fields = state
            .opener
            .form()
            .fields()
            .map(|(field, value)| field_summary(state, field, value))
            .collect();

        Ok(Json(FormReadResponse { fields }))
    }

    /// Overwrite a form field directly; the next `popup.open` on it hydrates from this value.
    #[tool(name = "form.set")]
    async fn form_set(
        &self,
        params: Parameters<FormSetParams>,
    ) -> Result<Json<FormSetResponse>, ErrorData> {
        let FormSetParams { field, value } = params.0;
        let field = parse_field(&field)?;

        let mut state = self.state.lock().await;
        state.opener.form_mut().set_value(&field, value.clone());
        tracing::debug!(field = %field, value = %value, "form field set over mcp");

        Ok(Json(FormSetResponse { field: field_summary(&state, &field, &value) }))
    }

    /// Open a selector popup for a field, hydrated from its current value; supersedes any popup
    /// already open on the same field and closes it. Returns the popup handle and the first page of rows.
    #[tool(name = "popup.open")]
    async fn popup_open(
        &self,
        params: Parameters<PopupOpenParams>,
    ) -> Result<Json<PopupSnapshot>, ErrorData> {
        let PopupOpenParams { field, class, multi, page_size } = params.0;
        let field = parse_field(&field)?;

        let mut state = self.state.lock().await;
        let bound = state.fields.iter().find(|request| request.field == field).cloned();
        let class = match (class, bound.as_ref()) {
            (Some(class), _) => parse_class(&class)?,
            (None, Some(request)) => request.class.clone(),
            (None, None) => {
                return Err(ErrorData::invalid_params(
                    "field is not bound to a class; pass `class`",
                    Some(serde_json::json!({ "field": field.as_str() })),
                ));
            }
        };
        let mode = match (multi, bound.as_ref()) {
            (Some(multi), _) => SelectionMode::from_multi(multi),
            (None, Some(request)) => request.mode,
            (None, None) => SelectionMode::Multi,
        };

        let mut request = OpenRequest::new(field, class, mode);
        if let Some(size) = page_size {
            if size == 0 {
                return Err(ErrorData::invalid_params("page_size must be positive", None));
            }
            request = request.with_page(Page::new(1, usize::try_from(size).unwrap_or(usize::MAX)));
        }

        // `open_popup` supersedes the field's session; every parameter is checked above.
        let previous = state.opener.active_handle(&request.field).map(ToString::to_string);
        let mut popup = state.opener.open_popup(request);
        if let Some(previous) = previous {
            // Dropping the superseded popup closes it; the opener reports it as stale.
            state.popups.remove(&previous);
        }

        if let Err(err) = popup.open(self.source.as_ref()) {
            drop(popup);
            state.opener.pump();
            return Err(popup_error(err));
        }
        state.opener.pump();

        let snapshot = popup_snapshot(&popup);
        state.popups.insert(snapshot.handle.clone(), popup);
        Ok(Json(snapshot))
    }

    /// Read an open popup: state, preview value, current page rows with checked state.
    #[tool(name = "popup.read")]
    async fn popup_read(
        &self,
        params: Parameters<PopupHandleParams>,
    ) -> Result<Json<PopupSnapshot>, ErrorData> {
        let handle = parse_handle(&params.0.handle)?;
        let mut state = self.state.lock().await;
        let popup = state.popup_mut(&handle)?;
        Ok(Json(popup_snapshot(popup)))
    }

    /// Filter the popup's rows by free text and attribute filters; the selection is kept and the
    /// view returns to page 1. Unknown filter attributes are reported in `ignored_filters`.
    #[tool(name = "popup.search")]
    async fn popup_search(
        &self,
        params: Parameters<PopupSearchParams>,
    ) -> Result<Json<PopupSnapshot>, ErrorData> {
        let PopupSearchParams { handle, text, filters, fuzzy } = params.0;
        let handle = parse_handle(&handle)?;
        let query = build_query(text, filters.unwrap_or_default(), fuzzy.unwrap_or(false));

        let mut state = self.state.lock().await;
        let popup = state.popup_mut(&handle)?;
        popup.search(query).map_err(popup_error)?;
        Ok(Json(popup_snapshot(popup)))
    }

    /// Clear the popup's search and show every candidate again; the selection is kept.
    #[tool(name = "popup.reset")]
    async fn popup_reset(
        &self,
        params: Parameters<PopupHandleParams>,
    ) -> Result<Json<PopupSnapshot>, ErrorData> {
        let handle = parse_handle(&params.0.handle)?;
        let mut state = self.state.lock().await;
        let popup = state.popup_mut(&handle)?;
        popup.reset().map_err(popup_error)?;
        Ok(Json(popup_snapshot(popup)))
    }

    /// Toggle ids in order (ids need not be on the visible page); returns each toggle and the
    /// resulting preview value.
    #[tool(name = "popup.toggle")]
    async fn popup_toggle(
        &self,
        params: Parameters<PopupToggleParams>,
    ) -> Result<Json<PopupToggleResponse>, ErrorData> {
        let PopupToggleParams { handle, ids } = params.0;
        let handle = parse_handle(&handle)?;
        let ids = ids.iter().map(|raw| parse_entity_id(raw)).collect::<Result<Vec<_>, _>>()?;

        let mut state = self.state.lock().await;
        let popup = state.popup_mut(&handle)?;
        let mut toggled = Vec::with_capacity(ids.len());
        for id in ids {
            let toggle = popup.toggle_row(&id).map_err(popup_error)?;
            toggled.push(McpToggle { id: id.into_string(), on: toggle == Toggle::On });
        }

        Ok(Json(PopupToggleResponse { toggled, preview: popup.preview().into_string() }))
    }

    /// Move the popup to a 1-based page; out-of-range pages clamp to the first or last page.
    #[tool(name = "popup.page")]
    async fn popup_page(
        &self,
        params: Parameters<PopupPageParams>,
    ) -> Result<Json<PopupSnapshot>, ErrorData> {
        let PopupPageParams { handle, page } = params.0;
        let handle = parse_handle(&handle)?;

        let mut state = self.state.lock().await;
        let popup = state.popup_mut(&handle)?;
        popup.set_page(usize::try_from(page).unwrap_or(usize::MAX)).map_err(popup_error)?;
        Ok(Json(popup_snapshot(popup)))
    }

    /// Apply the popup's selection to its field and close it. A popup superseded by a newer
    /// `popup.open` on the same field reports a `stale` delivery and leaves the field alone.
    #[tool(name = "popup.apply")]
    async fn popup_apply(
        &self,
        params: Parameters<PopupHandleParams>,
    ) -> Result<Json<PopupCloseResponse>, ErrorData> {
        let handle = parse_handle(&params.0.handle)?;
        let mut state = self.state.lock().await;
        state.popup_mut(&handle)?.apply().map_err(popup_error)?;
        self.close_popup(&mut state, &handle)
    }

    /// Close the popup without touching its field.
    #[tool(name = "popup.cancel")]
    async fn popup_cancel(
        &self,
        params: Parameters<PopupHandleParams>,
    ) -> Result<Json<PopupCloseResponse>, ErrorData> {
        let handle = parse_handle(&params.0.handle)?;
        let mut state = self.state.lock().await;
        state.popup_mut(&handle)?.cancel().map_err(popup_error)?;
        self.close_popup(&mut state, &handle)
    }

    /// List the role names known to the data source (the `role` entity kind).
    #[tool(name = "roles.list")]
    async fn roles_list(&self) -> Result<Json<RolesListResponse>, ErrorData> {
        let class = parse_class(ROLE_CLASS)?;
        let roles = match self.source.fetch_candidates(&class) {
            Ok(catalog) => {
                catalog.candidates().iter().map(|role| role.label().to_owned()).collect()
            }
            Err(FetchError::UnknownClass { .. }) => Vec::new(),
            Err(err) => {
                return Err(ErrorData::internal_error(format!("failed to load roles: {err}"), None));
            }
        };
        Ok(Json(RolesListResponse { roles }))
    }

    fn close_popup(
        &self,
        state: &mut McpState,
        handle: &SessionHandle,
    ) -> Result<Json<PopupCloseResponse>, ErrorData> {
        let popup = state.popups.remove(&handle.to_string());
        let closed = popup.as_ref().map(|popup| popup.state().to_string()).unwrap_or_default();
        drop(popup);
        let deliveries = state.opener.pump().into_iter().map(delivery_summary).collect();

        Ok(Json(PopupCloseResponse { handle: handle.to_string(), state: closed, deliveries }))
    }
}

#[tool_handler]
impl ServerHandler for ClasshelpMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Classhelp selector server (tools: form.read, form.set, popup.open, popup.read, popup.search, popup.reset, popup.toggle, popup.page, popup.apply, popup.cancel, roles.list)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Extracted mapping/parsing helpers for MCP tool handlers.
include!("server/helpers.rs");
