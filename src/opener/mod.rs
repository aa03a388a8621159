// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The parent-page side of the selector.
//!
//! [`OpenerBinding`] reads a field's current value when a popup opens and writes the popup's
//! Apply value back, but only while that popup's [`SessionHandle`] is still the active one for
//! the field. Reopening a field invalidates the earlier handle so a late Apply from the old
//! popup cannot land.

use std::collections::BTreeMap;

use crate::config::ClassHelpProps;
use crate::model::{parse_field_value, ClassName, FieldBinding, FieldName, SelectionMode, SerializedValue};
use crate::popup::PopupController;
use crate::query::Page;

pub mod channel;
pub mod form;
pub mod handle;

pub use channel::{Inbox, Outbox, PopupMessage};
pub use form::{FormFields, ParentForm};
pub use handle::{SessionHandle, SessionHandleError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub field: FieldName,
    pub class: ClassName,
    pub mode: SelectionMode,
    /// Page shown once candidates load.
    pub page: Page,
}

impl OpenRequest {
    pub fn new(field: FieldName, class: ClassName, mode: SelectionMode) -> Self {
        Self { field, class, mode, page: Page::default() }
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    /// Carries the link's `@startwith`/`@pagesize` over as the first page.
    pub fn from_props(props: &ClassHelpProps) -> Self {
        Self::new(props.property.clone(), props.class_name.clone(), props.mode).with_page(props.page)
    }
}

/// What happened to one popup message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Written { field: FieldName, value: SerializedValue },
    Cancelled { field: FieldName, cause: Option<String> },
    Stale { handle: SessionHandle },
}

#[derive(Debug)]
pub struct OpenerBinding<F: FormFields = ParentForm> {
    form: F,
    active: BTreeMap<FieldName, SessionHandle>,
    next_serial: u64,
    outbox: Outbox,
    inbox: Inbox,
}

impl<F: FormFields> OpenerBinding<F> {
    pub fn new(form: F) -> Self {
        let (outbox, inbox) = channel::channel();
        Self { form, active: BTreeMap::new(), next_serial: 1, outbox, inbox }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Edits made here are what the next popup hydrates from.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn into_form(self) -> F {
        self.form
    }

    pub fn active_handle(&self, field: &FieldName) -> Option<&SessionHandle> {
        self.active.get(field)
    }

    pub fn is_active(&self, handle: &SessionHandle) -> bool {
        self.active.get(handle.field()) == Some(handle)
    }

    /// Starts a popup session for `request.field`, superseding any session already open on it.
    ///
    /// The returned popup is in `Loading`; call [`PopupController::open`] to fetch candidates.
    pub fn open_popup(&mut self, request: OpenRequest) -> PopupController {
        let current = self.form.value(&request.field).unwrap_or_default();
        let initial = parse_field_value(current);

        let handle = SessionHandle::new(request.field.clone(), self.next_serial);
        self.next_serial += 1;
        if let Some(previous) = self.active.insert(request.field.clone(), handle.clone()) {
            tracing::debug!(previous = %previous, next = %handle, "superseding popup session");
        }
        tracing::debug!(handle = %handle, class = %request.class, initial = current, "open popup");

        let page = request.page;
        let binding = FieldBinding::new(request.field, request.class, request.mode, initial);
        PopupController::new(handle, binding, self.outbox.clone()).with_page(page)
    }

    /// Writes `value` verbatim into the handle's field if the handle is still active.
    pub fn on_applied(&mut self, handle: &SessionHandle, value: SerializedValue) -> Delivery {
        if !self.is_active(handle) {
            tracing::debug!(handle = %handle, "ignoring apply from stale popup");
            return Delivery::Stale { handle: handle.clone() };
        }
        self.active.remove(handle.field());
        self.form.set_value(handle.field(), value.as_str().to_owned());
        tracing::debug!(handle = %handle, value = %value, "field written");
        Delivery::Written { field: handle.field().clone(), value }
    }

    /// Ends the handle's session; the field keeps its value.
    pub fn on_cancelled(&mut self, handle: &SessionHandle, cause: Option<String>) -> Delivery {
        if !self.is_active(handle) {
            tracing::debug!(handle = %handle, "ignoring cancel from stale popup");
            return Delivery::Stale { handle: handle.clone() };
        }
        self.active.remove(handle.field());
        Delivery::Cancelled { field: handle.field().clone(), cause }
    }

    /// Dispatches every message already sent by popups.
    pub fn pump(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        while let Some(message) = self.inbox.try_recv() {
            deliveries.push(self.dispatch(message));
        }
        deliveries
    }

    /// Waits for the next popup message, for popups running on another task.
    pub async fn next_delivery(&mut self) -> Option<Delivery> {
        let message = self.inbox.recv().await?;
        Some(self.dispatch(message))
    }

    fn dispatch(&mut self, message: PopupMessage) -> Delivery {
        match message {
            PopupMessage::Applied { handle, value } => self.on_applied(&handle, value),
            PopupMessage::Cancelled { handle, cause } => self.on_cancelled(&handle, cause),
        }
    }
}

impl Default for OpenerBinding<ParentForm> {
    fn default() -> Self {
        Self::new(ParentForm::default())
    }
}

#[cfg(test)]
mod tests;
