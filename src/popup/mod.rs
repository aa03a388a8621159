// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The selector popup.
//!
//! A [`PopupController`] owns one session's candidate set, search state and [`Selection`]. Its
//! only effect outside itself is the single [`PopupMessage`] it sends to the opener when it
//! closes.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{CandidateSet, Entity, EntityId, FieldBinding, Selection, SerializedValue, Toggle};
use crate::opener::{Outbox, PopupMessage, SessionHandle};
use crate::query::{filter_candidates, paginate, Page, PageView, Query};
use crate::source::{CandidateSource, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    Applied,
    Cancelled,
    Failed,
}

impl Closure {
    /// Cancelled and failed sessions both leave the parent field alone.
    pub fn is_cancelled(self) -> bool {
        !matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Loading,
    Ready,
    Searching,
    Applying,
    Closed(Closure),
}

impl PopupState {
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

impl fmt::Display for PopupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Searching => f.write_str("searching"),
            Self::Applying => f.write_str("applying"),
            Self::Closed(Closure::Applied) => f.write_str("closed (applied)"),
            Self::Closed(Closure::Cancelled) => f.write_str("closed (cancelled)"),
            Self::Closed(Closure::Failed) => f.write_str("closed (failed)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOp {
    Open,
    Search,
    Toggle,
    Page,
    Apply,
    Cancel,
}

impl fmt::Display for PopupOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Search => "search",
            Self::Toggle => "toggle",
            Self::Page => "page",
            Self::Apply => "apply",
            Self::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum PopupError {
    Fetch(FetchError),
    InvalidTransition { op: PopupOp, state: PopupState },
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "failed to load candidates: {err}"),
            Self::InvalidTransition { op, state } => {
                write!(f, "cannot {op} while the popup is {state}")
            }
        }
    }
}

impl std::error::Error for PopupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::InvalidTransition { .. } => None,
        }
    }
}

/// One rendered table row. `checked` is derived from the selection at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub entity: &'a Entity,
    pub checked: bool,
}

#[derive(Debug)]
pub struct PopupController {
    handle: SessionHandle,
    binding: FieldBinding,
    outbox: Option<Outbox>,
    state: PopupState,
    fetched: bool,
    selection: Selection,
    dataset: CandidateSet,
    filterable: BTreeSet<String>,
    visible: CandidateSet,
    query: Query,
    ignored: Vec<String>,
    page: Page,
    failure: Option<String>,
}

impl PopupController {
    /// A popup in `Loading`, waiting for [`PopupController::open`].
    pub fn new(handle: SessionHandle, binding: FieldBinding, outbox: Outbox) -> Self {
        let selection = Selection::new(binding.mode());
        Self {
            handle,
            binding,
            outbox: Some(outbox),
            state: PopupState::Loading,
            fetched: false,
            selection,
            dataset: CandidateSet::default(),
            filterable: BTreeSet::new(),
            visible: CandidateSet::default(),
            query: Query::new(),
            ignored: Vec::new(),
            page: Page::default(),
            failure: None,
        }
    }

    /// Starts on `page`; indexes past the loaded rows clamp when read.
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Filter attributes the last search dropped as unknown for this entity kind.
    pub fn ignored_filters(&self) -> &[String] {
        &self.ignored
    }

    pub fn filterable(&self) -> &BTreeSet<String> {
        &self.filterable
    }

    /// Why the session failed to load, once it is `Closed(Failed)`.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Fetches the candidate set once and hydrates the selection from the field's value.
    pub fn open(&mut self, source: &dyn CandidateSource) -> Result<(), PopupError> {
        if self.fetched || self.state != PopupState::Loading {
            return Err(self.invalid(PopupOp::Open));
        }
        self.fetched = true;

        match source.fetch_candidates(self.binding.class_name()) {
            Ok(catalog) => {
                let (candidates, filterable) = catalog.into_parts();
                self.selection.hydrate(self.binding.initial_value().iter().cloned());
                self.visible = candidates.clone();
                self.dataset = candidates;
                self.filterable = filterable;
                self.transition(PopupState::Ready);
                tracing::debug!(
                    handle = %self.handle,
                    rows = self.dataset.len(),
                    selected = self.selection.len(),
                    "popup ready"
                );
                Ok(())
            }
            Err(err) => {
                let cause = err.to_string();
                tracing::warn!(handle = %self.handle, error = %cause, "candidate fetch failed");
                self.failure = Some(cause.clone());
                self.close(Closure::Failed, PopupMessage::Cancelled {
                    handle: self.handle.clone(),
                    cause: Some(cause),
                });
                Err(PopupError::Fetch(err))
            }
        }
    }

    /// Replaces the visible rows with `query`'s matches over the full candidate set.
    ///
    /// The selection is untouched and pagination goes back to the first page.
    pub fn search(&mut self, query: Query) -> Result<(), PopupError> {
        if self.state != PopupState::Ready {
            return Err(self.invalid(PopupOp::Search));
        }
        self.transition(PopupState::Searching);

        let outcome = filter_candidates(&self.dataset, &query, &self.filterable);
        tracing::debug!(
            handle = %self.handle,
            matched = outcome.rows.len(),
            ignored = outcome.ignored.len(),
            "search"
        );
        self.visible = outcome.rows;
        self.ignored = outcome.ignored;
        self.query = query;
        self.page = self.page.first();

        self.transition(PopupState::Ready);
        Ok(())
    }

    /// Searches with the empty query.
    pub fn reset(&mut self) -> Result<(), PopupError> {
        self.search(Query::new())
    }

    /// Legal for ids outside the visible rows; selection outlives filtering.
    pub fn toggle_row(&mut self, id: &EntityId) -> Result<Toggle, PopupError> {
        if self.state != PopupState::Ready {
            return Err(self.invalid(PopupOp::Toggle));
        }
        let toggle = self.selection.toggle(id);
        tracing::trace!(handle = %self.handle, id = %id, ?toggle, "toggle");
        Ok(toggle)
    }

    /// The value Apply would write right now.
    pub fn preview(&self) -> SerializedValue {
        self.selection.serialize()
    }

    pub fn visible(&self) -> &CandidateSet {
        &self.visible
    }

    pub fn page_view(&self) -> PageView<'_> {
        paginate(self.visible.as_slice(), self.page)
    }

    /// The current page of visible rows with their checked state.
    pub fn rows(&self) -> Vec<Row<'_>> {
        self.page_view()
            .rows
            .iter()
            .map(|entity| Row { entity, checked: self.selection.contains(entity.id()) })
            .collect()
    }

    pub fn next_page(&mut self) -> Result<usize, PopupError> {
        let next = self.page_view().index.saturating_add(1);
        self.set_page(next)
    }

    pub fn prev_page(&mut self) -> Result<usize, PopupError> {
        let prev = self.page_view().index.saturating_sub(1);
        self.set_page(prev)
    }

    /// Moves to the 1-based page `index`, clamped to the available pages. Returns the page landed on.
    pub fn set_page(&mut self, index: usize) -> Result<usize, PopupError> {
        if self.state != PopupState::Ready {
            return Err(self.invalid(PopupOp::Page));
        }
        let requested = Page::new(index, self.page.size());
        let clamped = paginate(self.visible.as_slice(), requested).index;
        self.page = Page::new(clamped, self.page.size());
        Ok(clamped)
    }

    /// Sends the serialized selection to the opener and closes the popup.
    pub fn apply(&mut self) -> Result<SerializedValue, PopupError> {
        if self.state != PopupState::Ready {
            return Err(self.invalid(PopupOp::Apply));
        }
        let value = self.selection.serialize();
        self.transition(PopupState::Applying);
        tracing::debug!(handle = %self.handle, value = %value, "apply");
        self.close(Closure::Applied, PopupMessage::Applied {
            handle: self.handle.clone(),
            value: value.clone(),
        });
        Ok(value)
    }

    /// Closes the popup without touching the parent field.
    pub fn cancel(&mut self) -> Result<(), PopupError> {
        if self.state.is_closed() {
            return Err(self.invalid(PopupOp::Cancel));
        }
        tracing::debug!(handle = %self.handle, "cancel");
        self.close(Closure::Cancelled, PopupMessage::Cancelled {
            handle: self.handle.clone(),
            cause: None,
        });
        Ok(())
    }

    fn invalid(&self, op: PopupOp) -> PopupError {
        PopupError::InvalidTransition { op, state: self.state }
    }

    fn transition(&mut self, next: PopupState) {
        tracing::trace!(handle = %self.handle, from = %self.state, to = %next, "popup transition");
        self.state = next;
    }

    /// Emits the closing message once, then drops the candidate sets.
    fn close(&mut self, closure: Closure, message: PopupMessage) {
        self.transition(PopupState::Closed(closure));
        if let Some(outbox) = self.outbox.take() {
            outbox.send(message);
        }
        self.release();
    }

    fn release(&mut self) {
        self.dataset = CandidateSet::default();
        self.visible = CandidateSet::default();
        self.filterable.clear();
        self.page = self.page.first();
    }
}

impl Drop for PopupController {
    /// A popup discarded without Apply or Cancel counts as cancelled.
    fn drop(&mut self) {
        if let Some(outbox) = self.outbox.take() {
            tracing::debug!(handle = %self.handle, state = %self.state, "popup dropped while open");
            outbox.send(PopupMessage::Cancelled { handle: self.handle.clone(), cause: None });
        }
    }
}

#[cfg(test)]
mod tests;
