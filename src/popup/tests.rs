// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicUsize, Ordering};

use rstest::{fixture, rstest};

use super::{Closure, PopupController, PopupError, PopupOp, PopupState};
use crate::model::{
    CandidateSet, ClassName, Entity, EntityId, FieldBinding, FieldName, SelectionMode, Toggle,
};
use crate::opener::channel::{self, Inbox};
use crate::opener::{PopupMessage, SessionHandle};
use crate::query::{FilterOp, Page, Query};
use crate::source::{Catalog, CandidateSource, FetchError, MemorySource};

fn id(raw: &str) -> EntityId {
    EntityId::new(raw).unwrap()
}

fn keywords() -> Catalog {
    let candidates = [("k1", "urgent"), ("k2", "regression"), ("k3", "docs"), ("k4", "security")]
        .into_iter()
        .map(|(raw, name)| Entity::new(id(raw), name).with_attribute("name", name))
        .collect::<CandidateSet>();
    Catalog::new(candidates, ["name".to_owned()].into_iter().collect())
}

struct CountingSource {
    inner: MemorySource,
    calls: AtomicUsize,
}

impl CandidateSource for CountingSource {
    fn fetch_candidates(&self, class_name: &ClassName) -> Result<Catalog, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_candidates(class_name)
    }
}

struct FailingSource;

impl CandidateSource for FailingSource {
    fn fetch_candidates(&self, _class_name: &ClassName) -> Result<Catalog, FetchError> {
        Err(FetchError::Unavailable { reason: "tracker offline".to_owned() })
    }
}

#[fixture]
fn source() -> CountingSource {
    CountingSource {
        inner: MemorySource::new().with_catalog(ClassName::new("keyword").unwrap(), keywords()),
        calls: AtomicUsize::new(0),
    }
}

fn popup(mode: SelectionMode, initial: &[&str]) -> (PopupController, Inbox) {
    let field = FieldName::new("keyword").unwrap();
    let binding = FieldBinding::new(
        field.clone(),
        ClassName::new("keyword").unwrap(),
        mode,
        initial.iter().map(|raw| id(raw)).collect(),
    );
    let (outbox, inbox) = channel::channel();
    (PopupController::new(SessionHandle::new(field, 1), binding, outbox), inbox)
}

fn drain(inbox: &mut Inbox) -> Vec<PopupMessage> {
    std::iter::from_fn(|| inbox.try_recv()).collect()
}

fn checked_ids(popup: &PopupController) -> Vec<&str> {
    popup.rows().into_iter().filter(|row| row.checked).map(|row| row.entity.id().as_str()).collect()
}

#[rstest]
fn open_fetches_once_and_hydrates(source: CountingSource) {
    let (mut popup, _inbox) = popup(SelectionMode::Multi, &["k1", "k2"]);
    assert_eq!(popup.state(), PopupState::Loading);

    popup.open(&source).unwrap();

    assert_eq!(popup.state(), PopupState::Ready);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(popup.preview().as_str(), "k1,k2");
    assert_eq!(checked_ids(&popup), vec!["k1", "k2"]);

    let err = popup.open(&source).unwrap_err();
    assert!(matches!(
        err,
        PopupError::InvalidTransition { op: PopupOp::Open, state: PopupState::Ready }
    ));
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn scenario_a_through_the_popup(source: CountingSource) {
    let (mut popup, mut inbox) = popup(SelectionMode::Multi, &["k1", "k2"]);
    popup.open(&source).unwrap();

    assert_eq!(popup.toggle_row(&id("k3")).unwrap(), Toggle::On);
    assert_eq!(popup.preview().as_str(), "k1,k2,k3");
    assert_eq!(popup.toggle_row(&id("k2")).unwrap(), Toggle::Off);
    assert_eq!(popup.preview().as_str(), "k1,k3");

    assert_eq!(popup.apply().unwrap().as_str(), "k1,k3");
    assert_eq!(popup.state(), PopupState::Closed(Closure::Applied));

    let messages = drain(&mut inbox);
    assert_eq!(messages.len(), 1);
    assert!(matches!(
        &messages[0],
        PopupMessage::Applied { value, .. } if value.as_str() == "k1,k3"
    ));
}

#[rstest]
fn search_keeps_selection_and_reset_restores_rows(source: CountingSource) {
    let (mut popup, _inbox) = popup(SelectionMode::Multi, &[]);
    popup.open(&source).unwrap();
    popup.toggle_row(&id("k1")).unwrap();
    popup.toggle_row(&id("k3")).unwrap();

    popup.search(Query::new().with_text("DOC")).unwrap();
    let visible = popup.rows().iter().map(|row| row.entity.id().as_str()).collect::<Vec<_>>();
    assert_eq!(visible, vec!["k3"]);
    assert_eq!(checked_ids(&popup), vec!["k3"]);
    assert_eq!(popup.preview().as_str(), "k1,k3");

    // Selection is editable for rows that are filtered out.
    popup.toggle_row(&id("k4")).unwrap();
    assert_eq!(popup.preview().as_str(), "k1,k3,k4");

    popup.reset().unwrap();
    assert_eq!(popup.rows().len(), 4);
    assert_eq!(checked_ids(&popup), vec!["k1", "k3", "k4"]);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn unknown_filters_are_reported_not_fatal(source: CountingSource) {
    let (mut popup, _inbox) = popup(SelectionMode::Multi, &[]);
    popup.open(&source).unwrap();

    popup
        .search(Query::new().with_filter("phone", "555", FilterOp::Contains).with_text("urg"))
        .unwrap();

    assert_eq!(popup.ignored_filters(), ["phone".to_owned()]);
    assert_eq!(popup.rows().len(), 1);
}

#[rstest]
fn single_mode_replaces_previous_choice(source: CountingSource) {
    let (mut popup, _inbox) = popup(SelectionMode::Single, &["k1"]);
    popup.open(&source).unwrap();

    popup.toggle_row(&id("k2")).unwrap();
    assert_eq!(popup.preview().as_str(), "k2");
    assert_eq!(checked_ids(&popup), vec!["k2"]);
}

#[rstest]
fn pagination_clamps_and_search_returns_to_first_page(source: CountingSource) {
    let (popup, _inbox) = popup(SelectionMode::Multi, &[]);
    let mut popup = popup.with_page(Page::new(1, 3));
    popup.open(&source).unwrap();

    assert_eq!(popup.next_page().unwrap(), 2);
    assert_eq!(popup.rows().len(), 1);
    assert_eq!(popup.next_page().unwrap(), 2);
    assert_eq!(popup.set_page(99).unwrap(), 2);
    assert_eq!(popup.prev_page().unwrap(), 1);
    assert_eq!(popup.prev_page().unwrap(), 1);

    popup.set_page(2).unwrap();
    popup.search(Query::new()).unwrap();
    assert_eq!(popup.page_view().index, 1);
}

#[rstest]
fn starting_page_past_the_rows_clamps_to_the_last(source: CountingSource) {
    let (popup, _inbox) = popup(SelectionMode::Multi, &[]);
    let mut popup = popup.with_page(Page::new(5, 3));
    popup.open(&source).unwrap();

    let view = popup.page_view();
    assert_eq!((view.index, view.size), (2, 3));
    assert_eq!(popup.rows().len(), 1);
}

#[rstest]
#[case::loading(false)]
#[case::ready(true)]
fn cancel_emits_one_cancel(source: CountingSource, #[case] opened: bool) {
    let (mut popup, mut inbox) = popup(SelectionMode::Multi, &["k1"]);
    if opened {
        popup.open(&source).unwrap();
        popup.toggle_row(&id("k2")).unwrap();
    }

    popup.cancel().unwrap();

    assert_eq!(popup.state(), PopupState::Closed(Closure::Cancelled));
    assert!(popup.state().is_closed());
    assert!(matches!(popup.cancel(), Err(PopupError::InvalidTransition { op: PopupOp::Cancel, .. })));
    drop(popup);

    let messages = drain(&mut inbox);
    assert_eq!(messages.len(), 1);
    assert!(matches!(&messages[0], PopupMessage::Cancelled { cause: None, .. }));
}

#[rstest]
fn closed_popup_rejects_everything_and_releases_rows(source: CountingSource) {
    let (mut popup, mut inbox) = popup(SelectionMode::Multi, &[]);
    popup.open(&source).unwrap();
    popup.apply().unwrap();

    assert!(popup.rows().is_empty());
    assert!(popup.visible().is_empty());
    assert!(matches!(popup.toggle_row(&id("k1")), Err(PopupError::InvalidTransition { .. })));
    assert!(matches!(popup.search(Query::new()), Err(PopupError::InvalidTransition { .. })));
    assert!(matches!(popup.apply(), Err(PopupError::InvalidTransition { .. })));
    assert!(matches!(popup.set_page(1), Err(PopupError::InvalidTransition { .. })));
    drop(popup);

    assert_eq!(drain(&mut inbox).len(), 1);
}

#[test]
fn apply_is_rejected_while_loading() {
    let (mut popup, mut inbox) = popup(SelectionMode::Multi, &[]);
    let err = popup.apply().unwrap_err();
    assert!(matches!(
        err,
        PopupError::InvalidTransition { op: PopupOp::Apply, state: PopupState::Loading }
    ));
    assert_eq!(popup.state(), PopupState::Loading);
    assert!(drain(&mut inbox).is_empty());
}

#[test]
fn fetch_failure_closes_as_failed_with_cause() {
    let (mut popup, mut inbox) = popup(SelectionMode::Multi, &["k1"]);

    let err = popup.open(&FailingSource).unwrap_err();

    assert!(matches!(err, PopupError::Fetch(FetchError::Unavailable { .. })));
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(popup.state(), PopupState::Closed(Closure::Failed));
    assert!(Closure::Failed.is_cancelled());
    assert_eq!(popup.failure(), Some("data source unavailable: tracker offline"));

    let messages = drain(&mut inbox);
    assert_eq!(messages.len(), 1);
    assert!(matches!(
        &messages[0],
        PopupMessage::Cancelled { cause: Some(cause), .. } if cause.contains("tracker offline")
    ));
}

#[test]
fn unknown_class_is_a_fetch_failure() {
    let (mut popup, _inbox) = popup(SelectionMode::Multi, &[]);
    let err = popup.open(&MemorySource::new()).unwrap_err();
    assert!(matches!(err, PopupError::Fetch(FetchError::UnknownClass { .. })));
}

#[test]
fn dropping_an_open_popup_counts_as_cancel() {
    let (popup, mut inbox) = popup(SelectionMode::Multi, &[]);
    drop(popup);

    let messages = drain(&mut inbox);
    assert_eq!(messages.len(), 1);
    assert!(matches!(&messages[0], PopupMessage::Cancelled { .. }));
}
