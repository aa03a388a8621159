// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{Delivery, FormFields, OpenRequest, OpenerBinding, ParentForm};
use crate::config::ClassHelpProps;
use crate::model::{ClassName, EntityId, FieldName, SelectionMode, SerializedValue};
use crate::popup::{Closure, PopupState};
use crate::query::Page;
use crate::source::{demo_source, CandidateSource, MemorySource};

fn field(name: &str) -> FieldName {
    FieldName::new(name).unwrap()
}

fn id(raw: &str) -> EntityId {
    EntityId::new(raw).unwrap()
}

fn keyword_request() -> OpenRequest {
    OpenRequest::new(field("keyword"), ClassName::new("keyword").unwrap(), SelectionMode::Multi)
}

fn keyword_value(opener: &OpenerBinding) -> &str {
    opener.form().value(&field("keyword")).unwrap()
}

#[fixture]
fn opener() -> OpenerBinding {
    OpenerBinding::new(
        ParentForm::new()
            .with_field(field("keyword"), "1,2")
            .with_field(field("assignedto"), "3"),
    )
}

#[rstest]
fn apply_replaces_the_field_value(mut opener: OpenerBinding) {
    let source = demo_source();
    let mut popup = opener.open_popup(keyword_request());
    popup.open(&source).unwrap();
    assert_eq!(popup.preview().as_str(), "1,2");

    popup.toggle_row(&id("1")).unwrap();
    popup.toggle_row(&id("5")).unwrap();
    popup.apply().unwrap();

    let deliveries = opener.pump();
    assert_eq!(
        deliveries,
        vec![Delivery::Written {
            field: field("keyword"),
            value: SerializedValue::from_ids(&[id("2"), id("5")]),
        }]
    );
    assert_eq!(keyword_value(&opener), "2,5");
    assert_eq!(opener.active_handle(&field("keyword")), None);
}

#[rstest]
fn stale_apply_does_not_touch_the_field(mut opener: OpenerBinding) {
    let source = demo_source();
    let mut first = opener.open_popup(keyword_request());
    first.open(&source).unwrap();
    let mut second = opener.open_popup(keyword_request());
    second.open(&source).unwrap();
    assert!(!opener.is_active(first.handle()));
    assert!(opener.is_active(second.handle()));

    first.toggle_row(&id("7")).unwrap();
    first.apply().unwrap();
    let deliveries = opener.pump();
    assert_eq!(deliveries, vec![Delivery::Stale { handle: first.handle().clone() }]);
    assert_eq!(keyword_value(&opener), "1,2");

    second.toggle_row(&id("3")).unwrap();
    second.apply().unwrap();
    opener.pump();
    assert_eq!(keyword_value(&opener), "1,2,3");
}

#[rstest]
fn stale_cancel_keeps_the_newer_session_active(mut opener: OpenerBinding) {
    let first = opener.open_popup(keyword_request());
    let second = opener.open_popup(keyword_request());
    let stale = first.handle().clone();
    drop(first);

    assert_eq!(opener.pump(), vec![Delivery::Stale { handle: stale }]);
    assert!(opener.is_active(second.handle()));
}

#[rstest]
#[case::before_fetch(false)]
#[case::after_toggles(true)]
fn cancel_leaves_the_field_byte_identical(mut opener: OpenerBinding, #[case] opened: bool) {
    let before = opener.form().clone();
    let mut popup = opener.open_popup(keyword_request());
    if opened {
        popup.open(&demo_source()).unwrap();
        popup.toggle_row(&id("1")).unwrap();
        popup.toggle_row(&id("8")).unwrap();
    }

    popup.cancel().unwrap();

    assert_eq!(
        opener.pump(),
        vec![Delivery::Cancelled { field: field("keyword"), cause: None }]
    );
    assert_eq!(opener.form(), &before);
    assert_eq!(opener.active_handle(&field("keyword")), None);
}

#[rstest]
fn fetch_failure_is_delivered_as_cancel_with_cause(mut opener: OpenerBinding) {
    let before = opener.form().clone();
    let mut popup = opener.open_popup(keyword_request());

    assert!(popup.open(&MemorySource::new()).is_err());
    assert_eq!(popup.state(), PopupState::Closed(Closure::Failed));

    let deliveries = opener.pump();
    assert!(matches!(
        deliveries.as_slice(),
        [Delivery::Cancelled { cause: Some(cause), .. }] if cause.contains("unknown class")
    ));
    assert_eq!(opener.form(), &before);
}

#[rstest]
fn out_of_band_edits_feed_the_next_popup(mut opener: OpenerBinding) {
    opener.form_mut().set_value(&field("keyword"), " 4, ,4,6 ".to_owned());

    let mut popup = opener.open_popup(keyword_request());
    popup.open(&demo_source()).unwrap();
    assert_eq!(popup.preview().as_str(), "4,6");
    popup.apply().unwrap();
    opener.pump();

    assert_eq!(keyword_value(&opener), "4,6");
}

#[rstest]
fn empty_selection_writes_an_empty_string(mut opener: OpenerBinding) {
    let mut popup = opener.open_popup(keyword_request());
    popup.open(&demo_source()).unwrap();
    popup.toggle_row(&id("1")).unwrap();
    popup.toggle_row(&id("2")).unwrap();
    popup.apply().unwrap();
    opener.pump();

    assert_eq!(keyword_value(&opener), "");
}

#[rstest]
fn sessions_on_different_fields_are_independent(mut opener: OpenerBinding) {
    let source = demo_source();
    let mut keywords = opener.open_popup(keyword_request());
    let mut users = opener.open_popup(OpenRequest::new(
        field("assignedto"),
        ClassName::new("user").unwrap(),
        SelectionMode::Single,
    ));
    keywords.open(&source).unwrap();
    users.open(&source).unwrap();

    users.toggle_row(&id("4")).unwrap();
    users.apply().unwrap();
    keywords.cancel().unwrap();

    let deliveries = opener.pump();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(opener.form().value(&field("assignedto")), Some("4"));
    assert_eq!(keyword_value(&opener), "1,2");
}

#[test]
fn missing_field_opens_with_empty_selection() {
    let mut opener = OpenerBinding::default();
    let mut popup = opener.open_popup(keyword_request());
    popup.open(&demo_source()).unwrap();
    assert!(popup.selection().is_empty());

    popup.toggle_row(&id("3")).unwrap();
    popup.apply().unwrap();
    opener.pump();
    assert_eq!(opener.form().value(&field("keyword")), Some("3"));
}

#[test]
fn request_from_help_url() {
    let props = ClassHelpProps::parse(
        "user?type=radio&property=assignedto&@startwith=0&@pagesize=50",
        400,
        300,
    )
    .unwrap();
    let request = OpenRequest::from_props(&props);
    assert_eq!(request.field.as_str(), "assignedto");
    assert_eq!(request.class.as_str(), "user");
    assert_eq!(request.mode, SelectionMode::Single);
    assert!(demo_source().fetch_candidates(&request.class).is_ok());
}

#[test]
fn help_link_paging_sets_the_first_page() {
    let props = ClassHelpProps::parse(
        "keyword?type=checkbox&property=keyword&@startwith=1&@pagesize=2",
        400,
        300,
    )
    .unwrap();
    let request = OpenRequest::from_props(&props);
    assert_eq!(request.page, Page::new(2, 2));

    let mut opener = OpenerBinding::default();
    let mut popup = opener.open_popup(request);
    popup.open(&demo_source()).unwrap();

    let view = popup.page_view();
    assert_eq!((view.index, view.size), (2, 2));
    let ids = popup.rows().iter().map(|row| row.entity.id().to_string()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["3", "4"]);
}

#[tokio::test]
async fn apply_from_another_task_is_delivered_in_order() {
    let mut opener = OpenerBinding::new(ParentForm::new().with_field(field("keyword"), ""));
    let popup = opener.open_popup(keyword_request());

    let task = tokio::spawn(async move {
        let mut popup = popup;
        popup.open(&demo_source()).unwrap();
        for raw in ["3", "1", "2"] {
            popup.toggle_row(&id(raw)).unwrap();
        }
        popup.toggle_row(&id("1")).unwrap();
        popup.apply().unwrap()
    });

    let applied = task.await.unwrap();
    let delivery = opener.next_delivery().await.unwrap();
    assert_eq!(delivery, Delivery::Written { field: field("keyword"), value: applied });
    assert_eq!(keyword_value(&opener), "3,2");
    assert!(opener.pump().is_empty());
}
