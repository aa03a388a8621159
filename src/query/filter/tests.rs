// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use rstest::{fixture, rstest};

use super::{filter_candidates, FilterOp, Query, TextMatch};
use crate::model::{CandidateSet, Entity, EntityId};

fn eid(value: &str) -> EntityId {
    EntityId::new(value).expect("entity id")
}

fn ids(set: &CandidateSet) -> Vec<&str> {
    set.ids().map(EntityId::as_str).collect()
}

struct Issues {
    candidates: CandidateSet,
    filterable: BTreeSet<String>,
}

#[fixture]
fn issues() -> Issues {
    // Deliberately not sorted by label or id.
    let candidates = CandidateSet::new(vec![
        Entity::new(eid("7"), "Crash on login")
            .with_attribute("status", "open")
            .with_attribute("title", "Crash on login"),
        Entity::new(eid("2"), "Bug fix for search")
            .with_attribute("status", "resolved")
            .with_attribute("title", "Bug fix for search"),
        Entity::new(eid("11"), "login page typo")
            .with_attribute("status", "open")
            .with_attribute("title", "login page typo"),
        Entity::new(eid("3"), "Add CSV export").with_attribute("title", "Add CSV export"),
    ]);
    let filterable = ["status", "title"].into_iter().map(str::to_owned).collect();
    Issues { candidates, filterable }
}

#[rstest]
fn empty_query_returns_full_set_in_source_order(issues: Issues) {
    let outcome = filter_candidates(&issues.candidates, &Query::new(), &issues.filterable);
    assert_eq!(outcome.rows, issues.candidates);
    assert!(outcome.ignored.is_empty());
}

#[rstest]
fn text_term_matches_label_case_insensitively(issues: Issues) {
    let query = Query::new().with_text("LOGIN");
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["7", "11"]);
}

#[rstest]
fn blank_text_term_is_no_term(issues: Issues) {
    let query = Query::new().with_text("   ");
    assert!(query.is_empty());
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(outcome.rows.len(), 4);
}

#[rstest]
fn criteria_are_conjunctive(issues: Issues) {
    let query = Query::new().with_text("login").with_filter("status", "open", FilterOp::Exact);
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["7", "11"]);

    let query = query.with_filter("title", "TYPO", FilterOp::Contains);
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["11"]);
}

#[rstest]
fn exact_filter_is_case_sensitive(issues: Issues) {
    let query = Query::new().with_filter("status", "Open", FilterOp::Exact);
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert!(outcome.rows.is_empty());
}

#[rstest]
fn entities_missing_a_filtered_attribute_do_not_match(issues: Issues) {
    let query = Query::new().with_filter("status", "", FilterOp::Contains);
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["7", "2", "11"]);
}

#[rstest]
fn unknown_attributes_are_ignored_and_reported(issues: Issues) {
    let query = Query::new()
        .with_filter("phone", "555", FilterOp::Contains)
        .with_filter("status", "resolved", FilterOp::Exact);
    let outcome = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["2"]);
    assert_eq!(outcome.ignored, vec!["phone".to_owned()]);
}

#[rstest]
fn id_pseudo_attribute_is_always_recognized(issues: Issues) {
    let query = Query::new().with_filter("id", "11", FilterOp::Exact);
    let outcome = filter_candidates(&issues.candidates, &query, &BTreeSet::new());
    assert_eq!(ids(&outcome.rows), vec!["11"]);
    assert!(outcome.ignored.is_empty());
}

#[rstest]
fn filtering_is_deterministic(issues: Issues) {
    let query = Query::new().with_text("o");
    let first = filter_candidates(&issues.candidates, &query, &issues.filterable);
    let second = filter_candidates(&issues.candidates, &query, &issues.filterable);
    assert_eq!(first, second);
}

#[rstest]
fn search_then_reset_restores_full_set(issues: Issues) {
    let searched =
        filter_candidates(&issues.candidates, &Query::new().with_text("csv"), &issues.filterable);
    assert_eq!(ids(&searched.rows), vec!["3"]);

    let reset = filter_candidates(&issues.candidates, &Query::new(), &issues.filterable);
    assert_eq!(reset.rows, issues.candidates);
}

#[rstest]
fn fuzzy_mode_accepts_subsequences_without_reordering(issues: Issues) {
    let substring = Query::new().with_text("bgfx");
    let outcome = filter_candidates(&issues.candidates, &substring, &issues.filterable);
    assert!(outcome.rows.is_empty());

    let fuzzy = Query::new().with_text("bgfx").with_text_match(TextMatch::Fuzzy);
    let outcome = filter_candidates(&issues.candidates, &fuzzy, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["2"]);

    let fuzzy = Query::new().with_text("lgn").with_text_match(TextMatch::Fuzzy);
    let outcome = filter_candidates(&issues.candidates, &fuzzy, &issues.filterable);
    assert_eq!(ids(&outcome.rows), vec!["7", "11"]);
}

#[test]
fn from_form_skips_blank_entries_and_reads_text_key() {
    let query = Query::from_form([
        ("username", "de"),
        ("phone", ""),
        ("roles", "   "),
        ("text", " Demo "),
    ]);

    assert_eq!(query.text(), Some("Demo"));
    assert_eq!(query.filters().len(), 1);
    assert_eq!(query.filters()[0].attribute(), "username");
    assert_eq!(query.filters()[0].value(), "de");
    assert_eq!(query.filters()[0].op(), FilterOp::Contains);
}

#[test]
fn from_form_with_only_blank_entries_is_the_reset_query() {
    let query = Query::from_form([("username", ""), ("phone", " ")]);
    assert!(query.is_empty());
    assert_eq!(query, Query::new());
}
