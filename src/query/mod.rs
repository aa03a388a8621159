// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over candidate sets.
//!
//! Filtering and pagination are pure functions of (dataset, query); they never touch the
//! selection.

pub mod filter;
pub mod page;

pub use filter::{
    filter_candidates, AttributeFilter, FilterOp, FilterOutcome, Query, TextMatch, ID_ATTRIBUTE,
    TEXT_KEY,
};
pub use page::{paginate, Page, PageView, DEFAULT_PAGE_SIZE};
