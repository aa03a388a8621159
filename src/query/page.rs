// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Entity;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: usize,
    size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { index: 1, size: DEFAULT_PAGE_SIZE }
    }
}

impl Page {
    /// Zero values are bumped to 1.
    pub fn new(index: usize, size: usize) -> Self {
        Self { index: index.max(1), size: size.max(1) }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn size(self) -> usize {
        self.size
    }

    pub fn first(self) -> Self {
        Self { index: 1, ..self }
    }

    pub fn next(self) -> Self {
        Self { index: self.index.saturating_add(1), ..self }
    }

    pub fn prev(self) -> Self {
        Self { index: self.index.saturating_sub(1).max(1), ..self }
    }
}

/// One page worth of rows plus the navigation state shown in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView<'a> {
    pub rows: &'a [Entity],
    pub index: usize,
    pub size: usize,
    pub total: usize,
}

impl PageView<'_> {
    pub fn has_prev(&self) -> bool {
        self.index > 1
    }

    pub fn has_next(&self) -> bool {
        self.index.saturating_mul(self.size) < self.total
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.size).max(1)
    }

    /// `"51..100"` for the second page of 50, matching the tracker's pagination bar.
    pub fn range_label(&self) -> String {
        let start = 1 + (self.index - 1) * self.size;
        let end = self.index * self.size;
        format!("{start}..{end}")
    }
}

/// Slices `rows` to the requested page. Indexes past the end clamp to the last page.
pub fn paginate(rows: &[Entity], page: Page) -> PageView<'_> {
    let total = rows.len();
    let page_count = total.div_ceil(page.size()).max(1);
    let index = page.index().min(page_count);
    let start = (index - 1) * page.size();
    let end = (start + page.size()).min(total);
    PageView { rows: &rows[start.min(total)..end], index, size: page.size(), total }
}
