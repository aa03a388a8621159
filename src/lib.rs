// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Classhelp — a multi-select "class help" popup for tracker forms (core + TUI + MCP).
//!
//! The core is [`popup::PopupController`] and [`opener::OpenerBinding`]: a popup hydrates its
//! selection from a form field, lets the user search and toggle candidates, and hands exactly one
//! Apply or Cancel back to the opener, which writes the field only if the popup's session is still
//! the active one.

pub mod config;
pub mod mcp;
pub mod model;
pub mod opener;
pub mod popup;
pub mod query;
pub mod source;
pub mod tui;
