// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! The MCP layer lets an agent drive the same form and popups a person drives in the TUI: open a
//! field's selector, search, toggle rows and apply or cancel.

mod server;
mod types;

pub use server::ClasshelpMcp;
