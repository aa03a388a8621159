// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

pub mod help_url;
pub mod labels;

pub use help_url::{ClassHelpProps, HelpUrlError};
pub use labels::{Labels, LabelsError};
