// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parsing of the tracker's classhelp link.
//!
//! A field's help link carries everything the selector needs, e.g.
//! `keyword?type=checkbox&property=keyword&form=itemSynopsis&@startwith=0&@pagesize=50&properties=id,name&@sort=name`.
//!
//! Column (`properties`) and ordering (`@sort`) hints are accepted but not used: rows keep the data
//! source's order and the popup always shows id and label.

use std::fmt;

use crate::model::{ClassName, FieldName, IdError, SelectionMode};
use crate::query::Page;

const CHECKBOX: &str = "checkbox";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHelpProps {
    pub width: u32,
    pub height: u32,
    pub class_name: ClassName,
    pub mode: SelectionMode,
    pub form_name: Option<String>,
    pub property: FieldName,
    /// `@startwith` (0-based) and `@pagesize` as the popup's first page.
    pub page: Page,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpUrlError {
    MissingQuery,
    InvalidClass(IdError),
    MissingParam { name: &'static str },
    InvalidNumber { name: &'static str, value: String },
    InvalidProperty(IdError),
    ZeroDimension { name: &'static str },
}

impl fmt::Display for HelpUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingQuery => f.write_str("help url must look like '<class>?<params>'"),
            Self::InvalidClass(err) => write!(f, "invalid class in help url: {err}"),
            Self::MissingParam { name } => write!(f, "help url is missing '{name}'"),
            Self::InvalidNumber { name, value } => {
                write!(f, "'{name}' in help url must be a number, got {value:?}")
            }
            Self::InvalidProperty(err) => write!(f, "invalid property in help url: {err}"),
            Self::ZeroDimension { name } => write!(f, "popup {name} must be positive"),
        }
    }
}

impl std::error::Error for HelpUrlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidClass(err) | Self::InvalidProperty(err) => Some(err),
            _ => None,
        }
    }
}

impl ClassHelpProps {
    pub fn parse(help_url: &str, width: u32, height: u32) -> Result<Self, HelpUrlError> {
        if width == 0 {
            return Err(HelpUrlError::ZeroDimension { name: "width" });
        }
        if height == 0 {
            return Err(HelpUrlError::ZeroDimension { name: "height" });
        }

        let (class_part, query) = help_url.split_once('?').ok_or(HelpUrlError::MissingQuery)?;
        if query.contains('?') {
            return Err(HelpUrlError::MissingQuery);
        }
        let class_name = ClassName::new(class_part).map_err(HelpUrlError::InvalidClass)?;

        let mut selection_type = None;
        let mut form_name = None;
        let mut property = None;
        let mut start_with = None;
        let mut page_size = None;

        // First occurrence wins, like URLSearchParams::get.
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "type" => {
                    selection_type.get_or_insert(value.into_owned());
                }
                "form" => {
                    form_name.get_or_insert(value.into_owned());
                }
                "property" => {
                    property.get_or_insert(value.into_owned());
                }
                "@startwith" => {
                    start_with.get_or_insert(value.into_owned());
                }
                "@pagesize" => {
                    page_size.get_or_insert(value.into_owned());
                }
                _ => {}
            }
        }

        let start_with = parse_number("@startwith", start_with)?;
        let page_size = parse_number("@pagesize", page_size)?;
        let property = property.ok_or(HelpUrlError::MissingParam { name: "property" })?;
        let property = FieldName::new(property).map_err(HelpUrlError::InvalidProperty)?;
        let mode = SelectionMode::from_multi(selection_type.as_deref() == Some(CHECKBOX));

        Ok(Self {
            width,
            height,
            class_name,
            mode,
            form_name,
            property,
            page: Page::new(start_with.saturating_add(1), page_size),
        })
    }
}

fn parse_number(name: &'static str, raw: Option<String>) -> Result<usize, HelpUrlError> {
    let raw = raw.ok_or(HelpUrlError::MissingParam { name })?;
    raw.trim().parse::<usize>().map_err(|_| HelpUrlError::InvalidNumber { name, value: raw })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ClassHelpProps, HelpUrlError};
    use crate::model::SelectionMode;

    const KEYWORD_URL: &str = "keyword?type=checkbox&property=keyword&form=itemSynopsis\
                               &@startwith=0&@pagesize=50&properties=id,name&@sort=name";

    #[test]
    fn parses_checkbox_link() {
        let props = ClassHelpProps::parse(KEYWORD_URL, 600, 400).unwrap();

        assert_eq!(props.class_name.as_str(), "keyword");
        assert_eq!(props.mode, SelectionMode::Multi);
        assert_eq!(props.property.as_str(), "keyword");
        assert_eq!(props.form_name.as_deref(), Some("itemSynopsis"));
        assert_eq!(props.page.index(), 1);
        assert_eq!(props.page.size(), 50);
        assert_eq!((props.width, props.height), (600, 400));
    }

    #[test]
    fn non_checkbox_type_is_single_select() {
        let props =
            ClassHelpProps::parse("user?type=radio&property=assignedto&@startwith=2&@pagesize=10", 1, 1)
                .unwrap();
        assert_eq!(props.mode, SelectionMode::Single);
        assert_eq!(props.page.index(), 3);
        assert_eq!(props.form_name, None);
    }

    #[test]
    fn percent_encoded_values_are_decoded() {
        let props = ClassHelpProps::parse(
            "user?property=nosy&form=item%20Synopsis&@startwith=0&@pagesize=5&properties=id%2Cusername",
            1,
            1,
        )
        .unwrap();
        assert_eq!(props.form_name.as_deref(), Some("item Synopsis"));
        assert_eq!(props.page.size(), 5);
    }

    #[rstest]
    #[case("keyword", HelpUrlError::MissingQuery)]
    #[case("keyword?a=1?b=2", HelpUrlError::MissingQuery)]
    #[case("keyword?property=k&@pagesize=50", HelpUrlError::MissingParam { name: "@startwith" })]
    #[case(
        "keyword?property=k&@startwith=x&@pagesize=50",
        HelpUrlError::InvalidNumber { name: "@startwith", value: "x".to_owned() }
    )]
    #[case("keyword?property=k&@startwith=0", HelpUrlError::MissingParam { name: "@pagesize" })]
    #[case("keyword?@startwith=0&@pagesize=50", HelpUrlError::MissingParam { name: "property" })]
    fn malformed_links_are_rejected(#[case] url: &str, #[case] expected: HelpUrlError) {
        assert_eq!(ClassHelpProps::parse(url, 10, 10).unwrap_err(), expected);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            ClassHelpProps::parse(KEYWORD_URL, 0, 10).unwrap_err(),
            HelpUrlError::ZeroDimension { name: "width" }
        );
        assert_eq!(
            ClassHelpProps::parse(KEYWORD_URL, 10, 0).unwrap_err(),
            HelpUrlError::ZeroDimension { name: "height" }
        );
    }
}
