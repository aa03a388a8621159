// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Title, footer, and popup section helpers used by TUI rendering.

fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn mode_suffix(mode: SelectionMode) -> &'static str {
    if mode.is_multi() {
        ", multi"
    } else {
        ""
    }
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

/// One line per search input plus the Search/Reset buttons, and the text cursor position while
/// an input is being edited.
fn search_form_lines(
    search: &SearchForm,
    labels: &Labels,
    area: Rect,
) -> (Vec<Line<'static>>, Option<(u16, u16)>) {
    let key_width = search.entries.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    let mut cursor = None;
    let mut lines = Vec::with_capacity(search.entries.len() + 1);

    for (idx, (key, value)) in search.entries.iter().enumerate() {
        let focused = idx == search.focus;
        let key_style = if focused && search.editing {
            Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(FOOTER_LABEL_COLOR)
        };
        let label = format!("{key:>key_width$}: ");
        if focused && search.editing {
            let x = area
                .x
                .saturating_add(label.chars().count() as u16)
                .saturating_add(value.chars().count() as u16)
                .min(area.x.saturating_add(area.width.saturating_sub(1)));
            cursor = Some((x, area.y.saturating_add(idx as u16)));
        }
        lines.push(Line::from(vec![Span::styled(label, key_style), Span::raw(value.clone())]));
    }

    let mut buttons = Vec::new();
    push_button(&mut buttons, &labels.search, "Enter", true);
    push_button(&mut buttons, &labels.reset, "r", true);
    lines.push(Line::from(buttons));

    (lines, cursor)
}

fn pagination_line(popup: &PopupView, labels: &Labels) -> Line<'static> {
    let view = popup.controller.page_view();
    let mut spans = Vec::new();
    push_button(&mut spans, &format!("< {}", labels.prev), "[", view.has_prev());
    spans.push(Span::styled(
        format!(" {} ", view.range_label()),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    push_button(&mut spans, &format!("{} >", labels.next), "]", view.has_next());
    spans.push(Span::styled(
        format!("  page {}/{} · {} rows", view.index, view.page_count(), view.total),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    Line::from(spans)
}

fn preview_line(popup: &PopupView, labels: &Labels) -> Line<'static> {
    let preview = popup.controller.preview();
    let mut spans = vec![
        Span::styled("Preview: ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled(preview.into_string(), Style::default().fg(CHECKED_COLOR)),
        Span::raw("   "),
    ];
    push_button(&mut spans, &labels.cancel, "Esc", true);
    push_button(&mut spans, &labels.apply, "a", popup.controller.state() == PopupState::Ready);
    Line::from(spans)
}

fn push_button(spans: &mut Vec<Span<'static>>, caption: &str, key: &str, enabled: bool) {
    if !spans.is_empty() {
        spans.push(Span::raw(" "));
    }
    let color = if enabled { Color::White } else { DISABLED_COLOR };
    spans.push(Span::styled(format!("[{caption}]"), Style::default().fg(color)));
    spans.push(Span::styled(format!("({key})"), Style::default().fg(FOOTER_KEY_COLOR)));
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match app.popup.as_ref() {
        None => {
            push_footer_entry(&mut spans, "MOVE", "j/k");
            push_footer_entry(&mut spans, "OPEN", "Enter");
            push_footer_entry(&mut spans, "QUIT", "q");
        }
        Some(popup) if popup.search.editing => {
            push_footer_entry(&mut spans, "NEXT FIELD", "Tab");
            push_footer_entry(&mut spans, "SEARCH", "Enter");
            push_footer_entry(&mut spans, "DONE", "Esc");
        }
        Some(_) => {
            push_footer_entry(&mut spans, "MOVE", "j/k");
            push_footer_entry(&mut spans, "TOGGLE", "Space");
            push_footer_entry(&mut spans, "EDIT", "/");
            push_footer_entry(&mut spans, "PAGE", "[]");
            push_footer_entry(&mut spans, "RESET", "r");
            push_footer_entry(&mut spans, "APPLY", "a");
            push_footer_entry(&mut spans, "CANCEL", "Esc");
        }
    }

    let toast_message = toast_suffix.strip_prefix(" | ").unwrap_or(toast_suffix).trim();
    if !toast_message.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::raw(toast_message.to_owned()));
    }

    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(FOOTER_BRAND.to_owned(), Style::default().fg(FOOTER_BRAND_COLOR))])
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
