use std::time::Instant;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use sparknomad_core::LoadingState;
use crate::app::{App, FocusPane, StartupCard, QUICK_PICKS};

/// Rows one card takes in the grid, borders included
const CARD_HEIGHT: u16 = 8;

/// Placeholder cards shown while the first batch is loading
const SKELETON_CARDS: usize = 6;

const INPUT_PLACEHOLDER: &str = "Enter your industry (e.g., Sustainable Fashion, AI Biotech)";

/// Grid columns for a given width, mirroring a 1/2/3 column responsive layout
pub fn columns_for_width(width: u16) -> usize {
    match width {
        w if w >= 108 => 3,
        w if w >= 72 => 2,
        _ => 1,
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, input, body, footer
    let [header_area, input_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_input(app, frame, input_area);
    render_body(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.show_api_key_input {
        render_api_key_input(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled("Spark", Style::default().fg(Color::White).bold()),
        Span::styled("Nomad", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("  v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let key_note = if app.client.has_api_key() {
        Span::raw("")
    } else {
        Span::styled("  no API key, press K", Style::default().fg(Color::Yellow))
    };

    let badge = Line::from(vec![
        Span::styled("● ", Style::default().fg(Color::Magenta)),
        Span::styled("Powered by Gemini AI", Style::default().fg(Color::Magenta).bold()),
        Span::styled(format!("  {}", app.client.model()), Style::default().fg(Color::DarkGray)),
        key_note,
    ]);

    let blurb = Line::from(Span::styled(
        "Transform your industry idea into a brilliant brand identity.",
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Text::from(vec![title, badge, blurb])).alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.focus == FocusPane::Input && !app.show_api_key_input;
    let border_color = if app.is_loading() {
        Color::DarkGray
    } else if editing {
        Color::Yellow
    } else {
        Color::Gray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Industry ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [text_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(18),
    ])
    .areas(inner);

    // Keep the cursor in view for long input
    let width = text_area.width.saturating_sub(1) as usize;
    let offset = app.industry_cursor.saturating_sub(width);

    let text = if app.industry.is_empty() {
        Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        let visible: String = app.industry.chars().skip(offset).collect();
        let style = if app.is_loading() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(visible, style)
    };
    frame.render_widget(Paragraph::new(Line::from(text)), text_area);

    let button = if app.is_loading() {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Span::styled(format!(" Generating{:<3} ", dots), Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(" Generate Names ", Style::default().bg(Color::Cyan).fg(Color::Black).bold())
    };
    frame.render_widget(
        Paragraph::new(Line::from(button)).alignment(Alignment::Right),
        button_area,
    );

    if editing && !app.is_loading() {
        let cursor_x = (app.industry_cursor - offset).min(width) as u16;
        frame.set_cursor_position((text_area.x + cursor_x, text_area.y));
    }
}

fn render_body(app: &mut App, frame: &mut Frame, area: Rect) {
    let mut area = area;

    if app.status == LoadingState::Error {
        let [banner_area, rest] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(area);
        render_error_banner(app, frame, banner_area);
        area = rest;
    }

    match app.status {
        LoadingState::Idle if app.results.is_empty() => render_start_screen(frame, area),
        LoadingState::Loading if app.results.is_empty() => render_skeleton(app, frame, area),
        LoadingState::Loading | LoadingState::Success => render_results(app, frame, area),
        _ => {}
    }
}

fn render_error_banner(app: &App, frame: &mut Frame, area: Rect) {
    let message = app.error.as_deref().unwrap_or_default();
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" ⚠ ", Style::default().fg(Color::Red).bold()),
        Span::styled(message, Style::default().fg(Color::Red)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

fn render_start_screen(frame: &mut Frame, area: Rect) {
    let mut tags: Vec<Span> = Vec::new();
    for (i, tag) in QUICK_PICKS.iter().enumerate() {
        tags.push(Span::styled(
            format!(" {} ", i + 1),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ));
        tags.push(Span::styled(format!(" {}  ", tag), Style::default().fg(Color::Cyan)));
    }

    let lines = vec![
        Line::default(),
        Line::default(),
        Line::from(Span::styled(
            "Type an industry above to get started",
            Style::default().fg(Color::Gray).bold(),
        )),
        Line::default(),
        Line::from(tags),
        Line::default(),
        Line::from(Span::styled(
            "Esc to leave the input, then 1-5 to pick a suggestion",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_skeleton(app: &App, frame: &mut Frame, area: Rect) {
    let cols = columns_for_width(area.width);
    let rows = SKELETON_CARDS.div_ceil(cols);

    // Pulse between two shades
    let shade = if app.animation_frame % 2 == 0 { Color::DarkGray } else { Color::Gray };

    for row in 0..rows {
        let y = area.y + (row as u16) * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        let row_area = Rect::new(area.x, y, area.width, CARD_HEIGHT);
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols]).split(row_area);

        for (col, cell) in cells.iter().enumerate() {
            if row * cols + col >= SKELETON_CARDS {
                break;
            }
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(shade));
            let inner = block.inner(*cell);
            frame.render_widget(block, *cell);

            let bars = vec![
                Line::from(Span::styled("░".repeat((inner.width as usize) / 2), Style::default().fg(shade))),
                Line::default(),
                Line::from(Span::styled("░".repeat(inner.width as usize), Style::default().fg(shade))),
                Line::from(Span::styled("░".repeat((inner.width as usize) * 2 / 3), Style::default().fg(shade))),
            ];
            frame.render_widget(Paragraph::new(bars), inner);
        }
    }
}

fn render_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let loading = app.is_loading();
    let show_regenerate = app.can_regenerate();

    let [status_area, grid_area, regenerate_area] = Layout::vertical([
        Constraint::Length(if loading { 1 } else { 0 }),
        Constraint::Min(0),
        Constraint::Length(if show_regenerate { 2 } else { 0 }),
    ])
    .areas(area);

    if loading {
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        let status = Paragraph::new(Span::styled(
            format!("Generating fresh names{}", dots),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(status, status_area);
    }

    let cols = columns_for_width(grid_area.width);
    app.cards_per_row = cols;

    let total_rows = app.results.len().div_ceil(cols);
    let visible_rows = ((grid_area.height / CARD_HEIGHT) as usize).max(1);

    // Lazy scrolling: only move when the selected row leaves the view
    let selected_row = app.selected_card / cols;
    if selected_row < app.results_row_offset {
        app.results_row_offset = selected_row;
    } else if selected_row >= app.results_row_offset + visible_rows {
        app.results_row_offset = selected_row + 1 - visible_rows;
    }

    let now = Instant::now();
    let show_selection = app.focus == FocusPane::Results;
    let last_row = total_rows.min(app.results_row_offset + visible_rows);

    for row in app.results_row_offset..last_row {
        let y = grid_area.y + ((row - app.results_row_offset) as u16) * CARD_HEIGHT;
        let height = CARD_HEIGHT.min((grid_area.y + grid_area.height).saturating_sub(y));
        if height < 3 {
            break;
        }
        let row_area = Rect::new(grid_area.x, y, grid_area.width, height);
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols]).split(row_area);

        for (col, cell) in cells.iter().enumerate() {
            let idx = row * cols + col;
            let Some(card) = app.results.get(idx) else {
                break;
            };
            let selected = show_selection && idx == app.selected_card;
            render_card(frame, *cell, card, selected, loading, now);
        }
    }

    if show_regenerate {
        let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let position = if total_rows > visible_rows {
            format!("   {}/{}", app.selected_card + 1, app.results.len())
        } else {
            String::new()
        };
        let prompt = Paragraph::new(vec![
            Line::default(),
            Line::from(vec![
                Span::styled("Don't like these? Try adjusting your description.  ", Style::default().fg(Color::DarkGray)),
                Span::styled(" r ", key_style),
                Span::styled(" Regenerate All ", Style::default().fg(Color::Cyan)),
                Span::styled(position, Style::default().fg(Color::DarkGray)),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(prompt, regenerate_area);
    }
}

/// Draw one result card: name, copy indicator, tagline, badges
fn render_card(frame: &mut Frame, area: Rect, card: &StartupCard, selected: bool, dimmed: bool, now: Instant) {
    let border_color = if selected { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [name_area, tagline_area, badge_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let name_style = if selected {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::White).bold()
    };
    frame.render_widget(Paragraph::new(Span::styled(card.item.name.as_str(), name_style)), name_area);

    let glyph = if card.is_copied(now) {
        Span::styled("✓ copied", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("⧉", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(glyph).alignment(Alignment::Right), name_area);

    let tagline = Paragraph::new(Span::styled(
        format!("\"{}\"", card.item.tagline),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .wrap(Wrap { trim: true });
    frame.render_widget(tagline, tagline_area);

    let badges = Line::from(vec![
        Span::styled(" AVAILABLE ", Style::default().bg(Color::Blue).fg(Color::White).bold()),
        Span::raw(" "),
        Span::styled(" .IO ", Style::default().bg(Color::DarkGray).fg(Color::Gray).bold()),
    ]);
    frame.render_widget(Paragraph::new(badges), badge_area);

    if dimmed {
        frame.buffer_mut().set_style(area, Style::default().add_modifier(Modifier::DIM));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = if app.is_loading() {
        (" LOADING ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        match app.focus {
            FocusPane::Input => (" INPUT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
            FocusPane::Results => (" RESULTS ", Style::default().bg(Color::Blue).fg(Color::White)),
        }
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];

    match app.focus {
        FocusPane::Input => {
            hints.extend(vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" generate ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" results ", label_style),
                Span::styled(" Ctrl-C ", key_style),
                Span::styled(" quit ", label_style),
            ]);
        }
        FocusPane::Results => {
            if app.show_quick_picks() {
                hints.extend(vec![
                    Span::styled(" 1-5 ", key_style),
                    Span::styled(" pick ", label_style),
                ]);
            }
            if app.results_visible() {
                hints.extend(vec![
                    Span::styled(" h/j/k/l ", key_style),
                    Span::styled(" nav ", label_style),
                    Span::styled(" c ", key_style),
                    Span::styled(" copy ", label_style),
                ]);
            }
            if app.can_regenerate() {
                hints.extend(vec![
                    Span::styled(" r ", key_style),
                    Span::styled(" regenerate ", label_style),
                ]);
            }
            hints.extend(vec![
                Span::styled(" i ", key_style),
                Span::styled(" edit ", label_style),
                Span::styled(" K ", key_style),
                Span::styled(" API key ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
        }
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_api_key_input(app: &App, frame: &mut Frame, area: Rect) {
    // Centered, shrunk to whatever the terminal has room for
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height);

    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height).intersection(area);
    if popup_area.is_empty() {
        return;
    }

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Enter Gemini API Key ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Row `offset` of the popup body, if the terminal is tall enough to show it
    let row = |offset: u16| {
        let y = inner.y + offset;
        (y < inner.bottom()).then(|| Rect::new(inner.x, y, inner.width, 1))
    };

    if let Some(line) = row(0) {
        let instructions = Paragraph::new("Paste your API key below. Press Enter to save, Esc to cancel.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(instructions, line);
    }

    if let Some(input_area) = row(2) {
        frame.render_widget(
            Paragraph::new(mask_key(&app.api_key_input)).style(Style::default().fg(Color::Cyan)),
            input_area,
        );

        if input_area.width > 0 {
            let cursor_x = app.api_key_input_cursor.min(input_area.width as usize - 1) as u16;
            frame.set_cursor_position((input_area.x + cursor_x, input_area.y));
        }
    }

    if let Some(line) = row(4) {
        let char_count = format!("{} characters", app.api_key_input.chars().count());
        frame.render_widget(
            Paragraph::new(char_count).style(Style::default().fg(Color::DarkGray)),
            line,
        );
    }
}

/// Mask a key with asterisks, showing only the last 4 chars
fn mask_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let masked_len = len - 4;
    let last_four: String = key.chars().skip(masked_len).collect();
    format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
}
