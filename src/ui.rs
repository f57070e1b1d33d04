use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, AppState};
use crate::session::Session;

const HORIZONTAL_MARGIN: u16 = 5;
const INPUT_WIDTH: u16 = 40;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let playful = session.is_case_insensitive();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let accent = if playful { Color::Yellow } else { Color::Cyan };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Min(0),    // top padding
                Constraint::Length(1), // title
                Constraint::Length(1), // padding
                Constraint::Length(1), // pack selector
                Constraint::Length(1), // padding
                Constraint::Length(1), // prompt
                Constraint::Length(1), // hint
                Constraint::Length(3), // input box
                Constraint::Length(1), // feedback
                Constraint::Min(0),    // bottom padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let title = if playful {
            "🌟 Kindergarten Fun 🌟"
        } else {
            "Vocabulary Game"
        };
        Paragraph::new(Span::styled(title, bold_style.fg(accent)))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        pack_selector(session).render(chunks[3], buf);

        if self.state == AppState::Loading {
            Paragraph::new(Span::styled("Loading word packs...", italic_style))
                .alignment(Alignment::Center)
                .render(chunks[5], buf);
        } else if let Some(word) = session.current_word() {
            let prompt = Line::from(vec![
                Span::raw("Type the word: "),
                Span::styled(word.to_string(), bold_style.fg(accent)),
            ]);
            Paragraph::new(prompt)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[5], buf);

            if let Some(hint) = session.hint() {
                Paragraph::new(hint.to_string())
                    .alignment(Alignment::Center)
                    .render(chunks[6], buf);
            }

            let input_area = centered(chunks[7], INPUT_WIDTH);
            input_box(session, playful, input_area.width.saturating_sub(2) as usize)
                .render(input_area, buf);
        }

        let feedback = session.feedback();
        if !feedback.is_none() {
            let color = if feedback.is_success() {
                Color::Green
            } else if feedback.is_failure() {
                Color::Red
            } else {
                accent
            };
            Paragraph::new(Span::styled(feedback.to_string(), bold_style.fg(color)))
                .alignment(Alignment::Center)
                .render(chunks[8], buf);
        }

        Paragraph::new(Span::styled(legend(session), italic_style.patch(dim_style)))
            .alignment(Alignment::Center)
            .render(chunks[10], buf);
    }
}

fn pack_selector(session: &Session) -> Paragraph<'static> {
    let line = match session.selected_pack() {
        Some(pack) => {
            let total = pack.words.len();
            let left = session.remaining_words().len();
            Line::from(vec![
                Span::raw("< "),
                Span::styled(
                    pack.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" >"),
                Span::styled(
                    format!("  {left}/{total} left"),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ])
        }
        None => Line::from(Span::styled(
            "Select a word pack",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    Paragraph::new(line).alignment(Alignment::Center)
}

fn input_box(session: &Session, playful: bool, inner_width: usize) -> Paragraph<'static> {
    let border = if playful { Color::Yellow } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let cursor = Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED));
    let content = if session.input().is_empty() {
        let placeholder = if playful {
            "Type here... 🎯"
        } else {
            "Type here"
        };
        Line::from(vec![
            cursor,
            Span::styled(placeholder, Style::default().add_modifier(Modifier::DIM)),
        ])
    } else {
        let visible = tail_fitting(session.input(), inner_width.saturating_sub(1));
        Line::from(vec![Span::raw(visible.to_string()), cursor])
    };

    Paragraph::new(content).block(block)
}

fn legend(session: &Session) -> String {
    let mut parts = vec!["(enter) submit"];
    if session.packs().len() > 1 {
        parts.push("(tab) next pack");
    }
    if session.selected_pack().is_some_and(|p| p.has_hints()) {
        parts.push("(f1) hint");
    }
    parts.push("(esc)ape");
    parts.join(" / ")
}

/// Longest suffix of `text` whose display width fits in `width` columns
fn tail_fitting(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
