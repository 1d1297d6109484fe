use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;

/// Bottom bar: key hints (or a transient notice) on the left, credit balance
/// on the right.
pub struct StatusBar;

impl StatusBar {
    /// `hints` are `(key, action)` pairs; a `notice` replaces them until it
    /// expires; `balance` is `None` when no account is signed in.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        hints: &[(String, &str)],
        notice: Option<&str>,
        balance: Option<u32>,
    ) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.mantle));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(24)])
            .split(inner);

        if let Some(notice) = notice {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    notice.to_string(),
                    Style::default()
                        .fg(theme.success())
                        .add_modifier(Modifier::BOLD),
                )),
                columns[0],
            );
        } else {
            let mut spans = Vec::new();
            for (i, (key, action)) in hints.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw("  "));
                }
                spans.push(Span::styled(
                    format!("[{key}]"),
                    Style::default()
                        .fg(theme.peach)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(" "));
                spans.push(Span::styled(*action, Style::default().fg(theme.subtext0)));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), columns[0]);
        }

        let balance_line = balance.map_or_else(
            || Line::styled("no account", Style::default().fg(theme.text_muted())),
            |credits| {
                Line::from(vec![
                    Span::styled("credits ", Style::default().fg(theme.subtext0)),
                    Span::styled(
                        credits.to_string(),
                        Style::default()
                            .fg(theme.yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            },
        );
        frame.render_widget(
            Paragraph::new(balance_line).right_aligned(),
            columns[1],
        );
    }
}
