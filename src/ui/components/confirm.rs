use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::components::{Button, ButtonRow, ButtonRowEvent, ButtonStyle};
use crate::ui::{Component, DialogContent, FocusContext, FocusId, Handled, Result};

pub enum ConfirmEvent {
    Confirmed,
    Cancelled,
}

/// Confirmation prompt hosted inside a [`crate::ui::Dialog`]: a message and a
/// Confirm/Cancel button pair. The configured dialog keys (`y`/`n` by
/// default) short-circuit the buttons.
pub struct ConfirmContent {
    message: String,
    buttons: ButtonRow,
    resolver: Arc<KeyResolver>,
}

impl ConfirmContent {
    pub fn new(message: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        let buttons = ButtonRow::new(vec![
            Button::new("Confirm").style(ButtonStyle::Primary),
            Button::new("Cancel"),
        ]);
        Self {
            message: message.into(),
            buttons,
            resolver,
        }
    }
}

impl DialogContent for ConfirmContent {
    type Msg = ConfirmEvent;

    fn focusables(&self) -> Vec<FocusId> {
        self.buttons.ids()
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        if self.resolver.matches_dialog(&key, DialogAction::Confirm) {
            return Ok(ConfirmEvent::Confirmed.into());
        }
        if self.resolver.matches_dialog(&key, DialogAction::Cancel) {
            return Ok(ConfirmEvent::Cancelled.into());
        }
        Ok(self.buttons.handle_key(key, focus)?.map(|event| {
            let ButtonRowEvent::Pressed(index) = event;
            if index == 0 {
                ConfirmEvent::Confirmed
            } else {
                ConfirmEvent::Cancelled
            }
        }))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let message = Paragraph::new(Line::styled(
            self.message.clone(),
            Style::default().fg(theme.text),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(message, rows[0]);

        let hint = Paragraph::new(Line::styled(
            format!(
                "{} confirm · {} cancel",
                self.resolver.display_dialog(DialogAction::Confirm),
                self.resolver.display_dialog(DialogAction::Cancel),
            ),
            Style::default().fg(theme.text_muted()),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(hint, rows[1]);

        self.buttons.render(frame, rows[2], theme, focus);
    }

    fn content_height(&self) -> u16 {
        5
    }
}
