use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::{Component, FocusContext, FocusId, Handled, Result};

#[derive(Debug, Default, Clone, Copy)]
pub enum ButtonStyle {
    #[default]
    Normal,
    Primary,
    /// Red styling for destructive actions.
    Danger,
}

/// A single focusable action button.
pub struct Button {
    id: FocusId,
    label: String,
    style: ButtonStyle,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: FocusId::next(),
            label: label.into(),
            style: ButtonStyle::Normal,
        }
    }

    #[must_use]
    pub const fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn id(&self) -> FocusId {
        self.id
    }

    fn accent(&self, theme: &Theme) -> ratatui::style::Color {
        match self.style {
            ButtonStyle::Normal => theme.overlay1,
            ButtonStyle::Primary => theme.primary(),
            ButtonStyle::Danger => theme.error(),
        }
    }
}

pub enum ButtonRowEvent {
    /// The button at this index was activated.
    Pressed(usize),
}

/// Horizontally laid-out row of buttons.
///
/// Enter or Space activates the focused button; Left/Right move focus within
/// the row. Tab order across the whole dialog is the host's job.
pub struct ButtonRow {
    buttons: Vec<Button>,
}

impl ButtonRow {
    pub const fn new(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }

    pub fn ids(&self) -> Vec<FocusId> {
        self.buttons.iter().map(Button::id).collect()
    }

    fn focused_index(&self, focus: &FocusContext) -> Option<usize> {
        self.buttons.iter().position(|b| focus.is_focused(b.id))
    }
}

impl Component for ButtonRow {
    type Output = ButtonRowEvent;

    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Output>> {
        let Some(index) = self.focused_index(focus) else {
            return Ok(Handled::Ignored);
        };
        Ok(match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => ButtonRowEvent::Pressed(index).into(),
            KeyCode::Right if index + 1 < self.buttons.len() => {
                focus.focus(self.buttons[index + 1].id);
                Handled::Consumed
            }
            KeyCode::Left if index > 0 => {
                focus.focus(self.buttons[index - 1].id);
                Handled::Consumed
            }
            _ => Handled::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext) {
        let mut spans = Vec::new();
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            let accent = button.accent(theme);
            let style = if focus.is_focused(button.id) {
                Style::default()
                    .fg(theme.base)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(format!("[ {} ]", button.label), style));
        }

        let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn row_with_focus() -> (ButtonRow, FocusContext) {
        let row = ButtonRow::new(vec![Button::new("Yes"), Button::new("No")]);
        let mut focus = FocusContext::new();
        for id in row.ids() {
            focus.attach(id);
        }
        (row, focus)
    }

    #[test]
    fn enter_presses_the_focused_button() {
        let (mut row, mut focus) = row_with_focus();
        focus.focus(row.ids()[1]);

        let handled = row.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Event(ButtonRowEvent::Pressed(1))));
    }

    #[test]
    fn ignores_keys_when_unfocused() {
        let (mut row, mut focus) = row_with_focus();
        let handled = row.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(!handled.is_consumed());
    }

    #[test]
    fn arrows_move_within_the_row() {
        let (mut row, mut focus) = row_with_focus();
        let ids = row.ids();
        focus.focus(ids[0]);

        row.handle_key(key(KeyCode::Right), &mut focus).unwrap();
        assert!(focus.is_focused(ids[1]));

        // At the edge the key is ignored rather than wrapped; wrapping is the
        // dialog's Tab behavior.
        let handled = row.handle_key(key(KeyCode::Right), &mut focus).unwrap();
        assert!(!handled.is_consumed());

        row.handle_key(key(KeyCode::Left), &mut focus).unwrap();
        assert!(focus.is_focused(ids[0]));
    }
}
