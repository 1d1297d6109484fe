use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::ui::{Component, FocusContext, FocusId, Handled, Result};

pub enum TextInputEvent {
    Submitted(String),
}

/// Single-line text input rendered inline (a one-row bordered field), for use
/// inside forms and dialog content. Only reacts to keys while focused.
pub struct TextInput {
    id: FocusId,
    label: String,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: FocusId::next(),
            label: label.into(),
            value: String::new(),
            cursor: 0,
            placeholder: None,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub const fn id(&self) -> FocusId {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn insert_char(&mut self, c: char) {
        self.value.insert(self.byte_cursor(), c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    /// Byte offset of the char-indexed cursor.
    fn byte_cursor(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Output>> {
        if !focus.is_focused(self.id) {
            return Ok(Handled::Ignored);
        }
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.clone()).into(),

            (KeyCode::Backspace, _) => {
                self.delete_char_before_cursor();
                Handled::Consumed
            }
            (KeyCode::Delete, _) => {
                self.delete_char_at_cursor();
                Handled::Consumed
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                Handled::Consumed
            }
            (KeyCode::Right, _) => {
                if self.cursor < self.value.chars().count() {
                    self.cursor += 1;
                }
                Handled::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                Handled::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.chars().count();
                Handled::Consumed
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear();
                Handled::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                Handled::Consumed
            }

            _ => Handled::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext) {
        let focused = focus.is_focused(self.id);
        let border = if focused {
            theme.border_focused()
        } else {
            theme.border()
        };

        let input_style = Style::default().fg(theme.text);
        let cursor_style = Style::default()
            .fg(theme.base)
            .bg(theme.text)
            .add_modifier(Modifier::BOLD);
        let placeholder_style = Style::default().fg(theme.text_muted());

        let chars: Vec<char> = self.value.chars().collect();
        let line = if chars.is_empty() && self.placeholder.is_some() {
            let placeholder = self.placeholder.clone().unwrap_or_default();
            if focused {
                Line::from(vec![
                    Span::styled(" ", cursor_style),
                    Span::styled(placeholder, placeholder_style),
                ])
            } else {
                Line::from(Span::styled(placeholder, placeholder_style))
            }
        } else if focused {
            let before: String = chars[..self.cursor.min(chars.len())].iter().collect();
            let at = chars.get(self.cursor).copied().unwrap_or(' ');
            let after: String = chars
                .get(self.cursor + 1..)
                .unwrap_or_default()
                .iter()
                .collect();
            Line::from(vec![
                Span::styled(before, input_style),
                Span::styled(at.to_string(), cursor_style),
                Span::styled(after, input_style),
            ])
        } else {
            Line::from(Span::styled(self.value.clone(), input_style))
        };

        let block = Block::default()
            .title(format!(" {} ", self.label))
            .title_style(Style::default().fg(theme.subtext0))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border));

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn focused_input() -> (TextInput, FocusContext) {
        let input = TextInput::new("Username");
        let mut focus = FocusContext::new();
        focus.attach(input.id());
        focus.focus(input.id());
        (input, focus)
    }

    #[test]
    fn typing_builds_the_value() {
        let (mut input, mut focus) = focused_input();
        for c in "alice".chars() {
            input.handle_key(key(KeyCode::Char(c)), &mut focus).unwrap();
        }
        assert_eq!(input.value(), "alice");
    }

    #[test]
    fn editing_at_cursor() {
        let (mut input, mut focus) = focused_input();
        for c in "ace".chars() {
            input.handle_key(key(KeyCode::Char(c)), &mut focus).unwrap();
        }
        input.handle_key(key(KeyCode::Left), &mut focus).unwrap();
        input.handle_key(key(KeyCode::Left), &mut focus).unwrap();
        input.handle_key(key(KeyCode::Char('l')), &mut focus).unwrap();
        input.handle_key(key(KeyCode::Char('i')), &mut focus).unwrap();
        assert_eq!(input.value(), "alice");

        input.handle_key(key(KeyCode::Backspace), &mut focus).unwrap();
        assert_eq!(input.value(), "alce");
    }

    #[test]
    fn enter_submits_the_value() {
        let (mut input, mut focus) = focused_input();
        input.handle_key(key(KeyCode::Char('x')), &mut focus).unwrap();
        let handled = input.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        match handled {
            Handled::Event(TextInputEvent::Submitted(v)) => assert_eq!(v, "x"),
            _ => panic!("expected submission"),
        }
    }

    #[test]
    fn unfocused_input_ignores_keys() {
        let (mut input, _) = focused_input();
        let mut other = FocusContext::new();
        let handled = input
            .handle_key(key(KeyCode::Char('x')), &mut other)
            .unwrap();
        assert!(!handled.is_consumed());
        assert_eq!(input.value(), "");
    }
}
