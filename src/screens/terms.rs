use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{FocusContext, Handled, Result, Screen};

const TERMS: &[(&str, &str)] = &[
    (
        "1. Credits",
        "Credits are a virtual unit of exchange with no monetary value. They \
         cannot be bought, sold or transferred outside the platform.",
    ),
    (
        "2. Sessions",
        "A booking is an agreement between you and the mentor. Credits are \
         deducted when you confirm a booking and refunded if the mentor \
         cancels.",
    ),
    (
        "3. Conduct",
        "Be respectful. Listings that are misleading, unsafe or unlawful are \
         removed and may forfeit the credits involved.",
    ),
    (
        "4. Account deletion",
        "Deleting your account removes your profile, listings and remaining \
         credits permanently. This cannot be undone.",
    ),
    (
        "5. Changes",
        "These terms may change. Continued use after a change constitutes \
         acceptance of the new terms.",
    ),
];

/// Static legal text with keyboard and mouse-wheel scrolling. Nothing here
/// takes focus.
pub struct TermsScreen {
    offset: u16,
    /// Total rendered lines, recomputed each render for scroll clamping.
    line_count: u16,
    viewport_height: u16,
    resolver: Arc<KeyResolver>,
}

impl TermsScreen {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            offset: 0,
            line_count: 0,
            viewport_height: 0,
            resolver,
        }
    }

    fn max_offset(&self) -> u16 {
        self.line_count.saturating_sub(self.viewport_height)
    }

    fn scroll_down(&mut self) {
        self.offset = self.offset.saturating_add(1).min(self.max_offset());
    }

    fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }
}

impl Screen for TermsScreen {
    type Msg = ();

    fn handle_key(
        &mut self,
        key: KeyEvent,
        _focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.scroll_down();
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.scroll_up();
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            self.offset = 0;
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.offset = self.max_offset();
        } else {
            return Ok(Handled::Ignored);
        }
        Ok(Handled::Consumed)
    }

    fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        _focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.scroll_down();
                Ok(Handled::Consumed)
            }
            MouseEventKind::ScrollUp => {
                self.scroll_up();
                Ok(Handled::Consumed)
            }
            _ => Ok(Handled::Ignored),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, _focus: &mut FocusContext) {
        let block = Block::default()
            .title(" Terms of Service ")
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for (heading, body) in TERMS {
            lines.push(Line::styled(
                *heading,
                Style::default()
                    .fg(theme.mauve)
                    .add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(*body, Style::default().fg(theme.text)));
            lines.push(Line::raw(""));
        }

        // Approximate wrapped height for clamping: each body paragraph wraps
        // to at most a few lines at sane widths.
        let width = inner.width.max(1) as usize;
        self.line_count = lines
            .iter()
            .map(|l| (l.width().max(1)).div_ceil(width) as u16)
            .sum();
        self.viewport_height = inner.height;
        self.offset = self.offset.min(self.max_offset());

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((self.offset, 0));
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keybindings::KeybindingsConfig;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> (TermsScreen, FocusContext) {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        (TermsScreen::new(resolver), FocusContext::new())
    }

    #[test]
    fn scrolling_clamps_at_both_ends() {
        let (mut screen, mut focus) = screen();
        screen.line_count = 10;
        screen.viewport_height = 4;

        screen.handle_key(key(KeyCode::Up), &mut focus).unwrap();
        assert_eq!(screen.offset, 0, "cannot scroll above the top");

        for _ in 0..20 {
            screen.handle_key(key(KeyCode::Down), &mut focus).unwrap();
        }
        assert_eq!(screen.offset, 6, "stops at the last page");
    }

    #[test]
    fn home_and_end_jump() {
        let (mut screen, mut focus) = screen();
        screen.line_count = 10;
        screen.viewport_height = 4;

        screen.handle_key(key(KeyCode::Char('G')), &mut focus).unwrap();
        assert_eq!(screen.offset, 6);
        screen.handle_key(key(KeyCode::Char('g')), &mut focus).unwrap();
        assert_eq!(screen.offset, 0);
    }

    #[test]
    fn wheel_scrolls_the_text() {
        let (mut screen, mut focus) = screen();
        screen.line_count = 10;
        screen.viewport_height = 4;

        let wheel = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        screen
            .handle_mouse(wheel(MouseEventKind::ScrollDown), &mut focus)
            .unwrap();
        assert_eq!(screen.offset, 1);
        screen
            .handle_mouse(wheel(MouseEventKind::ScrollUp), &mut focus)
            .unwrap();
        assert_eq!(screen.offset, 0);
    }
}
