use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph};

use crate::Theme;
use crate::config::{KeyResolver, SearchAction};
use crate::model::SkillListing;
use crate::search::Matcher;
use crate::ui::components::{ConfirmContent, ConfirmEvent, ListEvent, ListRow, SelectList};
use crate::ui::{
    Component, Dialog, DialogEvent, FocusContext, Handled, Result, Screen, ScrollLock,
};

/// Messages the browse screen emits to the app.
pub enum BrowseMsg {
    /// The user confirmed booking a session; the app settles the credits.
    Booked(SkillListing),
}

impl ListRow for SkillListing {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        ListItem::new(Line::from(vec![
            Span::styled(self.title.clone(), Style::default().fg(theme.text)),
            Span::styled(
                format!("  @{}", self.mentor),
                Style::default().fg(theme.subtext0),
            ),
            Span::styled(
                format!("  [{}]", self.category.label()),
                Style::default().fg(theme.teal),
            ),
            Span::styled(
                format!("  {} cr", self.credits),
                Style::default()
                    .fg(theme.yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
    }
}

/// Skill listings with fuzzy filtering. Activating a listing opens the
/// booking confirmation dialog.
pub struct BrowseScreen {
    catalog: Vec<SkillListing>,
    list: SelectList<SkillListing>,
    matcher: Matcher,
    query: String,
    search_active: bool,
    dialog: Option<Dialog<ConfirmContent>>,
    /// The listing awaiting confirmation while the dialog is up.
    pending: Option<SkillListing>,
    resolver: Arc<KeyResolver>,
    scroll_lock: Arc<ScrollLock>,
}

impl BrowseScreen {
    pub fn new(
        catalog: Vec<SkillListing>,
        resolver: Arc<KeyResolver>,
        scroll_lock: Arc<ScrollLock>,
    ) -> Self {
        let list = SelectList::new("Skills", catalog.clone(), Arc::clone(&resolver));
        Self {
            catalog,
            list,
            matcher: Matcher::new(),
            query: String::new(),
            search_active: false,
            dialog: None,
            pending: None,
            resolver,
            scroll_lock,
        }
    }

    fn apply_filter(&mut self) {
        let filtered: Vec<SkillListing> = self
            .catalog
            .iter()
            .filter(|l| {
                self.matcher
                    .matches_any([l.title.as_str(), l.mentor.as_str()], &self.query)
            })
            .cloned()
            .collect();
        self.list.set_items(filtered);
    }

    fn open_booking(&mut self, listing: SkillListing, focus: &mut FocusContext) {
        let message = format!(
            "Book \"{}\" with @{} for {} credits?",
            listing.title, listing.mentor, listing.credits
        );
        let content = ConfirmContent::new(message, Arc::clone(&self.resolver));
        let mut dialog = Dialog::new(content, Arc::clone(&self.scroll_lock))
            .with_title("Confirm booking");
        dialog.open(focus);
        self.pending = Some(listing);
        self.dialog = Some(dialog);
    }

    fn close_dialog(&mut self, focus: &mut FocusContext) {
        if let Some(mut dialog) = self.dialog.take() {
            dialog.close(focus);
        }
        self.pending = None;
    }

    /// Route an event outcome from the open dialog.
    fn settle_dialog(
        &mut self,
        event: DialogEvent<ConfirmEvent>,
        focus: &mut FocusContext,
    ) -> Handled<BrowseMsg> {
        match event {
            DialogEvent::Content(ConfirmEvent::Confirmed) => {
                let pending = self.pending.take();
                self.close_dialog(focus);
                pending.map_or(Handled::Consumed, |listing| BrowseMsg::Booked(listing).into())
            }
            DialogEvent::Dismissed | DialogEvent::Content(ConfirmEvent::Cancelled) => {
                self.close_dialog(focus);
                Handled::Consumed
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn selected_title(&self) -> Option<String> {
        self.list.selected().map(|l| l.title.clone())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.search_active = false;
                true
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.apply_filter();
                true
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.apply_filter();
                true
            }
            _ => false,
        }
    }
}

impl Screen for BrowseScreen {
    type Msg = BrowseMsg;

    fn on_enter(&mut self, focus: &mut FocusContext) {
        focus.attach(self.list.id());
        focus.focus(self.list.id());
    }

    fn on_leave(&mut self, focus: &mut FocusContext) {
        // Close first so the dialog's teardown (lock release, focus restore)
        // runs before the screen's widgets detach.
        self.close_dialog(focus);
        focus.detach(self.list.id());
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        if let Some(dialog) = self.dialog.as_mut() {
            return Ok(match dialog.handle_key(key, focus)? {
                Handled::Event(event) => self.settle_dialog(event, focus),
                Handled::Consumed => Handled::Consumed,
                Handled::Ignored => Handled::Ignored,
            });
        }

        if self.search_active {
            if self.resolver.matches_search(&key, SearchAction::Exit) {
                self.search_active = false;
                self.query.clear();
                self.apply_filter();
                return Ok(Handled::Consumed);
            }
            if self.handle_search_key(key) {
                return Ok(Handled::Consumed);
            }
        }

        if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.search_active = true;
            return Ok(Handled::Consumed);
        }

        match self.list.handle_key(key, focus)? {
            Handled::Event(ListEvent::Activated(listing)) => {
                self.open_booking(listing, focus);
                Ok(Handled::Consumed)
            }
            Handled::Event(ListEvent::Changed(_)) | Handled::Consumed => Ok(Handled::Consumed),
            Handled::Ignored => Ok(Handled::Ignored),
        }
    }

    fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        if let Some(dialog) = self.dialog.as_mut() {
            return Ok(match dialog.handle_mouse(&mouse) {
                Handled::Event(event) => self.settle_dialog(event, focus),
                Handled::Consumed => Handled::Consumed,
                Handled::Ignored => Handled::Ignored,
            });
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.list
                    .handle_key(KeyEvent::from(KeyCode::Down), focus)
                    .map(|_| Handled::Consumed)
            }
            MouseEventKind::ScrollUp => {
                self.list
                    .handle_key(KeyEvent::from(KeyCode::Up), focus)
                    .map(|_| Handled::Consumed)
            }
            _ => Ok(Handled::Ignored),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &mut FocusContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        self.list.render(frame, rows[0], theme, focus);

        let search_line = if self.search_active || !self.query.is_empty() {
            Line::from(vec![
                Span::styled("/", Style::default().fg(theme.peach)),
                Span::styled(self.query.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    if self.search_active { "▌" } else { "" },
                    Style::default().fg(theme.text),
                ),
            ])
        } else {
            Line::styled("press / to search", Style::default().fg(theme.text_muted()))
        };
        frame.render_widget(Paragraph::new(search_line), rows[1]);

        if let Some(dialog) = self.dialog.as_mut() {
            dialog.render(frame, area, theme, focus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keybindings::KeybindingsConfig;
    use crate::model::seed_catalog;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> (BrowseScreen, FocusContext, Arc<ScrollLock>) {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        let lock = ScrollLock::new();
        let mut screen = BrowseScreen::new(seed_catalog(), resolver, Arc::clone(&lock));
        let mut focus = FocusContext::new();
        screen.on_enter(&mut focus);
        (screen, focus, lock)
    }

    #[test]
    fn activating_a_listing_opens_the_dialog() {
        let (mut screen, mut focus, lock) = screen();
        screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(screen.dialog.is_some());
        assert!(lock.is_locked());
    }

    #[test]
    fn confirming_emits_booked_and_closes() {
        let (mut screen, mut focus, lock) = screen();
        screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();

        let handled = screen.handle_key(key(KeyCode::Char('y')), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Event(BrowseMsg::Booked(_))));
        assert!(screen.dialog.is_none());
        assert!(!lock.is_locked());
    }

    #[test]
    fn escape_dismisses_without_booking() {
        let (mut screen, mut focus, lock) = screen();
        screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();

        let handled = screen.handle_key(key(KeyCode::Esc), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Consumed));
        assert!(screen.dialog.is_none());
        assert!(!lock.is_locked());
        // Focus went back to the list the snapshot captured.
        assert!(focus.is_focused(screen.list.id()));
    }

    #[test]
    fn leaving_the_screen_tears_the_dialog_down() {
        let (mut screen, mut focus, lock) = screen();
        screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(lock.is_locked());

        screen.on_leave(&mut focus);
        assert!(screen.dialog.is_none());
        assert!(!lock.is_locked());
    }

    #[test]
    fn search_filters_the_list() {
        let (mut screen, mut focus, _lock) = screen();
        let all = screen.list.len();

        screen.handle_key(key(KeyCode::Char('/')), &mut focus).unwrap();
        for c in "rust".chars() {
            screen.handle_key(key(KeyCode::Char(c)), &mut focus).unwrap();
        }
        assert!(screen.list.len() < all);
        assert!(screen.list.len() >= 1);

        // Esc clears the filter.
        screen.handle_key(key(KeyCode::Esc), &mut focus).unwrap();
        assert_eq!(screen.list.len(), all);
    }

    #[test]
    fn list_keys_ignored_while_dialog_open() {
        let (mut screen, mut focus, _lock) = screen();
        screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        let before = screen.list.selected().cloned();

        screen.handle_key(key(KeyCode::Down), &mut focus).unwrap();
        assert_eq!(screen.list.selected().cloned(), before);
    }
}
