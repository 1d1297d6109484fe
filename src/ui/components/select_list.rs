use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, FocusContext, FocusId, Handled, Result};

pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

/// How an item draws itself as a list row.
pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Selectable, navigable list. Reacts to navigation keys only while focused.
pub struct SelectList<T: ListRow + Clone> {
    id: FocusId,
    title: String,
    items: Vec<T>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> SelectList<T> {
    pub fn new(title: impl Into<String>, items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            id: FocusId::next(),
            title: title.into(),
            items,
            state,
            resolver,
        }
    }

    #[must_use]
    pub const fn id(&self) -> FocusId {
        self.id
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.state.selected().is_none() && !self.items.is_empty() {
            self.state.select(Some(0));
        }
        self.clamp_selection();
    }

    pub const fn len(&self) -> usize {
        self.items.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `ListState` moves are only clamped at render time; `select_last` even
    /// stores `usize::MAX`. Pull the index back in range before it is read.
    fn clamp_selection(&mut self) {
        if self.items.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected()
            && i >= self.items.len()
        {
            self.state.select(Some(self.items.len() - 1));
        }
    }

    fn change_event(&mut self, before: Option<usize>) -> Handled<ListEvent<T>> {
        self.clamp_selection();
        if let Some(item) = self
            .state
            .selected()
            .filter(|i| Some(*i) != before)
            .and_then(|i| self.items.get(i))
        {
            return ListEvent::Changed(item.clone()).into();
        }
        Handled::Consumed
    }
}

impl<T: ListRow + Clone> Component for SelectList<T> {
    type Output = ListEvent<T>;

    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Output>> {
        if !focus.is_focused(self.id) {
            return Ok(Handled::Ignored);
        }
        let before = self.state.selected();

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.state.select_next();
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.state.select_previous();
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Home) {
            self.state.select_first();
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::End) {
            self.state.select_last();
            return Ok(self.change_event(before));
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            if let Some(item) = self.selected() {
                return Ok(ListEvent::Activated(item.clone()).into());
            }
            return Ok(Handled::Consumed);
        }

        Ok(Handled::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext) {
        let focused = focus.is_focused(self.id);
        let border = if focused {
            theme.border_focused()
        } else {
            theme.border()
        };

        let items: Vec<ListItem<'static>> =
            self.items.iter().map(|item| item.render_row(theme)).collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_type(theme.border_type)
                    .border_style(Style::default().fg(border)),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.surface0)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("❯ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keybindings::KeybindingsConfig;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[derive(Clone)]
    struct Row(&'static str);

    impl ListRow for Row {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(self.0)
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn list() -> (SelectList<Row>, FocusContext) {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        let list = SelectList::new("Skills", vec![Row("a"), Row("b"), Row("c")], resolver);
        let mut focus = FocusContext::new();
        focus.attach(list.id());
        focus.focus(list.id());
        (list, focus)
    }

    #[test]
    fn navigation_changes_selection() {
        let (mut list, mut focus) = list();
        let handled = list.handle_key(key(KeyCode::Down), &mut focus).unwrap();
        assert!(matches!(
            handled,
            Handled::Event(ListEvent::Changed(Row("b")))
        ));
    }

    #[test]
    fn enter_activates_the_selection() {
        let (mut list, mut focus) = list();
        let handled = list.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(matches!(
            handled,
            Handled::Event(ListEvent::Activated(Row("a")))
        ));
    }

    #[test]
    fn unfocused_list_ignores_navigation() {
        let (mut list, _) = list();
        let mut other = FocusContext::new();
        let handled = list.handle_key(key(KeyCode::Down), &mut other).unwrap();
        assert!(!handled.is_consumed());
    }

    #[test]
    fn end_key_selects_the_last_item() {
        let (mut list, mut focus) = list();
        let handled = list.handle_key(key(KeyCode::End), &mut focus).unwrap();
        assert!(matches!(
            handled,
            Handled::Event(ListEvent::Changed(Row("c")))
        ));
        assert!(matches!(list.selected(), Some(Row("c"))));
    }

    #[test]
    fn down_on_the_last_item_stays_put() {
        let (mut list, mut focus) = list();
        list.handle_key(key(KeyCode::End), &mut focus).unwrap();

        let handled = list.handle_key(key(KeyCode::Down), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Consumed), "no spurious change");
        assert!(matches!(list.selected(), Some(Row("c"))));

        let handled = list.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(matches!(
            handled,
            Handled::Event(ListEvent::Activated(Row("c")))
        ));
    }

    #[test]
    fn set_items_clamps_selection() {
        let (mut list, mut focus) = list();
        list.handle_key(key(KeyCode::End), &mut focus).unwrap();
        list.set_items(vec![Row("only")]);
        assert!(matches!(list.selected(), Some(Row("only"))));

        list.set_items(vec![]);
        assert!(list.selected().is_none());
    }
}
