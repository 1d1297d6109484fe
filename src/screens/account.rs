use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Theme;
use crate::model::Profile;
use crate::ui::components::{
    Button, ButtonRow, ButtonRowEvent, ButtonStyle, TextInput, TextInputEvent,
};
use crate::ui::{
    Component, Dialog, DialogContent, DialogEvent, FocusContext, FocusId, Handled, Result,
    Screen, ScrollLock,
};

/// Messages the account screen emits to the app.
pub enum AccountMsg {
    /// The user completed the deletion form; the app signs the profile out.
    AccountDeleted,
}

enum DeleteAccountEvent {
    Deleted,
    Cancelled,
}

/// Deletion form hosted inside the dialog: the user must type their username
/// before the destructive button does anything.
struct DeleteAccountContent {
    username: String,
    input: TextInput,
    buttons: ButtonRow,
    mismatch: bool,
}

impl DeleteAccountContent {
    fn new(username: String) -> Self {
        let input = TextInput::new("Type your username to confirm")
            .with_placeholder(&username);
        let buttons = ButtonRow::new(vec![
            Button::new("Delete account").style(ButtonStyle::Danger),
            Button::new("Cancel"),
        ]);
        Self {
            username,
            input,
            buttons,
            mismatch: false,
        }
    }

    fn try_delete(&mut self) -> Handled<DeleteAccountEvent> {
        if self.input.value() == self.username {
            DeleteAccountEvent::Deleted.into()
        } else {
            self.mismatch = true;
            Handled::Consumed
        }
    }
}

impl DialogContent for DeleteAccountContent {
    type Msg = DeleteAccountEvent;

    fn focusables(&self) -> Vec<FocusId> {
        let mut ids = vec![self.input.id()];
        ids.extend(self.buttons.ids());
        ids
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        match self.input.handle_key(key, focus)? {
            Handled::Event(TextInputEvent::Submitted(_)) => return Ok(self.try_delete()),
            Handled::Consumed => {
                self.mismatch = false;
                return Ok(Handled::Consumed);
            }
            Handled::Ignored => {}
        }
        match self.buttons.handle_key(key, focus)? {
            Handled::Event(ButtonRowEvent::Pressed(0)) => Ok(self.try_delete()),
            Handled::Event(ButtonRowEvent::Pressed(_)) => {
                Ok(DeleteAccountEvent::Cancelled.into())
            }
            Handled::Consumed => Ok(Handled::Consumed),
            Handled::Ignored => Ok(Handled::Ignored),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let warning = Paragraph::new(Line::styled(
            "This permanently removes your profile, listings and credits.",
            Style::default().fg(theme.text),
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(warning, rows[0]);

        self.input.render(frame, rows[1], theme, focus);

        if self.mismatch {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "That is not your username.",
                    Style::default().fg(theme.error()),
                )),
                rows[2],
            );
        }

        self.buttons.render(frame, rows[3], theme, focus);
    }

    fn content_height(&self) -> u16 {
        7
    }
}

/// Profile summary plus account actions.
pub struct AccountScreen {
    profile: Option<Profile>,
    actions: ButtonRow,
    dialog: Option<Dialog<DeleteAccountContent>>,
    scroll_lock: Arc<ScrollLock>,
}

impl AccountScreen {
    pub fn new(profile: Option<Profile>, scroll_lock: Arc<ScrollLock>) -> Self {
        let actions = ButtonRow::new(vec![
            Button::new("Delete account").style(ButtonStyle::Danger),
        ]);
        Self {
            profile,
            actions,
            dialog: None,
            scroll_lock,
        }
    }

    pub fn set_profile(&mut self, profile: Option<Profile>) {
        self.profile = profile;
    }

    fn open_delete_dialog(&mut self, focus: &mut FocusContext) {
        let Some(profile) = self.profile.as_ref() else {
            return;
        };
        let content = DeleteAccountContent::new(profile.username.clone());
        // A stray click must not dismiss a destructive form; Escape and the
        // close affordance still work.
        let mut dialog = Dialog::new(content, Arc::clone(&self.scroll_lock))
            .with_title("Delete account")
            .close_on_overlay_click(false)
            .with_width(Constraint::Percentage(60));
        dialog.open(focus);
        self.dialog = Some(dialog);
    }

    fn close_dialog(&mut self, focus: &mut FocusContext) {
        if let Some(mut dialog) = self.dialog.take() {
            dialog.close(focus);
        }
    }

    fn settle_dialog(
        &mut self,
        event: DialogEvent<DeleteAccountEvent>,
        focus: &mut FocusContext,
    ) -> Handled<AccountMsg> {
        match event {
            DialogEvent::Content(DeleteAccountEvent::Deleted) => {
                self.close_dialog(focus);
                AccountMsg::AccountDeleted.into()
            }
            DialogEvent::Dismissed | DialogEvent::Content(DeleteAccountEvent::Cancelled) => {
                self.close_dialog(focus);
                Handled::Consumed
            }
        }
    }
}

impl Screen for AccountScreen {
    type Msg = AccountMsg;

    fn on_enter(&mut self, focus: &mut FocusContext) {
        for id in self.actions.ids() {
            focus.attach(id);
        }
        if let Some(first) = self.actions.ids().first() {
            focus.focus(*first);
        }
    }

    fn on_leave(&mut self, focus: &mut FocusContext) {
        self.close_dialog(focus);
        for id in self.actions.ids() {
            focus.detach(id);
        }
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

        match self.actions.handle_key(key, focus)? {
            Handled::Event(ButtonRowEvent::Pressed(0)) => {
                self.open_delete_dialog(focus);
                Ok(Handled::Consumed)
            }
            Handled::Event(ButtonRowEvent::Pressed(_)) | Handled::Consumed => {
                Ok(Handled::Consumed)
            }
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
        Ok(Handled::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &mut FocusContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .title(" Account ")
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(rows[0]);
        frame.render_widget(block, rows[0]);

        let lines = self.profile.as_ref().map_or_else(
            || {
                vec![Line::styled(
                    "No account signed in.",
                    Style::default().fg(theme.text_muted()),
                )]
            },
            |profile| {
                vec![
                    Line::from(vec![
                        Span::styled("username  ", Style::default().fg(theme.subtext0)),
                        Span::styled(
                            format!("@{}", profile.username),
                            Style::default()
                                .fg(theme.blue)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("joined    ", Style::default().fg(theme.subtext0)),
                        Span::styled(
                            profile.joined.format("%B %e, %Y").to_string(),
                            Style::default().fg(theme.text),
                        ),
                    ]),
                    Line::from(vec![
                        Span::styled("balance   ", Style::default().fg(theme.subtext0)),
                        Span::styled(
                            format!("{} credits", profile.balance),
                            Style::default().fg(theme.yellow),
                        ),
                    ]),
                ]
            },
        );
        frame.render_widget(Paragraph::new(lines), inner);

        if self.profile.is_some() {
            self.actions.render(frame, rows[1], theme, focus);
        }

        if let Some(dialog) = self.dialog.as_mut() {
            dialog.render(frame, area, theme, focus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_profile;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> (AccountScreen, FocusContext, Arc<ScrollLock>) {
        let lock = ScrollLock::new();
        let mut screen = AccountScreen::new(Some(seed_profile()), Arc::clone(&lock));
        let mut focus = FocusContext::new();
        screen.on_enter(&mut focus);
        (screen, focus, lock)
    }

    fn open_dialog(screen: &mut AccountScreen, focus: &mut FocusContext) {
        screen.handle_key(key(KeyCode::Enter), focus).unwrap();
        assert!(screen.dialog.is_some());
    }

    #[test]
    fn delete_button_opens_the_form() {
        let (mut screen, mut focus, lock) = screen();
        open_dialog(&mut screen, &mut focus);
        assert!(lock.is_locked());
    }

    #[test]
    fn wrong_username_does_not_delete() {
        let (mut screen, mut focus, _lock) = screen();
        open_dialog(&mut screen, &mut focus);
        // The input takes focus via the deferred move only after a render;
        // drive it directly for the test.
        let input_id = screen.dialog.as_ref().unwrap().content().input.id();
        focus.focus(input_id);

        for c in "bob".chars() {
            screen.handle_key(key(KeyCode::Char(c)), &mut focus).unwrap();
        }
        let handled = screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Consumed));
        assert!(screen.dialog.is_some(), "form stays open on mismatch");
        assert!(screen.dialog.as_ref().unwrap().content().mismatch);
    }

    #[test]
    fn typing_the_username_deletes_the_account() {
        let (mut screen, mut focus, lock) = screen();
        open_dialog(&mut screen, &mut focus);
        let input_id = screen.dialog.as_ref().unwrap().content().input.id();
        focus.focus(input_id);

        for c in "alice".chars() {
            screen.handle_key(key(KeyCode::Char(c)), &mut focus).unwrap();
        }
        let handled = screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Event(AccountMsg::AccountDeleted)));
        assert!(screen.dialog.is_none());
        assert!(!lock.is_locked());
    }

    #[test]
    fn unhandled_keys_do_not_cancel_the_form() {
        let (mut screen, mut focus, _lock) = screen();
        open_dialog(&mut screen, &mut focus);
        let delete_id = screen.dialog.as_ref().unwrap().content().buttons.ids()[0];
        focus.focus(delete_id);

        let handled = screen.handle_key(key(KeyCode::Char('x')), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Consumed), "modal swallows the key");
        assert!(screen.dialog.is_some(), "form stays open");
    }

    #[test]
    fn escape_cancels_the_form() {
        let (mut screen, mut focus, lock) = screen();
        open_dialog(&mut screen, &mut focus);

        let handled = screen.handle_key(key(KeyCode::Esc), &mut focus).unwrap();
        assert!(matches!(handled, Handled::Consumed));
        assert!(screen.dialog.is_none());
        assert!(!lock.is_locked());
        // Focus is restored to the delete button the snapshot captured.
        assert!(focus.is_focused(screen.actions.ids()[0]));
    }

    #[test]
    fn no_dialog_without_a_profile() {
        let lock = ScrollLock::new();
        let mut screen = AccountScreen::new(None, Arc::clone(&lock));
        let mut focus = FocusContext::new();
        screen.on_enter(&mut focus);

        screen.handle_key(key(KeyCode::Enter), &mut focus).unwrap();
        assert!(screen.dialog.is_none());
    }
}
