use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tracing::{debug, info, warn};

use crate::config::{GlobalAction, KeyResolver, NavAction};
use crate::model::{Profile, seed_catalog, seed_profile};
use crate::screens::{AccountMsg, AccountScreen, BrowseMsg, BrowseScreen, TermsScreen};
use crate::theme::Theme;
use crate::tui::{Event, Tui};
use crate::ui::components::StatusBar;
use crate::ui::{FocusContext, Handled, Screen, ScrollLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Browse,
    Account,
    Terms,
}

pub struct App {
    resolver: Arc<KeyResolver>,
    theme: Theme,
    focus: FocusContext,
    scroll_lock: Arc<ScrollLock>,
    profile: Option<Profile>,
    route: Route,
    browse: BrowseScreen,
    account: AccountScreen,
    terms: TermsScreen,
    /// Transient status-bar message and its remaining lifetime in ticks.
    notice: Option<(String, u8)>,
    should_quit: bool,
    should_suspend: bool,
}

/// How long a status-bar notice stays up, in ticks (4 ticks per second).
const NOTICE_TICKS: u8 = 12;

impl App {
    pub fn new(resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        let scroll_lock = ScrollLock::new();
        let profile = Some(seed_profile());
        let browse = BrowseScreen::new(
            seed_catalog(),
            Arc::clone(&resolver),
            Arc::clone(&scroll_lock),
        );
        let account = AccountScreen::new(profile.clone(), Arc::clone(&scroll_lock));
        let terms = TermsScreen::new(Arc::clone(&resolver));
        Self {
            resolver,
            theme,
            focus: FocusContext::new(),
            scroll_lock,
            profile,
            route: Route::Browse,
            browse,
            account,
            terms,
            notice: None,
            should_quit: false,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(60.0, 4.0)?;
        tui.enter()?;
        self.enter_route(self.route);

        loop {
            self.handle_event(&mut tui).await?;
            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.enter()?;
                tui.clear()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_event(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Init => info!("App started"),
            Event::Quit => self.should_quit = true,
            Event::Suspend => self.should_suspend = true,
            Event::Error(message) => warn!(message, "Event stream error"),
            Event::Tick => self.on_tick(),
            Event::Render => self.draw(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.draw(tui)?;
            }
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
        }
        Ok(())
    }

    /// The active screen sees keys first; a dialog inside it blocks
    /// everything below. Global bindings only apply to what falls through.
    fn handle_key(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        let handled = match self.route {
            Route::Browse => match self.browse.handle_key(key, &mut self.focus)? {
                Handled::Event(msg) => {
                    self.on_browse_msg(msg);
                    Handled::Consumed
                }
                other => other.map(|_| ()),
            },
            Route::Account => match self.account.handle_key(key, &mut self.focus)? {
                Handled::Event(msg) => {
                    self.on_account_msg(msg);
                    Handled::Consumed
                }
                other => other.map(|_| ()),
            },
            Route::Terms => self.terms.handle_key(key, &mut self.focus)?,
        };
        if handled.is_consumed() {
            return Ok(());
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Browse) {
            self.switch_route(Route::Browse);
        } else if self.resolver.matches_global(&key, GlobalAction::Account) {
            self.switch_route(Route::Account);
        } else if self.resolver.matches_global(&key, GlobalAction::Terms) {
            self.switch_route(Route::Terms);
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> color_eyre::Result<()> {
        // While a dialog holds the lock the page behind it must not scroll.
        // Non-scroll mouse events still go through for overlay hit-testing.
        if self.scroll_lock.is_locked()
            && matches!(
                mouse.kind,
                MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
            )
        {
            debug!("Scroll dropped while dialog open");
            return Ok(());
        }

        match self.route {
            Route::Browse => {
                if let Handled::Event(msg) = self.browse.handle_mouse(mouse, &mut self.focus)? {
                    self.on_browse_msg(msg);
                }
            }
            Route::Account => {
                if let Handled::Event(msg) = self.account.handle_mouse(mouse, &mut self.focus)? {
                    self.on_account_msg(msg);
                }
            }
            Route::Terms => {
                self.terms.handle_mouse(mouse, &mut self.focus)?;
            }
        }
        Ok(())
    }

    fn on_browse_msg(&mut self, msg: BrowseMsg) {
        match msg {
            BrowseMsg::Booked(listing) => {
                let Some(profile) = self.profile.as_mut() else {
                    warn!(listing = %listing.title, "Booking without an account");
                    return;
                };
                if profile.try_spend(listing.credits) {
                    info!(
                        listing = %listing.title,
                        mentor = %listing.mentor,
                        credits = listing.credits,
                        balance = profile.balance,
                        "Booked session"
                    );
                    self.notice = Some((
                        format!("Booked \"{}\" (-{} cr)", listing.title, listing.credits),
                        NOTICE_TICKS,
                    ));
                } else {
                    warn!(
                        listing = %listing.title,
                        credits = listing.credits,
                        balance = profile.balance,
                        "Insufficient credits"
                    );
                    self.notice = Some(("Not enough credits".to_string(), NOTICE_TICKS));
                }
                self.account.set_profile(self.profile.clone());
            }
        }
    }

    fn on_account_msg(&mut self, msg: AccountMsg) {
        match msg {
            AccountMsg::AccountDeleted => {
                info!("Account deleted");
                self.profile = None;
                self.account.set_profile(None);
                self.switch_route(Route::Browse);
            }
        }
    }

    fn switch_route(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        match self.route {
            Route::Browse => self.browse.on_leave(&mut self.focus),
            Route::Account => self.account.on_leave(&mut self.focus),
            Route::Terms => self.terms.on_leave(&mut self.focus),
        }
        self.route = route;
        self.enter_route(route);
        debug!(?route, "Switched route");
    }

    fn enter_route(&mut self, route: Route) {
        match route {
            Route::Browse => self.browse.on_enter(&mut self.focus),
            Route::Account => self.account.on_enter(&mut self.focus),
            Route::Terms => self.terms.on_enter(&mut self.focus),
        }
    }

    fn on_tick(&mut self) {
        if let Some((_, ticks)) = self.notice.as_mut() {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.notice = None;
            }
        }
        match self.route {
            Route::Browse => self.browse.on_tick(),
            Route::Account => self.account.on_tick(),
            Route::Terms => self.terms.on_tick(),
        }
    }

    fn draw(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(2)])
                .split(frame.area());

            match self.route {
                Route::Browse => {
                    self.browse
                        .render(frame, rows[0], &self.theme, &mut self.focus);
                }
                Route::Account => {
                    self.account
                        .render(frame, rows[0], &self.theme, &mut self.focus);
                }
                Route::Terms => {
                    self.terms
                        .render(frame, rows[0], &self.theme, &mut self.focus);
                }
            }

            let hints = self.hints();
            StatusBar::render(
                frame,
                rows[1],
                &self.theme,
                &hints,
                self.notice.as_ref().map(|(text, _)| text.as_str()),
                self.profile.as_ref().map(|p| p.balance),
            );
        })?;
        Ok(())
    }

    fn hints(&self) -> Vec<(String, &'static str)> {
        let mut hints = vec![
            (self.resolver.display_global(GlobalAction::Browse), "browse"),
            (
                self.resolver.display_global(GlobalAction::Account),
                "account",
            ),
            (self.resolver.display_global(GlobalAction::Terms), "terms"),
        ];
        match self.route {
            Route::Browse => {
                hints.push((self.resolver.display_nav(NavAction::Select), "book"));
            }
            Route::Terms => {
                hints.push((
                    format!(
                        "{}/{}",
                        self.resolver.display_nav(NavAction::Up),
                        self.resolver.display_nav(NavAction::Down),
                    ),
                    "scroll",
                ));
            }
            Route::Account => {}
        }
        hints.push((self.resolver.display_global(GlobalAction::Quit), "quit"));
        hints
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

    fn app() -> App {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        let mut app = App::new(resolver, Theme::catppuccin_mocha());
        app.enter_route(Route::Browse);
        app
    }

    #[test]
    fn number_keys_switch_routes() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.route, Route::Account);
        app.handle_key(key(KeyCode::Char('3'))).unwrap();
        assert_eq!(app.route, Route::Terms);
        app.handle_key(key(KeyCode::Char('1'))).unwrap();
        assert_eq!(app.route, Route::Browse);
    }

    #[test]
    fn quit_binding_sets_the_flag() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn booking_settles_the_balance() {
        let mut app = app();
        let start = app.profile.as_ref().unwrap().balance;

        // Open the confirmation for the first listing and confirm it.
        app.handle_key(key(KeyCode::Enter)).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();

        let balance = app.profile.as_ref().unwrap().balance;
        assert!(balance < start);
        assert!(!app.scroll_lock.is_locked());
    }

    #[test]
    fn route_keys_blocked_while_dialog_open() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.scroll_lock.is_locked());

        app.handle_key(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.route, Route::Browse, "modal blocks global bindings");

        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit, "quit falls through only without a dialog");
    }

    #[test]
    fn deleting_the_account_signs_out_and_returns_to_browse() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.route, Route::Account);

        app.on_account_msg(AccountMsg::AccountDeleted);
        assert!(app.profile.is_none());
        assert_eq!(app.route, Route::Browse);
    }

    #[test]
    fn scroll_is_dropped_while_a_dialog_is_open() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.scroll_lock.is_locked());

        let before = app.browse.selected_title();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(wheel).unwrap();
        assert_eq!(app.browse.selected_title(), before);
    }

    #[test]
    fn booking_notice_expires_after_its_ticks() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert!(app.notice.is_some());

        for _ in 0..NOTICE_TICKS {
            app.on_tick();
        }
        assert!(app.notice.is_none());
    }

    #[test]
    fn insufficient_credits_leave_the_balance_alone() {
        let mut app = app();
        app.profile.as_mut().unwrap().balance = 1;

        app.handle_key(key(KeyCode::Enter)).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.profile.as_ref().unwrap().balance, 1);
    }

    #[test]
    fn default_config_wires_up() {
        let config = KeybindingsConfig::default();
        assert!(!config.global.quit.display().is_empty());
    }
}
