//! Screen trait for full-page views.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::ui::{FocusContext, Handled, Result};

/// Full-page view that orchestrates components.
///
/// Screens connect UI interactions to business logic by translating
/// component events into domain messages. They know about the domain.
/// A screen's focusable widgets exist (are attached) only between
/// [`Screen::on_enter`] and [`Screen::on_leave`].
///
/// # Examples
///
/// - `BrowseScreen` - skill listings, emits `BrowseMsg`
/// - `AccountScreen` - profile and account actions, emits `AccountMsg`
pub trait Screen {
    /// The message type this screen emits (e.g., `BrowseMsg`)
    type Msg;

    /// Called when the screen becomes the active route. Attach focusable
    /// widgets and set the initial focus here.
    fn on_enter(&mut self, focus: &mut FocusContext) {
        _ = focus;
    }

    /// Called when the screen stops being the active route. Detach focusable
    /// widgets here; an open dialog must be closed as well so its teardown
    /// (scroll-lock release, focus restore) runs.
    fn on_leave(&mut self, focus: &mut FocusContext) {
        _ = focus;
    }

    /// Handle a key event, possibly emitting a business message.
    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        _ = key;
        _ = focus;
        Ok(Handled::Ignored)
    }

    /// Handle a mouse event (clicks, scrolling).
    fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>> {
        _ = mouse;
        _ = focus;
        Ok(Handled::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn on_tick(&mut self) {}

    /// Render the screen to the frame.
    ///
    /// Takes the focus context mutably because overlays resolve their
    /// deferred initial-focus move during the render pass that lays them out.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &mut FocusContext);
}
