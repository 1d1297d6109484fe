//! Modal dialog overlay with focus trapping.
//!
//! [`Dialog`] renders a full-area backdrop and a centered panel hosting
//! arbitrary [`DialogContent`]. It is content-agnostic: the same overlay
//! backs the booking confirmation and the account-deletion form.
//!
//! The caller owns the open flag. Opening captures the current focus
//! position, schedules the initial focus move for the render pass that lays
//! the panel out, and acquires the scroll lock. While open, the dialog
//! intercepts all input: Escape requests dismissal, Tab/BackTab cycle focus
//! through the content's focusable widgets (wrapping at both ends), and
//! everything else goes to the content. Closing cancels any pending focus
//! move, releases the scroll lock, and restores focus to the captured widget
//! if it is still attached.
//!
//! # Invariants
//!
//! - At most one live focus snapshot per instance; `open` while already open
//!   is a no-op.
//! - Teardown runs each step unconditionally; the scroll lock is held as an
//!   RAII guard so even dropping an open dialog releases it.
//! - A closed dialog ignores all input (no stale handlers).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear};

use crate::Theme;
use crate::ui::{FocusContext, FocusId, Handled, Result, ScrollLock, ScrollLockGuard};

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(1);

/// Rendered right-aligned in the top border; the mouse hit area is derived
/// from this same string so the two cannot drift apart.
const CLOSE_AFFORDANCE: &str = " ✕ ";

/// Unique identifier for a dialog instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(u64);

impl DialogId {
    fn next() -> Self {
        Self(NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a dialog emitted in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent<M> {
    /// The user asked to close (Escape, the `✕` affordance, or a backdrop
    /// click). The host flips its own state and calls [`Dialog::close`].
    Dismissed,
    /// The hosted content produced a message.
    Content(M),
}

/// Content hosted inside a [`Dialog`] panel.
pub trait DialogContent {
    /// The message type the content emits.
    type Msg;

    /// The content's focusable widget ids, in document order.
    ///
    /// Recomputed by the dialog on every Tab press; never cached across
    /// renders. May be empty, in which case Tab is a no-op and initial focus
    /// lands on the panel itself.
    fn focusables(&self) -> Vec<FocusId>;

    /// Handle a key the dialog did not intercept.
    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Msg>>;

    /// Render into the panel's inner area.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext);

    /// Rows the content needs inside the panel borders.
    fn content_height(&self) -> u16 {
        5
    }
}

/// Modal overlay hosting arbitrary content.
pub struct Dialog<C: DialogContent> {
    id: DialogId,
    title: Option<String>,
    close_on_overlay_click: bool,
    width: Constraint,
    content: C,
    open: bool,
    /// The panel itself can take focus when the content has no focusables.
    panel_id: FocusId,
    /// Focus position captured at open; consumed at close. `Some(None)` means
    /// nothing was focused when the dialog opened.
    snapshot: Option<Option<FocusId>>,
    /// Generation stamp of the pending initial-focus move, if any. Bumped on
    /// every open so a stale pending move can never fire after a re-open.
    pending_focus: Option<u64>,
    generation: u64,
    /// Content ids this dialog attached; detached again at close.
    mounted: Vec<FocusId>,
    panel_area: Option<Rect>,
    close_btn_area: Option<Rect>,
    /// Where the current mouse press started, for backdrop-click attribution.
    press_origin: Option<Position>,
    scroll_lock: Arc<ScrollLock>,
    lock_guard: Option<ScrollLockGuard>,
}

impl<C: DialogContent> Dialog<C> {
    pub fn new(content: C, scroll_lock: Arc<ScrollLock>) -> Self {
        Self {
            id: DialogId::next(),
            title: None,
            close_on_overlay_click: true,
            width: Constraint::Percentage(50),
            content,
            open: false,
            panel_id: FocusId::next(),
            snapshot: None,
            pending_focus: None,
            generation: 0,
            mounted: Vec::new(),
            panel_area: None,
            close_btn_area: None,
            press_origin: None,
            scroll_lock,
            lock_guard: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether clicking the backdrop dismisses the dialog. Defaults to true.
    /// The `✕` affordance dismisses regardless.
    #[must_use]
    pub const fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = close;
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: Constraint) -> Self {
        self.width = width;
        self
    }

    pub const fn content(&self) -> &C {
        &self.content
    }

    /// Open transition. No-op if already open.
    ///
    /// Order matters: capture the focus snapshot first, then schedule the
    /// deferred initial-focus move, then take the scroll lock and begin
    /// intercepting input.
    pub fn open(&mut self, focus: &mut FocusContext) {
        if self.open {
            return;
        }
        self.snapshot = Some(focus.current());

        self.generation = self.generation.wrapping_add(1);
        self.pending_focus = Some(self.generation);

        focus.attach(self.panel_id);
        self.mount_content(focus);

        self.lock_guard = Some(self.scroll_lock.acquire());
        self.open = true;
        tracing::debug!(dialog = self.id.0, "dialog opened");
    }

    /// Close transition. No-op if already closed.
    ///
    /// Order matters: stop intercepting input and cancel the pending focus
    /// move, release the scroll lock, then restore focus to the snapshot if
    /// that widget is still attached (silently skipped otherwise).
    pub fn close(&mut self, focus: &mut FocusContext) {
        if !self.open {
            return;
        }
        self.open = false;
        self.pending_focus = None;
        self.panel_area = None;
        self.close_btn_area = None;
        self.press_origin = None;

        self.lock_guard = None;

        for id in self.mounted.drain(..) {
            focus.detach(id);
        }
        focus.detach(self.panel_id);
        if let Some(snapshot) = self.snapshot.take()
            && let Some(prev) = snapshot
        {
            focus.restore(prev);
        }
        tracing::debug!(dialog = self.id.0, "dialog closed");
    }

    /// Handle a key event. A closed dialog ignores everything.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<DialogEvent<C::Msg>>> {
        if !self.open {
            return Ok(Handled::Ignored);
        }
        match key.code {
            KeyCode::Esc => Ok(DialogEvent::Dismissed.into()),
            KeyCode::Tab => {
                self.cycle_focus(focus, false);
                Ok(Handled::Consumed)
            }
            KeyCode::BackTab => {
                self.cycle_focus(focus, true);
                Ok(Handled::Consumed)
            }
            _ => {
                let handled = self.content.handle_key(key, focus)?;
                Ok(match handled.map(DialogEvent::Content) {
                    // The modal blocks the screen below; nothing leaks past it.
                    Handled::Ignored => Handled::Consumed,
                    other => other,
                })
            }
        }
    }

    /// Handle a mouse event. A closed dialog ignores everything.
    ///
    /// A click counts as a backdrop click only when both the press origin and
    /// the release point lie outside the panel; a drag that starts on the
    /// panel never dismisses.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> Handled<DialogEvent<C::Msg>> {
        if !self.open {
            return Handled::Ignored;
        }
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press_origin = Some(pos);
                Handled::Consumed
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let origin = self.press_origin.take();
                let Some(panel) = self.panel_area else {
                    return Handled::Consumed;
                };
                let Some(origin) = origin else {
                    return Handled::Consumed;
                };
                if let Some(btn) = self.close_btn_area
                    && btn.contains(origin)
                    && btn.contains(pos)
                {
                    return DialogEvent::Dismissed.into();
                }
                if self.close_on_overlay_click && !panel.contains(origin) && !panel.contains(pos)
                {
                    return DialogEvent::Dismissed.into();
                }
                Handled::Consumed
            }
            // Scroll and everything else stop at the overlay.
            _ => Handled::Consumed,
        }
    }

    /// Render the backdrop and panel. Renders nothing while closed.
    ///
    /// The deferred initial-focus move resolves at the end of this pass, once
    /// the panel has been laid out, and only if the dialog is still open and
    /// the pending stamp matches the latest open transition.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        focus: &mut FocusContext,
    ) {
        if !self.open {
            return;
        }

        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.crust)),
            area,
        );

        let height = self.content.content_height().saturating_add(2);
        let panel = area.centered(self.width, Constraint::Length(height));
        frame.render_widget(Clear, panel);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.lavender))
            .style(Style::default().bg(theme.base));
        if let Some(title) = &self.title {
            block = block.title_top(Line::styled(
                format!(" {title} "),
                Style::default()
                    .fg(theme.mauve)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        let close_title =
            Line::styled(CLOSE_AFFORDANCE, Style::default().fg(theme.overlay1)).right_aligned();
        let close_width = u16::try_from(close_title.width()).unwrap_or(0);
        block = block.title_top(close_title);

        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        self.panel_area = Some(panel);
        // A right-aligned top title ends one cell before the corner.
        self.close_btn_area = Some(Rect::new(
            panel.right().saturating_sub(close_width + 1),
            panel.y,
            close_width,
            1,
        ));

        self.content.render(frame, inner, theme, focus);

        if self.pending_focus == Some(self.generation) {
            self.pending_focus = None;
            let target = self
                .content
                .focusables()
                .first()
                .copied()
                .unwrap_or(self.panel_id);
            focus.focus(target);
        }
    }

    /// Move focus one step through the content's focusables, wrapping at the
    /// ends. The set is recomputed on every press; an empty set is a no-op.
    fn cycle_focus(&mut self, focus: &mut FocusContext, backward: bool) {
        let ring = self.content.focusables();
        if ring.is_empty() {
            return;
        }
        // Content may have grown since open; newly appeared widgets join the
        // registry here so they can take focus.
        for id in &ring {
            if !focus.is_attached(*id) {
                focus.attach(*id);
                self.mounted.push(*id);
            }
        }
        let len = ring.len();
        let pos = focus.current().and_then(|c| ring.iter().position(|&id| id == c));
        let next = match pos {
            Some(i) if backward => (i + len - 1) % len,
            Some(i) => (i + 1) % len,
            // Focus is on the panel container (or elsewhere): enter the ring
            // at the end matching the direction of travel.
            None if backward => len - 1,
            None => 0,
        };
        focus.focus(ring[next]);
    }

    fn mount_content(&mut self, focus: &mut FocusContext) {
        for id in self.content.focusables() {
            focus.attach(id);
            self.mounted.push(id);
        }
    }
}
