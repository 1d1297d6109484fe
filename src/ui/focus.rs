//! Keyboard focus registry.
//!
//! [`FocusContext`] tracks which widget currently has keyboard focus and
//! which widgets exist at all. A widget is focusable only while attached;
//! screens attach their widgets in `on_enter` and detach them in `on_leave`,
//! dialogs attach their content for the time they are open.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FOCUS_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, process-wide identifier for a focusable widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusId(u64);

impl FocusId {
    /// Allocate a fresh id. Widgets call this once at construction.
    pub fn next() -> Self {
        Self(NEXT_FOCUS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The application's single keyboard focus position.
#[derive(Debug, Default)]
pub struct FocusContext {
    current: Option<FocusId>,
    attached: HashSet<FocusId>,
}

impl FocusContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget so it can take focus.
    pub fn attach(&mut self, id: FocusId) {
        self.attached.insert(id);
    }

    /// Unregister a widget. If it held focus, focus becomes empty.
    pub fn detach(&mut self, id: FocusId) {
        self.attached.remove(&id);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    /// Move focus to an attached widget. Focusing a detached id is a no-op.
    pub fn focus(&mut self, id: FocusId) {
        if self.attached.contains(&id) {
            self.current = Some(id);
        }
    }

    pub fn blur(&mut self) {
        self.current = None;
    }

    /// Return focus to a previously captured position. Silently skipped when
    /// the widget has since been detached.
    pub fn restore(&mut self, id: FocusId) {
        self.focus(id);
    }

    #[must_use]
    pub const fn current(&self) -> Option<FocusId> {
        self.current
    }

    #[must_use]
    pub fn is_focused(&self, id: FocusId) -> bool {
        self.current == Some(id)
    }

    #[must_use]
    pub fn is_attached(&self, id: FocusId) -> bool {
        self.attached.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_requires_attachment() {
        let mut focus = FocusContext::new();
        let id = FocusId::next();

        focus.focus(id);
        assert_eq!(focus.current(), None);

        focus.attach(id);
        focus.focus(id);
        assert!(focus.is_focused(id));
    }

    #[test]
    fn detaching_the_focused_widget_clears_focus() {
        let mut focus = FocusContext::new();
        let id = FocusId::next();
        focus.attach(id);
        focus.focus(id);

        focus.detach(id);
        assert_eq!(focus.current(), None);
        assert!(!focus.is_attached(id));
    }

    #[test]
    fn detaching_another_widget_keeps_focus() {
        let mut focus = FocusContext::new();
        let a = FocusId::next();
        let b = FocusId::next();
        focus.attach(a);
        focus.attach(b);
        focus.focus(a);

        focus.detach(b);
        assert!(focus.is_focused(a));
    }

    #[test]
    fn restore_skips_detached_widgets() {
        let mut focus = FocusContext::new();
        let gone = FocusId::next();
        let stay = FocusId::next();
        focus.attach(stay);
        focus.focus(stay);

        focus.restore(gone);
        assert!(focus.is_focused(stay), "focus unchanged");
    }

    #[test]
    fn ids_are_unique() {
        let a = FocusId::next();
        let b = FocusId::next();
        assert_ne!(a, b);
    }
}
