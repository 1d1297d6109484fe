//! UI trait hierarchy and shared UI state.
//!
//! - [`Component`] - Reusable, interactive UI building blocks
//! - [`Screen`] - Full-page views that orchestrate components
//! - [`Dialog`] - Modal overlay with focus trapping
//! - [`FocusContext`] - The application's keyboard focus position
//! - [`ScrollLock`] - Background scroll suspension while overlays are open
//! - [`Handled`] - Result of handling an input event

mod component;
pub mod components;
mod dialog;
mod focus;
mod screen;
mod scroll_lock;

pub use component::Component;
pub use dialog::{Dialog, DialogContent, DialogEvent};
pub use focus::{FocusContext, FocusId};
pub use screen::Screen;
pub use scroll_lock::{ScrollLock, ScrollLockGuard};

/// Result type alias for UI operations.
pub type Result<T> = std::result::Result<T, color_eyre::Report>;

/// Result of handling an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> Handled<E> {
    /// Returns true if the input was consumed (not ignored).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Maps the event type using the provided function.
    pub fn map<F, U>(self, f: F) -> Handled<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Ignored => Handled::Ignored,
            Self::Consumed => Handled::Consumed,
            Self::Event(e) => Handled::Event(f(e)),
        }
    }
}

impl<E> From<E> for Handled<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_preserves_consumption() {
        let handled: Handled<u8> = Handled::Event(1);
        assert_eq!(handled.map(|n| n + 1), Handled::Event(2));

        let consumed: Handled<u8> = Handled::Consumed;
        assert_eq!(consumed.map(|n| n + 1), Handled::Consumed);

        let ignored: Handled<u8> = Handled::Ignored;
        assert!(!ignored.is_consumed());
    }
}
