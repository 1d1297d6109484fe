//! Component trait for reusable UI building blocks.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::ui::{FocusContext, Handled, Result};

/// Interactive UI building block.
///
/// Components are reusable widgets that handle key events and emit
/// generic outputs. They know nothing about business logic. Focusable
/// components carry one or more [`crate::ui::FocusId`]s and only react
/// to input while focused.
///
/// # Examples
///
/// - `ButtonRow` - horizontally laid-out action buttons
/// - `TextInput` - single-line text input
/// - `SelectList` - selectable list with navigation
pub trait Component {
    /// The output type this component produces (e.g., `ButtonRowEvent`)
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Ok(Handled::...)` where:
    /// - `Ignored` - key was not handled, parent should process it
    /// - `Consumed` - key was handled but produced no output
    /// - `Event(output)` - key was handled and produced an output
    fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: &mut FocusContext,
    ) -> Result<Handled<Self::Output>> {
        _ = key;
        _ = focus;
        Ok(Handled::Ignored)
    }

    /// Render the component to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme, focus: &FocusContext);
}
