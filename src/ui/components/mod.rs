//! Reusable UI building blocks.

mod button;
mod confirm;
mod select_list;
mod status_bar;
mod text_input;

pub use button::{Button, ButtonRow, ButtonRowEvent, ButtonStyle};
pub use confirm::{ConfirmContent, ConfirmEvent};
pub use select_list::{ListEvent, ListRow, SelectList};
pub use status_bar::StatusBar;
pub use text_input::{TextInput, TextInputEvent};
