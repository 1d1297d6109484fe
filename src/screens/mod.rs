//! Full-page views.

mod account;
mod browse;
mod terms;

pub use account::{AccountMsg, AccountScreen};
pub use browse::{BrowseMsg, BrowseScreen};
pub use terms::TermsScreen;
