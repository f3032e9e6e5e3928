mod content;
mod dispatcher;

pub use content::expiration_warning;
pub use dispatcher::{NotificationDispatcher, RunSummary};
