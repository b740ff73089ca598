//! Web-page automation steps.

mod backend;
mod executor;
mod webdriver;

pub use backend::{BrowserBackend, BrowserError, BrowserSession, SessionGuard};
pub use executor::{WebAction, WebDetails, WebExecutor};
pub use webdriver::WebDriverBackend;
