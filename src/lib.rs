//! Page-behavior controllers for a marketing site, running against a
//! deterministic in-memory page.
//!
//! A [`Page`] is loaded from HTML, wired once with [`Page::init`], and then
//! driven by host actions (`click`, `scroll_to`, `press_key`,
//! `advance_time`, ...). Six independent controllers react to the resulting
//! events: the mobile navigation menu, the scrolled navigation bar, smooth
//! in-page anchor scrolling, active-link highlighting, lazy hero-video
//! playback and one-shot entrance animations. [`utils`] exposes the form
//! validation helper and the two timing helpers to outside callers.
//!
//! ```
//! use page_behavior::{Page, Result};
//!
//! fn main() -> Result<()> {
//!     let mut page = Page::from_html(
//!         r##"<nav id="navbar"></nav>
//!            <button id="hamburger"></button>
//!            <ul id="nav-menu"><li><a class="nav-link" href="#about">About</a></li></ul>
//!            <section id="about"></section>"##,
//!     )?;
//!     page.init()?;
//!     page.click("#hamburger")?;
//!     page.assert_class("#nav-menu", "active", true)?;
//!     page.press_key("Escape")?;
//!     page.assert_class("#nav-menu", "active", false)?;
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod config;
mod controllers;
mod dom;
mod events;
mod forms;
mod host;
mod html;
mod media;
mod observer;
mod page;
mod pattern;
mod scheduler;
mod selector;
mod timing;
pub mod utils;

pub use config::PageConfig;
pub use controllers::smooth_scroll::{ease_in_out_cubic, scroll_position_at};
pub use media::PlaybackError;
pub use observer::IntersectionOptions;
pub use page::Page;
pub use scheduler::{PendingTimer, ScheduledTask, Scheduler, Task, TaskKind, TimerId, VirtualScheduler};
pub use timing::{Debounce, Throttle};

use config::*;
use controllers::*;
use dom::*;
use events::*;
use host::*;
use media::*;
use observer::*;
use selector::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    Runtime(String),
    InvalidConfig(String),
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests;
