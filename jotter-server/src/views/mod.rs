//! Server-rendered HTML pages
//!
//! Pages are dioxus `rsx!` trees rendered once to a string with dioxus-ssr.
//! There is no client-side runtime: no hooks, no event handlers. The renderer
//! escapes text nodes but writes attribute values verbatim, so any user text
//! bound to an attribute goes through [`attr`] first.

mod accounts;
mod error;
mod layout;
mod notes;

use dioxus::prelude::Element;

use crate::auth::Flash;

pub use accounts::{landing_page, login_page, register_page, LoginDraft};
pub use error::error_page;
pub use notes::{edit_page, list_page, view_page};

/// Navigation shown in the page header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nav {
    /// Single-user mode: no accounts at all
    SingleUser,
    Anonymous,
    SignedIn { username: String },
}

impl Nav {
    /// Where the note list lives.
    pub fn home(&self) -> &'static str {
        match self {
            Self::SingleUser => "/",
            Self::Anonymous | Self::SignedIn { .. } => "/home",
        }
    }

    /// Multi-user pages show note titles and a separate view page.
    pub fn multi_user(&self) -> bool {
        !matches!(self, Self::SingleUser)
    }
}

/// What every page needs besides its own content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub nav: Nav,
    pub flashes: Vec<Flash>,
}

impl PageContext {
    pub fn new(nav: Nav) -> Self {
        Self {
            nav,
            flashes: Vec::new(),
        }
    }

    pub fn with_flashes(mut self, flashes: Vec<Flash>) -> Self {
        self.flashes = flashes;
        self
    }
}

/// Render a full document. The rsx tree supplies `head` and `body`.
fn render(page: Element) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">{}</html>",
        dioxus_ssr::render_element(page)
    )
}

/// Escape a value for a double-quoted attribute.
fn attr(value: &str) -> String {
    askama_escape::escape(value, askama_escape::Html).to_string()
}
