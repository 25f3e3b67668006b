use dioxus::prelude::*;

use super::layout::Layout;
use super::{render, PageContext};

/// Page for a failed request. `message` is shown verbatim; never pass error internals.
pub fn error_page(context: PageContext, status: u16, message: &str) -> String {
    let message = message.to_owned();
    let back = context.nav.home();

    render(rsx! {
        Layout { heading: format!("Error {status}"), context,
            section { class: "error",
                h1 { "{status}" }
                p { {message} }
                p { a { href: back, "Back to notes" } }
            }
        }
    })
}
