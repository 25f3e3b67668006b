//! Page chrome shared by every view

use dioxus::prelude::*;

use super::{Nav, PageContext};
use crate::auth::Flash;
use crate::models::FormErrors;

#[component]
pub(super) fn Layout(heading: String, context: PageContext, children: Element) -> Element {
    let PageContext { nav: menu, flashes } = context;

    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{heading} | Jotter" }
            link { rel: "stylesheet", href: "/static/style.css" }
        }
        body {
            NavBar { menu }
            main {
                FlashList { flashes }
                {children}
            }
        }
    }
}

#[component]
fn NavBar(menu: Nav) -> Element {
    let links = match menu {
        Nav::SingleUser => rsx! {
            a { href: "/", "Notes" }
        },
        Nav::Anonymous => rsx! {
            a { href: "/login", "Log in" }
            a { href: "/register", "Register" }
        },
        Nav::SignedIn { username } => rsx! {
            a { href: "/home", "My notes" }
            span { class: "who", "Signed in as {username}" }
            a { href: "/logout", "Log out" }
        },
    };

    rsx! {
        nav { class: "topbar",
            a { class: "brand", href: "/", "Jotter" }
            {links}
        }
    }
}

#[component]
fn FlashList(flashes: Vec<Flash>) -> Element {
    rsx! {
        for flash in flashes {
            p { class: format!("flash flash-{}", flash.level.as_str()), {flash.message} }
        }
    }
}

/// Messages above a form; renders nothing when the submission was clean.
#[component]
pub(super) fn ErrorList(errors: FormErrors) -> Element {
    if errors.is_empty() {
        return rsx! {};
    }

    rsx! {
        ul { class: "errors",
            for message in errors.messages() {
                li { {message} }
            }
        }
    }
}
