//! Landing, login, and registration pages

use dioxus::prelude::*;

use super::layout::{ErrorList, Layout};
use super::{attr, render, Nav, PageContext};
use crate::models::FormErrors;

/// Login fields echoed back after a failed attempt. The password never is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    pub username: String,
    pub remember: bool,
    pub next: Option<String>,
}

pub fn landing_page(context: PageContext) -> String {
    let signed_in = matches!(context.nav, Nav::SignedIn { .. });

    render(rsx! {
        Layout { heading: "Welcome".to_string(), context,
            section { class: "hero",
                h1 { "Jotter" }
                p { "Short notes, kept in one place." }
                if signed_in {
                    p { a { class: "button", href: "/home", "Go to your notes" } }
                } else {
                    p {
                        a { class: "button", href: "/login", "Log in" }
                        " or "
                        a { href: "/register", "create an account" }
                    }
                }
            }
        }
    })
}

pub fn login_page(context: PageContext, draft: &LoginDraft, errors: &FormErrors) -> String {
    let username = attr(&draft.username);
    let remember = draft.remember;
    let next = draft.next.as_deref().map(attr);

    render(rsx! {
        Layout { heading: "Log in".to_string(), context,
            h1 { "Log in" }
            form { class: "account-form", method: "post", action: "/login",
                ErrorList { errors: errors.clone() }
                label { r#for: "username", "Username" }
                input { id: "username", name: "username", r#type: "text", value: username }
                label { r#for: "password", "Password" }
                input { id: "password", name: "password", r#type: "password" }
                label { class: "check",
                    if remember {
                        input { name: "remember", r#type: "checkbox", checked: "checked" }
                    } else {
                        input { name: "remember", r#type: "checkbox" }
                    }
                    " Remember me"
                }
                {next.map(|next| rsx! { input { name: "next", r#type: "hidden", value: next } })}
                button { r#type: "submit", "Log in" }
            }
            p {
                "No account yet? "
                a { href: "/register", "Register" }
            }
        }
    })
}

pub fn register_page(context: PageContext, username: &str, errors: &FormErrors) -> String {
    let username = attr(username);

    render(rsx! {
        Layout { heading: "Register".to_string(), context,
            h1 { "Create an account" }
            form { class: "account-form", method: "post", action: "/register",
                ErrorList { errors: errors.clone() }
                label { r#for: "username", "Username" }
                input { id: "username", name: "username", r#type: "text", maxlength: "20", value: username }
                label { r#for: "password", "Password" }
                input { id: "password", name: "password", r#type: "password", maxlength: "80" }
                label { r#for: "confirm_password", "Confirm password" }
                input { id: "confirm_password", name: "confirm_password", r#type: "password", maxlength: "80" }
                button { r#type: "submit", "Register" }
            }
            p {
                "Already registered? "
                a { href: "/login", "Log in" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_links_depend_on_session() {
        let anonymous = landing_page(PageContext::new(Nav::Anonymous));
        assert!(anonymous.contains(">Log in</a>"));
        assert!(!anonymous.contains("Go to your notes"));

        let signed_in = landing_page(PageContext::new(Nav::SignedIn {
            username: "alice".into(),
        }));
        assert!(signed_in.contains("Go to your notes"));
        assert!(signed_in.contains(">Log out</a>"));
    }

    #[test]
    fn login_keeps_username_and_next() {
        let draft = LoginDraft {
            username: "alice".into(),
            remember: true,
            next: Some("/view/2".into()),
        };
        let errors = FormErrors::single("username", "Invalid username or password");
        let html = login_page(PageContext::new(Nav::Anonymous), &draft, &errors);

        assert!(html.contains("value=\"alice\""));
        assert!(html.contains("name=\"next\""));
        assert!(html.contains("checked"));
        assert!(html.contains("Invalid username or password"));
    }

    #[test]
    fn login_without_next_has_no_hidden_field() {
        let html = login_page(
            PageContext::new(Nav::Anonymous),
            &LoginDraft::default(),
            &FormErrors::new(),
        );
        assert!(!html.contains("name=\"next\""));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn register_escapes_username() {
        let html = register_page(
            PageContext::new(Nav::Anonymous),
            "\"><b>x</b>",
            &FormErrors::new(),
        );
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("value=\"&quot;&gt;&lt;b&gt;x&lt;/b&gt;\""));
    }

    #[test]
    fn login_escapes_echoed_fields() {
        let draft = LoginDraft {
            username: "\" autofocus onfocus=\"alert(1)".into(),
            remember: false,
            next: Some("/\" onclick=\"x".into()),
        };
        let html = login_page(PageContext::new(Nav::Anonymous), &draft, &FormErrors::new());

        assert!(!html.contains("\" autofocus"));
        assert!(!html.contains("\" onclick"));
        assert!(html.contains("&quot; autofocus onfocus=&quot;alert(1)"));
    }

    #[test]
    fn document_shell() {
        let html = landing_page(PageContext::new(Nav::Anonymous));
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<head>"));
        assert!(html.ends_with("</html>"));
    }
}
