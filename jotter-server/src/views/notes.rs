//! Note list, single note, and edit form

use dioxus::prelude::*;

use super::layout::{ErrorList, Layout};
use super::{attr, render, PageContext};
use crate::db::Note;
use crate::models::{FormErrors, NoteForm, Paginated};

/// Display-ready copy of a note
#[derive(Debug, Clone, PartialEq)]
struct Card {
    id: i64,
    title: Option<String>,
    content: String,
    created: String,
}

impl From<&Note> for Card {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            created: note.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// The note list with the creation form on top.
///
/// `draft` and `errors` carry a rejected submission back into the form.
pub fn list_page(
    context: PageContext,
    listing: &Paginated<Note>,
    draft: &NoteForm,
    errors: &FormErrors,
) -> String {
    let home = context.nav.home();
    let titles = context.nav.multi_user();
    let heading = if titles { "My notes" } else { "Notes" };
    let cards: Vec<Card> = listing.items.iter().map(Card::from).collect();
    let page = listing.page;
    let first_page = page_href(home, 1, listing.per_page);
    let count = match listing.total {
        1 => "1 note".to_string(),
        n => format!("{n} notes"),
    };

    render(rsx! {
        Layout { heading: heading.to_string(), context,
            h1 { "{heading}" }
            NoteEditor {
                action: home.to_string(),
                titles,
                draft: draft.clone(),
                errors: errors.clone(),
                submit: "Add note".to_string(),
            }
            if listing.total == 0 {
                p { class: "empty", "No notes yet." }
            } else {
                p { class: "count", "{count}" }
                if cards.is_empty() {
                    p { class: "empty",
                        "Nothing on page {page}. "
                        a { href: first_page, "Back to the first page" }
                    }
                }
                ul { class: "notes",
                    for card in cards {
                        NoteCard { card, titles }
                    }
                }
            }
            Pager {
                base: home.to_string(),
                page: listing.page,
                per_page: listing.per_page,
                last: listing.total_pages(),
                prev: listing.has_prev(),
                next: listing.has_next(),
            }
        }
    })
}

/// One note on its own page (multi-user mode).
pub fn view_page(context: PageContext, note: &Note) -> String {
    let Card {
        id,
        title,
        content,
        created,
    } = Card::from(note);
    let heading = title.unwrap_or_else(|| format!("Note {id}"));
    let back = context.nav.home();

    render(rsx! {
        Layout { heading: heading.clone(), context,
            article { class: "note single",
                h1 { "{heading}" }
                p { class: "content", {content} }
                footer {
                    time { "{created}" }
                    a { href: "/edit/{id}", "Edit" }
                    a { class: "danger", href: "/delete/{id}", "Delete" }
                }
            }
            p { a { href: back, "Back to notes" } }
        }
    })
}

/// Pre-filled edit form for `id`.
pub fn edit_page(context: PageContext, id: i64, draft: &NoteForm, errors: &FormErrors) -> String {
    let titles = context.nav.multi_user();
    let back = context.nav.home();

    render(rsx! {
        Layout { heading: "Edit note".to_string(), context,
            h1 { "Edit note" }
            NoteEditor {
                action: format!("/edit/{id}"),
                titles,
                draft: draft.clone(),
                errors: errors.clone(),
                submit: "Save".to_string(),
            }
            p { a { href: back, "Cancel" } }
        }
    })
}

#[component]
fn NoteEditor(
    action: String,
    titles: bool,
    draft: NoteForm,
    errors: FormErrors,
    submit: String,
) -> Element {
    let title = attr(&draft.title.unwrap_or_default());
    let content = draft.content;

    rsx! {
        form { class: "note-form", method: "post", action: action,
            ErrorList { errors }
            if titles {
                label { r#for: "title", "Title" }
                input { id: "title", name: "title", r#type: "text", maxlength: "100", value: title }
            }
            label { r#for: "content", "Note" }
            textarea { id: "content", name: "content", rows: "4", maxlength: "500", {content} }
            button { r#type: "submit", {submit} }
        }
    }
}

#[component]
fn NoteCard(card: Card, titles: bool) -> Element {
    let Card {
        id,
        title,
        content,
        created,
    } = card;

    rsx! {
        li { class: "note",
            {title.map(|t| rsx! { h2 { {t} } })}
            p { class: "content", {content} }
            footer {
                time { "{created}" }
                if titles {
                    a { href: "/view/{id}", "View" }
                }
                a { href: "/edit/{id}", "Edit" }
                a { class: "danger", href: "/delete/{id}", "Delete" }
            }
        }
    }
}

/// Listing link that keeps the page size.
fn page_href(base: &str, page: u32, per_page: u32) -> String {
    attr(&format!("{base}?page={page}&per_page={per_page}"))
}

/// Previous/next links. Notes are listed oldest first, so earlier pages hold
/// older notes. From past the end, "Older" goes to the last page.
#[component]
fn Pager(base: String, page: u32, per_page: u32, last: u32, prev: bool, next: bool) -> Element {
    if !prev && !next {
        return rsx! {};
    }
    let older = page.saturating_sub(1).min(last);

    rsx! {
        nav { class: "pager",
            if prev {
                a { href: page_href(&base, older, per_page), "Older" }
            }
            span { "Page {page}" }
            if next {
                a { href: page_href(&base, page.saturating_add(1), per_page), "Newer" }
            }
        }
    }
}
