use std::borrow::Cow;

use log::debug;
use serde::Deserialize;

use crate::{document::Document, error::Error, node};

/// Id of the element the menu is written into by default.
pub const TARGET_ID: &str = "menu-goes-here";
/// Id of the sprite symbol drawn next to every link.
pub const ICON_SYMBOL: &str = "bookmark";
const ICON_HREF: &str = "#bookmark";

lazy_static::lazy_static! {
    /// Every item carries the same icon. It only references the sprite symbol,
    /// which has to be defined somewhere in the hosting page.
    pub static ref BOOKMARK_ICON: String = node! { svg,
        class = "bookmark-icon",
        "aria-hidden" = "true",
        focusable = "false",
        viewBox = "0 0 40 50" =>
        node! { use, "xlink:href" = ICON_HREF => "" },
    }
    .to_string();
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkEntry {
    pub url:  String,
    pub desc: String,
}

impl LinkEntry {
    pub fn new(url: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            url:  url.into(),
            desc: desc.into(),
        }
    }
}

/// How link urls and labels are embedded into the markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Replace `&`, `<`, `>`, `"` and `'` with character references.
    #[default]
    Html,
    /// Embed values verbatim. Values containing markup end up as markup.
    Raw,
}

impl Escaping {
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            Escaping::Html => escape_html(text),
            Escaping::Raw => Cow::Borrowed(text),
        }
    }
}

pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Renders a single `<li>`.
pub fn render_item(entry: &LinkEntry, escaping: Escaping) -> String {
    let url = escaping.apply(&entry.url);
    let desc = escaping.apply(&entry.desc);
    node! { li, class = "pattern" =>
        node! { a, href = url =>
            BOOKMARK_ICON.as_str(),
            node! { span, class = "text" => desc },
        },
    }
    .to_string()
}

/// Renders one item per entry, in order, with nothing in between.
pub fn render_markup(entries: &[LinkEntry], escaping: Escaping) -> String {
    entries
        .iter()
        .map(|entry| render_item(entry, escaping))
        .collect()
}

/// Replaces the content of `target_id` with `markup`.
pub fn apply(document: &mut Document, target_id: &str, markup: &str) -> Result<(), Error> {
    let element = document
        .get_element_by_id(target_id)
        .ok_or_else(|| Error::ElementNotFound(target_id.to_owned()))?;
    debug!(
        "Replacing {} bytes of content in <{} id={:?}>",
        element.inner_html().len(),
        element.tag(),
        element.id()
    );
    document.set_inner_html(target_id, markup)
}

/// Renders `entries` into the element `target_id` of `document`.
///
/// Fails with [`Error::ElementNotFound`] if the document has no such element, in which
/// case the document is left as it was.
pub fn render(
    entries: &[LinkEntry],
    target_id: &str,
    document: &mut Document,
    escaping: Escaping,
) -> Result<(), Error> {
    let markup = render_markup(entries, escaping);
    debug!("Rendered {} menu items", entries.len());
    apply(document, target_id, &markup)
}
