//! Just enough of an HTML document to find an element by id and swap out its
//! content. It is not a parser: the page is scanned tag by tag and everything
//! between the tags is left alone, so a page that goes through here comes out
//! byte-for-byte the same apart from the replaced content.

use std::{fmt, ops::Range};

use ahash::AHashSet;

use crate::error::Error;

lazy_static::lazy_static! {
    /// Elements that never have a closing tag.
    static ref VOID_ELEMENTS: AHashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();
}

/// Elements whose content is text that may contain a `<` without starting a tag.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    html: String,
}

/// An element found by [`Document::get_element_by_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    tag:        &'a str,
    id:         &'a str,
    inner_html: &'a str,
    content:    Range<usize>,
}

impl<'a> Element<'a> {
    pub fn tag(&self) -> &'a str {
        self.tag
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn inner_html(&self) -> &'a str {
        self.inner_html
    }
}

impl Document {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// Finds the first element whose `id` attribute is exactly `id`.
    ///
    /// Only elements that can hold content count: void elements, self-closed tags
    /// and elements that are never closed are treated as missing.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element<'_>> {
        let mut tags = Tags::new(&self.html);
        let (tag, id, content_start) = tags.find_map(|tag| match tag {
            Tag::Open {
                name,
                attrs,
                end,
                self_closing,
            } => {
                let value = attr_value(attrs, "id").filter(|value| *value == id)?;
                Some((!self_closing && !is_void(name)).then_some((name, value, end)))
            }
            Tag::Close { .. } => None,
        })??;

        let mut depth = 1usize;
        for next in tags {
            match next {
                Tag::Open {
                    name, self_closing, ..
                } if name.eq_ignore_ascii_case(tag) && !self_closing => depth += 1,
                Tag::Close { name, start } if name.eq_ignore_ascii_case(tag) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Element {
                            tag,
                            id,
                            inner_html: &self.html[content_start..start],
                            content: content_start..start,
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Replaces the whole content of the element with `html`.
    pub fn set_inner_html(&mut self, id: &str, html: &str) -> Result<(), Error> {
        let content = self
            .get_element_by_id(id)
            .map(|element| element.content)
            .ok_or_else(|| Error::ElementNotFound(id.to_owned()))?;
        self.html.replace_range(content, html);
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag<'a> {
    Open {
        name:         &'a str,
        attrs:        &'a str,
        /// Byte offset just past the closing `>`.
        end:          usize,
        self_closing: bool,
    },
    Close {
        name:  &'a str,
        /// Byte offset of the `<`.
        start: usize,
    },
}

/// Iterates over the start and end tags of a page, skipping comments, doctypes
/// and the content of raw text elements.
struct Tags<'a> {
    html: &'a str,
    pos:  usize,
}

impl<'a> Tags<'a> {
    fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }

    /// Moves past the next `>` at or after `from`, or to the end of the page.
    fn skip_past_gt(&mut self, from: usize) {
        self.pos = self.html[from..]
            .find('>')
            .map_or(self.html.len(), |i| from + i + 1);
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let start = self.pos + self.html.get(self.pos..)?.find('<')?;
            let rest = &self.html[start..];

            if rest.starts_with("<!--") {
                self.pos = rest[4..]
                    .find("-->")
                    .map_or(self.html.len(), |i| start + 4 + i + 3);
            } else if let Some(close) = rest.strip_prefix("</") {
                let name = &close[..name_len(close)];
                self.skip_past_gt(start);
                if !name.is_empty() {
                    return Some(Tag::Close { name, start });
                }
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past_gt(start);
            } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                let name = &rest[1..1 + name_len(&rest[1..])];
                let attrs_start = start + 1 + name.len();
                let (attrs_end, end, self_closing) = scan_start_tag(self.html, attrs_start);
                let attrs = &self.html[attrs_start..attrs_end];

                self.pos = end;
                if !self_closing
                    && RAW_TEXT_ELEMENTS
                        .iter()
                        .any(|raw| name.eq_ignore_ascii_case(raw))
                {
                    let closing = format!("</{}", name.to_ascii_lowercase());
                    self.pos = self.html[end..]
                        .to_ascii_lowercase()
                        .find(&closing)
                        .map_or(self.html.len(), |i| end + i);
                }
                return Some(Tag::Open {
                    name,
                    attrs,
                    end,
                    self_closing,
                });
            } else {
                self.pos = start + 1;
            }
        }
    }
}

fn name_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_'))
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrState {
    /// Between attributes, or inside an attribute name.
    Names,
    /// After `=`, before the value starts.
    BeforeValue,
    Unquoted,
    Quoted(u8),
}

/// Finds the `>` that ends a start tag, ignoring any inside quoted attribute values.
/// Returns the end of the attributes, the offset just past the `>` and whether the
/// tag is self-closed. A `/` only self-closes the tag when it stands on its own right
/// before the `>`; in `href=/a/>` it belongs to the value.
fn scan_start_tag(html: &str, from: usize) -> (usize, usize, bool) {
    let mut state = AttrState::Names;
    let mut slash = false;
    for (i, b) in html.bytes().enumerate().skip(from) {
        state = match state {
            AttrState::Quoted(q) if b == q => AttrState::Names,
            AttrState::Quoted(q) => AttrState::Quoted(q),
            AttrState::Unquoted | AttrState::BeforeValue if b == b'>' => {
                return (i, i + 1, false);
            }
            AttrState::Unquoted if b.is_ascii_whitespace() => AttrState::Names,
            AttrState::Unquoted => AttrState::Unquoted,
            AttrState::BeforeValue => match b {
                b'"' | b'\'' => AttrState::Quoted(b),
                b if b.is_ascii_whitespace() => AttrState::BeforeValue,
                _ => AttrState::Unquoted,
            },
            AttrState::Names => match b {
                b'>' => return (i, i + 1, slash),
                b'=' => {
                    slash = false;
                    AttrState::BeforeValue
                }
                _ => {
                    slash = b == b'/';
                    AttrState::Names
                }
            },
        };
    }
    (html.len(), html.len(), false)
}

fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    Attributes { rest: attrs }
        .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Name/value pairs of a start tag. Attributes without a value yield `""`.
struct Attributes<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        loop {
            let s = self
                .rest
                .trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
            if s.is_empty() {
                self.rest = s;
                return None;
            }

            let name_end = s
                .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
                .unwrap_or(s.len());
            if name_end == 0 {
                // stray `=`
                self.rest = &s[1..];
                continue;
            }
            let name = &s[..name_end];

            let Some(value) = s[name_end..].trim_start().strip_prefix('=') else {
                self.rest = &s[name_end..];
                return Some((name, ""));
            };
            let value = value.trim_start();
            let (value, rest) = match value.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &value[1..];
                    match inner.find(q) {
                        Some(i) => (&inner[..i], &inner[i + 1..]),
                        None => (inner, ""),
                    }
                }
                _ => {
                    let end = value
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(value.len());
                    (&value[..end], &value[end..])
                }
            };
            self.rest = rest;
            return Some((name, value));
        }
    }
}
