use std::fmt::Write;

use crate::{
    group_nodes, node,
    page::menu::{ICON_SYMBOL, escape_html},
};

const CSS: &str = include_str!("../../styles.css");

lazy_static::lazy_static! {
    /// Hidden sprite holding the symbol the menu icons point at.
    pub static ref SPRITE: String = node! { svg,
        xmlns = "http://www.w3.org/2000/svg",
        style = "display: none" =>
        node! { symbol, id = ICON_SYMBOL, viewBox = "0 0 40 50" =>
            node! { path, d = "M4 0h32a4 4 0 0 1 4 4v46L20 38 0 50V4a4 4 0 0 1 4-4z" },
        },
    }
    .to_string();
}

/// The page the menu is written into when no page of its own is configured. The
/// menu container starts out empty.
pub fn render(title: &str, target_id: &str) -> String {
    let title = escape_html(title);
    let target_id = escape_html(target_id);
    let mut out = String::new();

    writeln!(out, "<!DOCTYPE html>").unwrap();
    writeln!(out, r#"<html lang="en-US">"#).unwrap();
    writeln!(out, "<head>").unwrap();
    {
        writeln!(out, r#"<meta charset="utf-8" />"#).unwrap();
        writeln!(
            out,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#
        )
        .unwrap();
        writeln!(out, r#"<title>{title}</title>"#).unwrap();
        writeln!(out, r#"<meta property="og:title" content="{title}" />"#).unwrap();
        writeln!(out, "<style>\n{CSS}\n</style>").unwrap();
    }
    writeln!(out, "</head>").unwrap();

    writeln!(out, "<body>").unwrap();
    {
        writeln!(
            out,
            "{}",
            group_nodes!(
                SPRITE.as_str(),
                node! { nav, class = "menu" => node! { ul, id = target_id => "" } }
            )
        )
        .unwrap();
    }
    writeln!(out, "</body>").unwrap();
    writeln!(out, "</html>").unwrap();

    out
}
