use std::{fs, io::Write as _, path::PathBuf};

use eyre::Context;
use log::{error, info};
use tiny_http::{Header, Response};
use uri_rs::Uri;

use crate::{config::Config, document::Document};

mod config;
mod document;
mod error;
mod macros;
mod page;

pub const NAME: &str = "nav-menu";

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => config::load(PathBuf::from(path))?,
        None => config::load_default()?,
    };

    let document = build_page(&config)?;
    info!("Rendered {} links into #{}", config.links.len(), config.target);

    match config.bind.as_deref() {
        Some(bind) => serve(bind, &document.into_string()),
        None => {
            write!(std::io::stdout().lock(), "{document}")
                .context("Failed to write the page to stdout")?;
            Ok(())
        }
    }
}

/// Loads the host page (or builds the default one) and renders the menu into it.
fn build_page(config: &Config) -> eyre::Result<Document> {
    let mut document = match config.page.as_deref() {
        Some(path) => Document::new(
            fs::read_to_string(path).context(format!("Failed to read host page {path:?}"))?,
        ),
        None => Document::new(page::index::render(&config.title, &config.target)),
    };

    if let Err(e) = page::menu::render(
        &config.links,
        &config.target,
        &mut document,
        config.escaping(),
    ) {
        error!("Failed to render the menu: {e}");
        return Err(e.into());
    }
    Ok(document)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Page,
    NotFound,
}

fn route(url: &str) -> Route {
    let Ok(url) = Uri::new(url) else {
        return Route::NotFound;
    };
    match url.path {
        Some("/" | "/index.html") => Route::Page,
        _ => Route::NotFound,
    }
}

fn serve(bind: &str, page: &str) -> eyre::Result<()> {
    let server = tiny_http::Server::http(bind)
        .map_err(|e| eyre::eyre!("Failed to listen on {bind}: {e}"))?;
    info!("Serving the menu on http://{bind}/");

    loop {
        // blocks until the next request is received
        let request = match server.recv() {
            Ok(rq) => rq,
            Err(e) => {
                error!("Failed to receive request: {e}");
                break;
            }
        };

        let response = match route(request.url()) {
            Route::Page => Response::from_string(page)
                .with_header(
                    "Content-Type: text/html; charset=utf-8"
                        .parse::<Header>()
                        .expect("valid header"),
                )
                .with_header(
                    "Cache-Control: public, max-age=900"
                        .parse::<Header>()
                        .expect("valid header"),
                )
                .boxed(),
            Route::NotFound => Response::empty(404).boxed(),
        };
        if let Err(e) = request.respond(response) {
            error!("Failed to respond: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    use crate::{error::Error, page::menu::LinkEntry};

    fn page_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn menu_goes_into_the_configured_page() {
        let file = page_file(concat!(
            "<!DOCTYPE html>\n<html><head><title>Mine</title></head>\n",
            r#"<body><nav><ul id=menu-goes-here data-base=/x/><li>stale</li></ul></nav>"#,
            "<footer>kept</footer></body></html>\n",
        ));
        let config = Config {
            page: Some(file.path().to_path_buf()),
            links: vec![LinkEntry::new("/a", "A"), LinkEntry::new("/b", "B")],
            ..Config::default()
        };

        let page = build_page(&config).unwrap().to_string();
        let (before, rest) = page.split_once(r#"<li class="pattern">"#).unwrap();
        assert!(before.ends_with("<ul id=menu-goes-here data-base=/x/>"));
        assert!(!page.contains("stale"));
        assert_eq!(rest.matches(r#"<li class="pattern">"#).count(), 1);
        assert!(page.contains(r#"<a href="/a">"#));
        assert!(page.contains(r#"<a href="/b">"#));
        assert!(page.ends_with("</li></ul></nav><footer>kept</footer></body></html>\n"));
    }

    #[test]
    fn configured_page_without_the_target() {
        let html = r#"<body><ul id="elsewhere"></ul></body>"#;
        let file = page_file(html);
        let config = Config {
            page: Some(file.path().to_path_buf()),
            ..Config::default()
        };

        let err = build_page(&config).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::ElementNotFound("menu-goes-here".to_owned()))
        );
    }

    #[test]
    fn missing_page_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            page: Some(dir.path().join("page.html")),
            ..Config::default()
        };
        assert!(build_page(&config).is_err());
    }

    #[test]
    fn default_page_gets_the_default_menu() {
        let document = build_page(&Config::default()).unwrap();
        let menu = document.get_element_by_id("menu-goes-here").unwrap();
        assert!(menu.inner_html().contains(r#"<a href="http://gretl.sourceforge.net/">"#));
        assert!(menu.inner_html().contains(r#"<a href="https://lancebachmeier.com">"#));
    }

    #[test]
    fn routes() {
        assert_eq!(route("/"), Route::Page);
        assert_eq!(route("/index.html"), Route::Page);
        assert_eq!(route("/?utm=x"), Route::Page);
        assert_eq!(route("/music"), Route::NotFound);
        assert_eq!(route("/index.html/extra"), Route::NotFound);
    }
}
