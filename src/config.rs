use std::path::{Path, PathBuf};

use eyre::Context;
use log::{info, warn};
use serde::Deserialize;

use crate::{
    NAME,
    page::menu::{Escaping, LinkEntry, TARGET_ID},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serve the page on this address instead of printing it.
    pub bind:   Option<String>,
    /// Title of the built-in page.
    pub title:  String,
    /// Id of the element the menu is written into.
    pub target: String,
    /// Host page to write the menu into. Without one the built-in page is used.
    pub page:   Option<PathBuf>,
    /// Escape markup characters in urls and labels.
    pub escape: bool,
    pub links:  Vec<LinkEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind:   None,
            title:  "Menu".to_string(),
            target: TARGET_ID.to_string(),
            page:   None,
            escape: true,
            links:  vec![
                LinkEntry::new("http://gretl.sourceforge.net/", "Code (Bitbucket)"),
                LinkEntry::new("https://lancebachmeier.com", "My Website"),
            ],
        }
    }
}

impl Config {
    /// The target id is matched against the page as written, so it must not need
    /// escaping to appear in an attribute.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.target.is_empty() {
            eyre::bail!("`target` must not be empty");
        }
        if let Some(c) = self
            .target
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '&' | '<' | '>'))
        {
            eyre::bail!("`target` {:?} must not contain {c:?}", self.target);
        }
        Ok(())
    }

    pub fn escaping(&self) -> Escaping {
        if self.escape {
            Escaping::Html
        } else {
            Escaping::Raw
        }
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(NAME).join("menu.toml"))
}

pub fn load(path: impl AsRef<Path>) -> eyre::Result<Config> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).context(format!("Failed to read {path:?} to string"))?;
    let config: Config =
        toml::from_str(&contents).context(format!("Failed to parse {path:?}"))?;
    config.validate().context(format!("Invalid config in {path:?}"))?;
    Ok(config)
}

/// Loads the config from the user's config directory, if there is one.
pub fn load_default() -> eyre::Result<Config> {
    let Some(path) = default_path() else {
        warn!("No config directory on this system, using the default menu");
        return Ok(Config::default());
    };
    if !path.exists() {
        info!("{path:?} doesn't exist, using the default menu");
        return Ok(Config::default());
    }
    load(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_is_the_default_menu() {
        let file = write_config("");
        let config = load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.target, "menu-goes-here");
        assert_eq!(config.escaping(), Escaping::Html);
        assert_eq!(config.links.len(), 2);
        assert_eq!(config.links[0].url, "http://gretl.sourceforge.net/");
        assert_eq!(config.links[1].desc, "My Website");
    }

    #[test]
    fn links_replace_the_default_ones() {
        let file = write_config(
            r#"
            bind = "127.0.0.1:8080"
            target = "nav"
            escape = false

            [[links]]
            url = "https://example.org"
            desc = "Example"

            [[links]]
            url = "https://example.org"
            desc = "Example again"
            "#,
        );
        let config = load(file.path()).unwrap();
        assert_eq!(config.bind.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(config.target, "nav");
        assert_eq!(config.escaping(), Escaping::Raw);
        assert_eq!(
            config.links,
            vec![
                LinkEntry::new("https://example.org", "Example"),
                LinkEntry::new("https://example.org", "Example again"),
            ]
        );
    }

    #[test]
    fn link_without_desc_is_rejected() {
        let file = write_config(
            r#"
            [[links]]
            url = "https://example.org"
            "#,
        );
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn target_needing_escaping_is_rejected() {
        for target in [r#"a"b"#, "a&b", "a b", "a<b", "it's", ""] {
            let file = write_config(&format!("target = {target:?}"));
            assert!(load(file.path()).is_err(), "{target:?} was accepted");
        }

        let file = write_config(r#"target = "nav:links_1""#);
        assert_eq!(load(file.path()).unwrap().target, "nav:links_1");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path().join("menu.toml")).is_err());
    }
}
