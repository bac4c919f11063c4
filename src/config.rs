// src/config.rs
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct WidgetConfig {
    /// Base URL of the chat backend; requests go to `<backend_url>/chat`.
    pub backend_url: String,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub avatar_src: String,
    pub title: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            static_dir: PathBuf::from("static"),
            avatar_src: "/static/images/avatar.svg".to_string(),
            title: "Virtual Assistant".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("CHAT_BACKEND_URL") {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid { name: "CHAT_BACKEND_URL", value: url });
            }
            config.backend_url = url;
        }
        if let Some(addr) = lookup("WIDGET_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "WIDGET_BIND_ADDR", value: addr })?;
        }
        if let Some(dir) = lookup("WIDGET_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(src) = lookup("WIDGET_AVATAR_SRC") {
            config.avatar_src = src;
        }
        if let Some(title) = lookup("WIDGET_TITLE") {
            config.title = title;
        }

        Ok(config)
    }
}
