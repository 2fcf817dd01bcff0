use std::collections::BTreeMap;

use serde::Deserialize;

use crate::language::Language;
use crate::transport::Transport;
use crate::{Error, Result};

pub const FONTS_PATH: &str = "/fonts";

/// Burn-in fonts the service offers, keyed by language code then font name.
///
/// Decoded from `GET /fonts`, whose body looks like
/// `{"fonts": {"en": {"NotoSans": "/app/fonts/NotoSans-Regular.ttf"}}}`.
/// Only the names matter to us; the paths are service-internal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FontCatalog {
    fonts: BTreeMap<String, BTreeMap<String, String>>,
}

impl FontCatalog {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Font names available for `language`, sorted.
    pub fn fonts_for(&self, language: Language) -> Vec<&str> {
        self.fonts
            .get(language.code())
            .map(|fonts| fonts.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, language: Language, font: &str) -> bool {
        self.fonts
            .get(language.code())
            .is_some_and(|fonts| fonts.contains_key(font))
    }
}

/// Fetch the font catalogue from the service.
pub async fn fetch_fonts<T: Transport>(transport: &T) -> Result<FontCatalog> {
    let response = transport.get(FONTS_PATH).await?;
    if !response.is_success() {
        return Err(Error::Service {
            status: response.status,
        });
    }
    FontCatalog::from_slice(&response.body)
}
