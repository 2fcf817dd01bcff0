use reqwest::Url;

use crate::file_intake::DEFAULT_LABEL;
use crate::opts::TranscriptionOptions;
use crate::{Error, Result};

/// Static configuration for a [`crate::Controller`].
///
/// Everything a reset returns to comes from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    service_origin: String,

    /// Drop zone text shown while no file is selected.
    pub default_label: String,

    /// Form values on load and after "back".
    pub default_options: TranscriptionOptions,
}

impl ClientConfig {
    /// Build a config for the given service origin (e.g. `http://localhost:8000`).
    ///
    /// Only `http`/`https` origins without query or fragment are accepted. A trailing `/` is
    /// dropped so resource paths can be appended directly.
    pub fn new(service_origin: impl AsRef<str>) -> Result<Self> {
        let raw = service_origin.as_ref().trim();
        let url = Url::parse(raw).map_err(|_| Error::InvalidOrigin(raw.to_string()))?;

        let valid = matches!(url.scheme(), "http" | "https")
            && url.has_host()
            && url.query().is_none()
            && url.fragment().is_none();
        if !valid {
            return Err(Error::InvalidOrigin(raw.to_string()));
        }

        Ok(Self {
            service_origin: url.as_str().trim_end_matches('/').to_string(),
            default_label: DEFAULT_LABEL.to_string(),
            default_options: TranscriptionOptions::default(),
        })
    }

    pub fn with_default_options(mut self, options: TranscriptionOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    pub fn service_origin(&self) -> &str {
        &self.service_origin
    }

    /// Absolute URL of a service endpoint such as `/transcribe`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        crate::job_result::resolve_resource(&self.service_origin, path)
    }
}
