use reqwest::Url;
use serde::Deserialize;

use crate::{Error, Result};

/// Success body returned by `POST /transcribe`.
///
/// Both paths are relative to the service origin. Extra fields (the service also sends
/// `"status": "success"`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobResponse {
    pub video_url: String,
    pub transcript_url: String,
}

impl JobResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Where the finished job's artifacts can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    video: Url,
    transcript: Url,
}

impl JobResult {
    /// Resolve a decoded response against the service origin.
    pub fn resolve(origin: &str, response: &JobResponse) -> Result<Self> {
        Ok(Self {
            video: resolve_resource(origin, &response.video_url)?,
            transcript: resolve_resource(origin, &response.transcript_url)?,
        })
    }

    /// Playback source for the subtitled video.
    pub fn video_location(&self) -> &Url {
        &self.video
    }

    /// Download link for the transcript.
    pub fn transcript_location(&self) -> &Url {
        &self.transcript
    }
}

/// Append a service-relative path to the origin.
///
/// The origin's own path (if any) is kept, so an origin of `http://host/api` and a path of
/// `/results/x` resolve to `http://host/api/results/x`.
pub fn resolve_resource(origin: &str, path: &str) -> Result<Url> {
    let path = path.trim();
    if path.is_empty() {
        return Err(Error::InvalidResourcePath(path.to_string()));
    }

    let origin = origin.trim_end_matches('/');
    let joined = if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    };

    Url::parse(&joined).map_err(|_| Error::InvalidResourcePath(path.to_string()))
}
