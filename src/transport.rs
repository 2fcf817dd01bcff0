use std::future::Future;

use bytes::Bytes;
use tracing::debug;

use crate::Result;
use crate::config::ClientConfig;
use crate::payload::JobRequest;

pub const TRANSCRIBE_PATH: &str = "/transcribe";

/// A settled HTTP exchange: status plus raw body, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Pluggable network layer used by [`crate::Controller`].
///
/// A transport only moves bytes. Status checks and body decoding happen in
/// [`crate::submission`] so they behave the same for every transport.
///
/// Returning `Err` means the exchange did not complete (connection refused, aborted, ...).
pub trait Transport {
    /// Issue `POST {origin}/transcribe` with the multipart payload.
    fn post_transcribe(
        &self,
        request: JobRequest,
    ) -> impl Future<Output = Result<ServiceResponse>> + Send;

    /// Issue `GET {origin}{path}`.
    fn get(&self, path: &str) -> impl Future<Output = Result<ServiceResponse>> + Send;
}

/// [`Transport`] backed by an async `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn read(response: reqwest::Response) -> Result<ServiceResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status, bytes = body.len(), "service responded");
        Ok(ServiceResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    async fn post_transcribe(&self, request: JobRequest) -> Result<ServiceResponse> {
        let url = self.config.endpoint(TRANSCRIBE_PATH)?;
        let form = request.into_form()?;

        debug!(%url, "posting transcription job");
        let response = self.client.post(url).multipart(form).send().await?;
        Self::read(response).await
    }

    async fn get(&self, path: &str) -> Result<ServiceResponse> {
        let url = self.config.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_inclusive_2xx() {
        assert!(ServiceResponse::new(200, "").is_success());
        assert!(ServiceResponse::new(299, "").is_success());
        assert!(!ServiceResponse::new(199, "").is_success());
        assert!(!ServiceResponse::new(300, "").is_success());
        assert!(!ServiceResponse::new(500, "").is_success());
    }
}
