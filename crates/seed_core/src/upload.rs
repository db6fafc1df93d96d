//! Multipart upload of a file selection to the inference endpoint.

use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::model::{AnalysisBatch, check_summary, parse_response};
use crate::selection::SelectedFile;
use anyhow::Result;
use reqwest::blocking::multipart::{Form, Part};
use std::time::Instant;

/// One file ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Raw HTTP reply before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends one multipart POST. Errors are connection-level failures only;
/// any HTTP status is returned as a reply.
pub trait Transport {
    fn post_multipart(
        &self,
        endpoint: &str,
        field_name: &str,
        files: Vec<FilePayload>,
    ) -> Result<HttpReply>;
}

/// Production transport on `reqwest::blocking`, with transport-default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn post_multipart(
        &self,
        endpoint: &str,
        field_name: &str,
        files: Vec<FilePayload>,
    ) -> Result<HttpReply> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(file.content_type)?;
            form = form.part(field_name.to_string(), part);
        }
        let response = self.client.post(endpoint).multipart(form).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpReply { status, body })
    }
}

/// Packages a selection into one request and turns the reply into a validated batch.
#[derive(Debug, Clone)]
pub struct UploadClient<T: Transport> {
    transport: T,
    endpoint: String,
    field_name: String,
}

impl<T: Transport> UploadClient<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            endpoint: config.endpoint.clone(),
            field_name: config.field_name.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload every file in one POST. No retry.
    pub fn upload(&self, files: &[SelectedFile]) -> Result<AnalysisBatch, UploadError> {
        if files.is_empty() {
            return Err(UploadError::EmptySelection);
        }

        let mut payloads = Vec::with_capacity(files.len());
        for file in files {
            let bytes = file
                .read_bytes()
                .map_err(|e| UploadError::UploadFailed(format!("{e:#}")))?;
            payloads.push(FilePayload {
                file_name: file.name().to_string(),
                content_type: file.content_type(),
                bytes,
            });
        }
        let total_bytes: usize = payloads.iter().map(|p| p.bytes.len()).sum();
        tracing::debug!(
            "posting {} files ({total_bytes} bytes) to {}",
            payloads.len(),
            self.endpoint
        );

        let start = Instant::now();
        let reply = self
            .transport
            .post_multipart(&self.endpoint, &self.field_name, payloads)
            .map_err(|e| {
                tracing::warn!("upload to {} failed: {e:#}", self.endpoint);
                UploadError::UploadFailed(format!("{e:#}"))
            })?;

        if !(200..300).contains(&reply.status) {
            tracing::warn!("upload rejected with status {}", reply.status);
            return Err(UploadError::UploadFailed(format!(
                "server responded with status {}",
                reply.status
            )));
        }

        let batch = parse_response(&reply.body).inspect_err(|e| {
            tracing::warn!("discarding response: {e}");
        })?;
        for drift in check_summary(&batch) {
            tracing::warn!("summary drift: {drift}");
        }
        tracing::info!(
            "analyzed {} seeds in {:.1?}",
            batch.results().len(),
            start.elapsed()
        );
        Ok(batch)
    }
}
