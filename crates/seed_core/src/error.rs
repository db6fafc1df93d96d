use thiserror::Error;

/// Why an upload attempt produced no results.
///
/// Every variant is terminal for the triggering action; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No files were selected; no request was sent.
    #[error("no images selected")]
    EmptySelection,
    /// An upload is already in flight.
    #[error("an upload is already in progress")]
    Busy,
    /// Reading the files, the connection, a non-2xx status, or a non-JSON body.
    #[error("upload failed: {0}")]
    UploadFailed(String),
    /// The server answered 2xx but the body does not match the result model.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl UploadError {
    /// Message suitable for a user-facing notice.
    pub fn user_message(&self, endpoint: &str) -> String {
        match self {
            UploadError::EmptySelection => "Please select images!".to_string(),
            UploadError::Busy => "An analysis is already running.".to_string(),
            UploadError::UploadFailed(cause) => format!(
                "Error uploading files! Make sure the backend is running at {endpoint}.\n\n{cause}"
            ),
            UploadError::MalformedResponse(reason) => {
                format!("The server returned an unexpected response.\n\n{reason}")
            }
        }
    }
}
