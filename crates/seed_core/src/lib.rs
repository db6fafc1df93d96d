//! Client-side result pipeline for the seed analyzer: file selection, multipart upload,
//! response validation, result storage, CSV export and display projections.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod selection;
pub mod state;
pub mod store;
pub mod upload;
pub mod view;

pub use config::ClientConfig;
pub use error::UploadError;
pub use export::{save_csv, to_csv};
pub use model::{AnalysisBatch, Label, SeedResult, Summary, SummaryDrift, check_summary};
pub use selection::{FileSelection, SelectedFile};
pub use state::{AppState, UploadState};
pub use store::ResultStore;
pub use upload::{ReqwestTransport, Transport, UploadClient};
pub use view::ResultView;
