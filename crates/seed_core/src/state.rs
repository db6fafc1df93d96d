//! Application state owned by the top-level controller.

use crate::error::UploadError;
use crate::export;
use crate::model::AnalysisBatch;
use crate::selection::{FileSelection, SelectedFile};
use crate::store::ResultStore;
use anyhow::Result;

/// At most one upload is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
}

#[derive(Debug, Default)]
pub struct AppState {
    selection: FileSelection,
    store: ResultStore,
    upload: UploadState,
    notice: Option<UploadError>,
}

impl AppState {
    pub fn set_files(&mut self, selection: impl IntoIterator<Item = SelectedFile>) {
        self.selection.set_files(selection);
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload
    }

    pub fn can_upload(&self) -> bool {
        self.upload == UploadState::Idle
    }

    pub fn can_export(&self) -> bool {
        !self.store.is_empty()
    }

    /// Move to `Uploading` and hand back the files to send.
    pub fn begin_upload(&mut self) -> Result<Vec<SelectedFile>, UploadError> {
        if self.upload == UploadState::Uploading {
            return Err(UploadError::Busy);
        }
        if self.selection.is_empty() {
            self.notice = Some(UploadError::EmptySelection);
            return Err(UploadError::EmptySelection);
        }
        self.upload = UploadState::Uploading;
        self.notice = None;
        Ok(self.selection.files().to_vec())
    }

    /// Apply the outcome of the in-flight upload and return to `Idle`.
    ///
    /// Only a successful batch touches the store.
    pub fn finish_upload(&mut self, outcome: Result<AnalysisBatch, UploadError>) {
        self.upload = UploadState::Idle;
        match outcome {
            Ok(batch) => self.store.replace(batch),
            Err(err) => self.notice = Some(err),
        }
    }

    /// Start a fresh session.
    pub fn reset(&mut self) {
        self.store.clear();
        self.notice = None;
    }

    pub fn notice(&self) -> Option<&UploadError> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<UploadError> {
        self.notice.take()
    }

    /// CSV bytes for the stored results; empty when nothing is stored.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        export::to_csv(self.store.results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::two_seed_batch;

    fn selected() -> Vec<SelectedFile> {
        vec![
            SelectedFile::in_memory("a.jpg", b"a".to_vec()),
            SelectedFile::in_memory("b.jpg", b"b".to_vec()),
        ]
    }

    #[test]
    fn empty_selection_stays_idle_with_notice() {
        let mut state = AppState::default();
        assert_eq!(state.begin_upload(), Err(UploadError::EmptySelection));
        assert_eq!(state.upload_state(), UploadState::Idle);
        assert_eq!(state.take_notice(), Some(UploadError::EmptySelection));
        assert!(state.notice().is_none());
    }

    #[test]
    fn second_begin_while_uploading_is_busy() {
        let mut state = AppState::default();
        state.set_files(selected());
        let files = state.begin_upload().unwrap();
        assert_eq!(files.len(), 2);
        assert!(!state.can_upload());
        assert_eq!(state.begin_upload(), Err(UploadError::Busy));
        assert_eq!(state.upload_state(), UploadState::Uploading);
    }

    #[test]
    fn success_replaces_store_and_returns_to_idle() {
        let mut state = AppState::default();
        state.set_files(selected());
        state.begin_upload().unwrap();
        state.finish_upload(Ok(two_seed_batch()));
        assert!(state.can_upload());
        assert!(state.can_export());
        assert_eq!(state.store().results().len(), 2);
        assert!(state.store().summary().is_some());
    }

    #[test]
    fn failure_keeps_previous_batch() {
        let mut state = AppState::default();
        state.set_files(selected());
        state.begin_upload().unwrap();
        state.finish_upload(Ok(two_seed_batch()));

        state.begin_upload().unwrap();
        state.finish_upload(Err(UploadError::MalformedResponse(
            "missing `summary` object".into(),
        )));
        assert_eq!(state.upload_state(), UploadState::Idle);
        assert_eq!(state.store().batch(), Some(&two_seed_batch()));
        assert!(matches!(
            state.notice(),
            Some(UploadError::MalformedResponse(_))
        ));
    }

    #[test]
    fn export_follows_store() -> Result<()> {
        let mut state = AppState::default();
        assert!(!state.can_export());
        assert!(state.export_csv()?.is_empty());

        state.set_files(selected());
        state.begin_upload().unwrap();
        state.finish_upload(Ok(two_seed_batch()));
        let text = String::from_utf8(state.export_csv()?)?;
        assert_eq!(text.lines().count(), 3);

        state.reset();
        assert!(!state.can_export());
        Ok(())
    }
}
