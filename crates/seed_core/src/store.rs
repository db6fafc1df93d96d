//! Session-lifetime holder of the last analyzed batch.

use crate::model::{AnalysisBatch, SeedResult, Summary};

/// Last successfully analyzed batch, replaced wholesale on each upload.
///
/// Holding an `Option<AnalysisBatch>` means results and summary are either both
/// present or both absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    batch: Option<AnalysisBatch>,
}

impl ResultStore {
    pub fn replace(&mut self, batch: AnalysisBatch) {
        self.batch = Some(batch);
    }

    pub fn clear(&mut self) {
        self.batch = None;
    }

    pub fn batch(&self) -> Option<&AnalysisBatch> {
        self.batch.as_ref()
    }

    /// Stored results, or an empty slice.
    pub fn results(&self) -> &[SeedResult] {
        self.batch.as_ref().map(|b| b.results()).unwrap_or(&[])
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.batch.as_ref().map(|b| b.summary())
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_none()
    }
}
