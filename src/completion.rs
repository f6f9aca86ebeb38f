//! Completion records and the storage contract behind them.
//!
//! Storage itself lives outside this crate. Callers hand a [`CompletionStore`]
//! to whatever needs it; [`MemoryCompletionStore`] backs tests and offline use.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::PeakId;

/// How a completion was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    #[serde(alias = "gpx_verified")]
    FileVerified,
    Manual,
}

/// One recorded summit for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub peak_id: PeakId,
    /// ISO-8601 completion time.
    pub completed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_name: Option<String>,
    /// Older records carry no method; they were entered by hand.
    #[serde(default = "default_method")]
    pub verification_method: VerificationMethod,
}

/// A batch of completions to record.
#[derive(Debug, Clone)]
pub struct NewCompletions {
    pub peak_ids: Vec<PeakId>,
    /// ISO-8601 UTC time in `YYYY-MM-DDTHH:MM:SS(.sss)Z` form. Stores order
    /// records by comparing these strings, which is chronological only when
    /// every record uses this same form.
    pub completed_at: String,
    pub source_file_name: Option<String>,
    pub verification_method: VerificationMethod,
}

/// Durable storage of completion records, keyed by (user, peak).
pub trait CompletionStore {
    /// All records of the current user, most recent first.
    fn completed_peaks(&self) -> Result<Vec<CompletionRecord>, StoreError>;

    /// Record every peak in `batch` not already recorded.
    /// Returns the number of records inserted.
    fn save_completions(&mut self, batch: &NewCompletions) -> Result<usize, StoreError>;

    /// Returns whether a record was removed.
    fn delete_completion(&mut self, peak_id: PeakId) -> Result<bool, StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;

    fn completed_peak_ids(&self) -> Result<Vec<PeakId>, StoreError> {
        Ok(self.completed_peaks()?.into_iter().map(|r| r.peak_id).collect())
    }

    fn is_completed(&self, peak_id: PeakId) -> Result<bool, StoreError> {
        Ok(self.completed_peak_ids()?.contains(&peak_id))
    }

    fn record_for(&self, peak_id: PeakId) -> Result<Option<CompletionRecord>, StoreError> {
        Ok(self
            .completed_peaks()?
            .into_iter()
            .find(|r| r.peak_id == peak_id))
    }
}

/// In-process [`CompletionStore`] for a single user.
#[derive(Debug, Clone)]
pub struct MemoryCompletionStore {
    records: Vec<CompletionRecord>,
    signed_in: bool,
}

impl Default for MemoryCompletionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCompletionStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            signed_in: true,
        }
    }

    /// A store whose every operation fails with [`StoreError::NotAuthenticated`].
    pub fn signed_out() -> Self {
        Self {
            records: Vec::new(),
            signed_in: false,
        }
    }

    fn ensure_signed_in(&self) -> Result<(), StoreError> {
        if self.signed_in {
            Ok(())
        } else {
            Err(StoreError::NotAuthenticated)
        }
    }
}

impl CompletionStore for MemoryCompletionStore {
    fn completed_peaks(&self) -> Result<Vec<CompletionRecord>, StoreError> {
        self.ensure_signed_in()?;
        Ok(self.records.clone())
    }

    fn save_completions(&mut self, batch: &NewCompletions) -> Result<usize, StoreError> {
        self.ensure_signed_in()?;

        let mut known: HashSet<PeakId> = self.records.iter().map(|r| r.peak_id).collect();
        let fresh: Vec<CompletionRecord> = batch
            .peak_ids
            .iter()
            .filter(|&&id| known.insert(id))
            .map(|&peak_id| CompletionRecord {
                peak_id,
                completed_at: batch.completed_at.clone(),
                source_file_name: batch.source_file_name.clone(),
                verification_method: batch.verification_method,
            })
            .collect();

        let inserted = fresh.len();
        if inserted == 0 {
            tracing::debug!("no new completions to record");
            return Ok(0);
        }

        self.records.extend(fresh);
        self.records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        tracing::info!(inserted, "recorded completions");
        Ok(inserted)
    }

    fn delete_completion(&mut self, peak_id: PeakId) -> Result<bool, StoreError> {
        self.ensure_signed_in()?;
        let before = self.records.len();
        self.records.retain(|r| r.peak_id != peak_id);
        Ok(self.records.len() != before)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.ensure_signed_in()?;
        self.records.clear();
        Ok(())
    }
}

/// Collection progress towards a total number of peaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Whole percent, rounded half up; 0 when `total` is 0.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }
}

fn default_method() -> VerificationMethod {
    VerificationMethod::Manual
}
