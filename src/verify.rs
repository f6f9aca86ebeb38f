use serde::Serialize;

use crate::completion::{CompletionStore, NewCompletions, VerificationMethod};
use crate::error::{FormatError, StoreError};
use crate::gazetteer::Gazetteer;
use crate::options::VerifyOptions;
use crate::parser::parse_track_with;
use crate::types::{PeakId, Track};

/// Outcome of verifying one uploaded track file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub file_name: String,
    pub track_name: Option<String>,
    pub point_count: usize,
    /// Visited peak ids, in gazetteer order.
    pub visited: Vec<PeakId>,
}

impl Verification {
    /// True when the track passed no summit within the match radius.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

/// Check that `file_name` looks like a GPX file.
pub fn check_file_name(file_name: &str) -> Result<(), FormatError> {
    if file_name.to_ascii_lowercase().ends_with(".gpx") {
        Ok(())
    } else {
        Err(FormatError::UnsupportedFileType {
            file_name: file_name.to_string(),
        })
    }
}

/// Parse an uploaded file and match it against `gazetteer`.
pub fn verify_upload(
    file_name: &str,
    content: &str,
    gazetteer: &Gazetteer,
    opts: &VerifyOptions,
) -> Result<Verification, FormatError> {
    let (verification, _) = verify_upload_track(file_name, content, gazetteer, opts)?;
    Ok(verification)
}

/// Like [`verify_upload`], also handing back the parsed track.
pub fn verify_upload_track(
    file_name: &str,
    content: &str,
    gazetteer: &Gazetteer,
    opts: &VerifyOptions,
) -> Result<(Verification, Track), FormatError> {
    check_file_name(file_name)?;
    let track = parse_track_with(content, &opts.parse_options())?;
    let visited = gazetteer.find_visited(&track, opts.threshold_meters);

    tracing::debug!(file_name, visited = ?visited, "verified upload");

    let verification = Verification {
        file_name: file_name.to_string(),
        track_name: track.name().map(str::to_string),
        point_count: track.len(),
        visited,
    };
    Ok((verification, track))
}

/// Record the peaks of a verification as file-verified completions.
/// Returns the number of newly recorded peaks.
pub fn record_verification(
    store: &mut dyn CompletionStore,
    verification: &Verification,
    completed_at: &str,
) -> Result<usize, StoreError> {
    if verification.is_empty() {
        return Ok(0);
    }
    store.save_completions(&NewCompletions {
        peak_ids: verification.visited.clone(),
        completed_at: completed_at.to_string(),
        source_file_name: Some(verification.file_name.clone()),
        verification_method: VerificationMethod::FileVerified,
    })
}
