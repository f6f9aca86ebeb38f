use wasm_bindgen::JsValue;

use crate::types::PeakId;

/// Errors raised while reading an uploaded track file.
///
/// Every variant is expected on bad user input; callers should ask for a
/// different file rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid track file format: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid track file format: {0}")]
    Malformed(&'static str),

    #[error("missing attribute '{attribute}' on <trkpt>")]
    MissingCoordinate { attribute: &'static str },

    #[error("invalid value '{value}' for attribute '{attribute}' on <trkpt>")]
    InvalidCoordinate {
        attribute: &'static str,
        value: String,
    },

    #[error("no track points found")]
    NoTrackPoints,

    #[error("unsupported file type '{file_name}': expected a .gpx file")]
    UnsupportedFileType { file_name: String },
}

impl From<quick_xml::events::attributes::AttrError> for FormatError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.into())
    }
}

/// Errors raised when a gazetteer fails validation.
#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    #[error("duplicate peak id {0}")]
    DuplicateId(PeakId),

    #[error("peak id must be positive")]
    InvalidId,

    #[error("peak {id} has invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        id: PeakId,
        latitude: f64,
        longitude: f64,
    },

    #[error("gazetteer JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by a [`CompletionStore`](crate::completion::CompletionStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("user is not signed in")]
    NotAuthenticated,

    #[error("storage backend error: {message}")]
    Backend {
        message: String,
        code: Option<String>,
    },
}

impl From<FormatError> for JsValue {
    fn from(e: FormatError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

impl From<GazetteerError> for JsValue {
    fn from(e: GazetteerError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
