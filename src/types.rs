use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Stable identifier of a gazetteer peak, shared with persistence and UI.
pub type PeakId = u32;

/// A single track sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            timestamp: None,
        }
    }
}

/// A parsed track: every `<trkpt>` of the file, flattened in document order.
///
/// Built by the parser or by [`Track::new`]; neither yields a track without points.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub(crate) name: Option<String>,
    pub(crate) points: Vec<GeoPoint>,
}

impl Track {
    /// Build a track from already-decoded points. Fails if `points` is empty.
    pub fn new(name: Option<String>, points: Vec<GeoPoint>) -> Result<Self, FormatError> {
        if points.is_empty() {
            return Err(FormatError::NoTrackPoints);
        }
        Ok(Self { name, points })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a track returned by the parser.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// How much the summit coordinate of a peak can be trusted. Shown as a UI
/// hint only; matching ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateConfidence {
    Authoritative,
    #[default]
    Reference,
    Estimated,
}

impl CoordinateConfidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authoritative => "authoritative",
            Self::Reference => "reference",
            Self::Estimated => "estimated",
        }
    }
}

/// A gazetteer entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peak {
    pub id: PeakId,
    pub name: String,
    #[serde(alias = "altitude")]
    pub altitude_meters: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub coordinate_confidence: CoordinateConfidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
