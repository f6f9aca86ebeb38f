use serde::Deserialize;

use crate::matcher::DEFAULT_THRESHOLD_METERS;

/// What to do with a `<trkpt>` whose `lat`/`lon` is missing, unparseable,
/// non-finite or out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPointPolicy {
    /// Drop the point and keep the rest of the track.
    #[default]
    Skip,
    /// Fail the whole parse.
    Reject,
}

/// Options for parsing a track file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    #[serde(default)]
    pub invalid_points: InvalidPointPolicy,
}

/// Options for verifying an uploaded track.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOptions {
    /// Match radius in meters (default: 100)
    #[serde(default = "default_threshold")]
    pub threshold_meters: f64,

    /// Handling of points with bad coordinates (default: skip)
    #[serde(default)]
    pub invalid_points: InvalidPointPolicy,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            threshold_meters: DEFAULT_THRESHOLD_METERS,
            invalid_points: InvalidPointPolicy::default(),
        }
    }
}

impl VerifyOptions {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            invalid_points: self.invalid_points,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_METERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let opts: VerifyOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.threshold_meters, 100.0);
        assert_eq!(opts.invalid_points, InvalidPointPolicy::Skip);
    }

    #[test]
    fn test_camel_case_fields() {
        let opts: VerifyOptions =
            serde_json::from_str(r#"{"thresholdMeters": 250, "invalidPoints": "reject"}"#)
                .unwrap();
        assert_eq!(opts.threshold_meters, 250.0);
        assert_eq!(opts.parse_options().invalid_points, InvalidPointPolicy::Reject);
    }
}
