use std::collections::HashSet;

use crate::error::GazetteerError;
use crate::geo::is_valid_coordinate;
use crate::matcher::find_visited_peaks;
use crate::types::{CoordinateConfidence, Peak, PeakId, Track};

/// Number of peaks in the full Baiyue list.
pub const TOTAL_BAIYUE: usize = 100;

/// (id, name, altitude, latitude, longitude, description)
const BAIYUE: &[(PeakId, &str, u32, f64, f64, &str)] = &[
    (1, "玉山", 3952, 23.47, 120.957, "台灣第一高峰"),
    (2, "雪山", 3886, 24.3895, 121.2342, "台灣第二高峰"),
    (3, "玉山東峰", 3869, 23.4742, 120.9628, "玉山群峰之一"),
    (4, "玉山北峰", 3858, 23.4836, 120.9553, "玉山群峰之一"),
    (5, "玉山南峰", 3844, 23.4589, 120.9547, "玉山群峰之一"),
    (6, "秀姑巒山", 3825, 23.4561, 121.0192, "中央山脈最高峰"),
    (7, "馬博拉斯山", 3765, 23.5153, 121.0411, "中央山脈北段最高峰"),
    (8, "南湖大山", 3742, 24.3647, 121.4322, "中央山脈北段名峰"),
    (9, "東小南山", 3711, 23.4653, 121.0175, "中央山脈高峰"),
    (10, "中央尖山", 3705, 24.3883, 121.4225, "有「寶島第一尖」之稱"),
    (11, "雪山北峰", 3703, 24.4017, 121.2264, "雪山山脈高峰"),
    (12, "關山", 3668, 23.2333, 120.9547, "南台灣名峰"),
    (13, "大水窟山", 3637, 23.4203, 121.0728, "中央山脈高峰"),
    (14, "南湖大山東峰", 3632, 24.3669, 121.4483, "南湖群峰之一"),
    (15, "東郡大山", 3619, 23.5361, 121.0242, "中央山脈高峰"),
    (16, "奇萊北峰", 3607, 24.1342, 121.3364, "奇萊連峰最高峰"),
    (17, "向陽山", 3603, 23.2875, 121.0619, "南二段名峰"),
    (18, "大劍山", 3594, 24.3569, 121.2825, "雪山山脈高峰"),
    (19, "雲峰", 3564, 23.5067, 121.0414, "中央山脈高峰"),
    (20, "南湖北山", 3536, 24.3869, 121.4361, "南湖群峰之一"),
];

/// A validated, read-only list of peaks.
///
/// Ids are unique and positive, and every summit coordinate is in range.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    peaks: Vec<Peak>,
}

impl Gazetteer {
    pub fn new(peaks: Vec<Peak>) -> Result<Self, GazetteerError> {
        let mut seen = HashSet::with_capacity(peaks.len());
        for peak in &peaks {
            if peak.id == 0 {
                return Err(GazetteerError::InvalidId);
            }
            if !seen.insert(peak.id) {
                return Err(GazetteerError::DuplicateId(peak.id));
            }
            if !is_valid_coordinate(peak.latitude, peak.longitude) {
                return Err(GazetteerError::InvalidCoordinate {
                    id: peak.id,
                    latitude: peak.latitude,
                    longitude: peak.longitude,
                });
            }
        }
        Ok(Self { peaks })
    }

    /// Deserialize a JSON array of peaks and validate it.
    pub fn from_json(json: &str) -> Result<Self, GazetteerError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The bundled Baiyue gazetteer.
    pub fn baiyue() -> Self {
        let peaks = BAIYUE
            .iter()
            .map(|&(id, name, altitude_meters, latitude, longitude, description)| Peak {
                id,
                name: name.to_string(),
                altitude_meters,
                latitude,
                longitude,
                coordinate_confidence: CoordinateConfidence::Reference,
                description: Some(description.to_string()),
            })
            .collect();
        Self { peaks }
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn get(&self, id: PeakId) -> Option<&Peak> {
        self.peaks.iter().find(|p| p.id == id)
    }

    /// Names for `ids`, in the given order. Unknown ids are left out.
    pub fn names_for(&self, ids: &[PeakId]) -> Vec<&str> {
        ids.iter()
            .filter_map(|&id| self.get(id))
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn find_visited(&self, track: &Track, threshold_meters: f64) -> Vec<PeakId> {
        find_visited_peaks(track, &self.peaks, threshold_meters)
    }
}
