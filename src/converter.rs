use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::gazetteer::Gazetteer;
use crate::types::{GeoPoint, Peak, PeakId, Track};

/// Convert a verified track and its visited peaks to a GeoJSON FeatureCollection.
///
/// The track comes first, followed by one Point per visited peak in the
/// order of `visited`. Ids missing from `gazetteer` are skipped.
pub fn to_feature_collection(
    track: &Track,
    gazetteer: &Gazetteer,
    visited: &[PeakId],
) -> FeatureCollection {
    let mut features = vec![track_to_feature(track)];
    features.extend(
        visited
            .iter()
            .filter_map(|&id| gazetteer.get(id))
            .map(peak_to_feature),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn track_to_feature(track: &Track) -> Feature {
    // Mixed 2D/3D positions are not allowed within one geometry.
    let include_elevation = track.points().iter().all(|pt| pt.elevation.is_some());

    let value = match track.points() {
        [single] => Value::Point(point_coords(single, include_elevation)),
        points => Value::LineString(
            points
                .iter()
                .map(|pt| point_coords(pt, include_elevation))
                .collect(),
        ),
    };

    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("track".to_string()));
    insert_optional(&mut props, "name", track.name());
    props.insert(
        "pointCount".to_string(),
        JsonValue::Number(track.len().into()),
    );
    insert_coordinate_times(&mut props, track.points());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn peak_to_feature(peak: &Peak) -> Feature {
    let geometry = Geometry::new(Value::Point(vec![peak.longitude, peak.latitude]));

    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("peak".to_string()));
    props.insert("peakId".to_string(), JsonValue::Number(peak.id.into()));
    props.insert("name".to_string(), JsonValue::String(peak.name.clone()));
    props.insert(
        "altitude".to_string(),
        JsonValue::Number(peak.altitude_meters.into()),
    );
    props.insert(
        "confidence".to_string(),
        JsonValue::String(peak.coordinate_confidence.as_str().to_string()),
    );

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &GeoPoint, include_elevation: bool) -> Vec<f64> {
    match (include_elevation, pt.elevation) {
        (true, Some(ele)) => vec![pt.longitude, pt.latitude, ele],
        _ => vec![pt.longitude, pt.latitude],
    }
}

fn insert_optional(props: &mut Map<String, JsonValue>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        props.insert(key.to_string(), JsonValue::String(v.to_string()));
    }
}

fn insert_coordinate_times(props: &mut Map<String, JsonValue>, points: &[GeoPoint]) {
    let times: Vec<JsonValue> = points
        .iter()
        .map(|pt| match &pt.timestamp {
            Some(t) => JsonValue::String(t.clone()),
            None => JsonValue::Null,
        })
        .collect();

    // Only include if at least one time is present
    if times.iter().any(|t| !t.is_null()) {
        let mut coord_props = Map::new();
        coord_props.insert("times".to_string(), JsonValue::Array(times));
        props.insert(
            "coordinateProperties".to_string(),
            JsonValue::Object(coord_props),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_track;

    #[test]
    fn test_track_line_and_peaks() {
        let xml = r#"<gpx><trk><name>Xue Shan</name><trkseg>
  <trkpt lat="24.38" lon="121.23"><ele>3700</ele><time>2025-01-01T06:00:00Z</time></trkpt>
  <trkpt lat="24.3895" lon="121.2342"><ele>3886</ele></trkpt>
</trkseg></trk></gpx>"#;
        let track = parse_track(xml).unwrap();
        let g = Gazetteer::baiyue();
        let fc = to_feature_collection(&track, &g, &[2, 999]);
        assert_eq!(fc.features.len(), 2);

        let line = &fc.features[0];
        let props = line.properties.as_ref().unwrap();
        assert_eq!(props["kind"], "track");
        assert_eq!(props["name"], "Xue Shan");
        assert_eq!(props["pointCount"], 2);
        let times = props["coordinateProperties"]["times"].as_array().unwrap();
        assert_eq!(times[0], "2025-01-01T06:00:00Z");
        assert!(times[1].is_null());
        match &line.geometry.as_ref().unwrap().value {
            Value::LineString(coords) => {
                assert_eq!(coords.len(), 2);
                assert_eq!(coords[1], vec![121.2342, 24.3895, 3886.0]);
            }
            other => panic!("Expected LineString, got {other:?}"),
        }

        let peak = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(peak["kind"], "peak");
        assert_eq!(peak["peakId"], 2);
        assert_eq!(peak["name"], "雪山");
        assert_eq!(peak["altitude"], 3886);
        assert_eq!(peak["confidence"], "reference");
    }

    #[test]
    fn test_single_point_track_without_elevation() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="23.47" lon="120.957"/></trkseg></trk></gpx>"#;
        let track = parse_track(xml).unwrap();
        let fc = to_feature_collection(&track, &Gazetteer::baiyue(), &[]);
        assert_eq!(fc.features.len(), 1);

        let feature = &fc.features[0];
        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![120.957, 23.47]),
            other => panic!("Expected Point, got {other:?}"),
        }
        let props = feature.properties.as_ref().unwrap();
        assert!(props.get("name").is_none());
        assert!(props.get("coordinateProperties").is_none());
    }
}
