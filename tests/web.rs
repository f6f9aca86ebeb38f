#![cfg(target_arch = "wasm32")]

use baiyue_track_verify::{
    builtin_gazetteer_js, find_visited_peaks_js, parse_track_js, verification_to_geojson_js,
    verify_track_js,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

const YU_SHAN: &str = r#"<gpx><trk><name>Yushan</name><trkseg>
  <trkpt lat="23.47" lon="120.957"><ele>3952</ele></trkpt>
</trkseg></trk></gpx>"#;

#[wasm_bindgen_test]
fn parse_track_returns_object() {
    let value = parse_track_js(YU_SHAN, JsValue::UNDEFINED).unwrap();
    let name = js_sys::Reflect::get(&value, &JsValue::from_str("name")).unwrap();
    assert_eq!(name.as_string().as_deref(), Some("Yushan"));
}

#[wasm_bindgen_test]
fn find_visited_peaks_uses_builtin_gazetteer() {
    let ids = find_visited_peaks_js(YU_SHAN, JsValue::NULL, JsValue::UNDEFINED).unwrap();
    assert_eq!(ids, vec![1]);
}

#[wasm_bindgen_test]
fn invalid_file_becomes_js_error() {
    let err = verify_track_js("a.gpx", "<gpx>", JsValue::UNDEFINED, JsValue::UNDEFINED)
        .unwrap_err();
    assert!(err.is_instance_of::<js_sys::Error>());
}

#[wasm_bindgen_test]
fn builtin_gazetteer_is_array() {
    let value = builtin_gazetteer_js().unwrap();
    assert!(js_sys::Array::is_array(&value));
    assert_eq!(js_sys::Array::from(&value).length(), 20);
}

#[wasm_bindgen_test]
fn verification_to_geojson_returns_feature_collection() {
    let value =
        verification_to_geojson_js("yushan.gpx", YU_SHAN, JsValue::UNDEFINED, JsValue::UNDEFINED)
            .unwrap();
    let kind = js_sys::Reflect::get(&value, &JsValue::from_str("type")).unwrap();
    assert_eq!(kind.as_string().as_deref(), Some("FeatureCollection"));
    let features = js_sys::Reflect::get(&value, &JsValue::from_str("features")).unwrap();
    // Track line plus Yu Shan.
    assert_eq!(js_sys::Array::from(&features).length(), 2);
}

#[wasm_bindgen_test]
fn caller_supplied_gazetteer_is_used() {
    let peaks = js_sys::JSON::parse(
        r#"[{"id": 42, "name": "Test Peak", "altitudeMeters": 3000,
             "latitude": 23.47, "longitude": 120.957}]"#,
    )
    .unwrap();
    let ids = find_visited_peaks_js(YU_SHAN, peaks, JsValue::UNDEFINED).unwrap();
    assert_eq!(ids, vec![42]);

    let duplicate = js_sys::JSON::parse(
        r#"[{"id": 1, "name": "A", "altitudeMeters": 1, "latitude": 0, "longitude": 0},
            {"id": 1, "name": "B", "altitudeMeters": 1, "latitude": 1, "longitude": 1}]"#,
    )
    .unwrap();
    let err = find_visited_peaks_js(YU_SHAN, duplicate, JsValue::UNDEFINED).unwrap_err();
    assert!(err.is_instance_of::<js_sys::Error>());
}
