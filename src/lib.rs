//! Verify summits of Taiwan's Baiyue from uploaded GPX tracks.
//!
//! A track file is parsed into a flat list of points ([`parse_track`]) and
//! matched against a gazetteer of summit coordinates
//! ([`find_visited_peaks`]). The same operations are exported to JavaScript
//! through wasm-bindgen.

pub mod completion;
pub mod converter;
pub mod error;
pub mod gazetteer;
pub mod geo;
pub mod matcher;
pub mod options;
pub mod parser;
pub mod types;
pub mod verify;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use crate::error::{FormatError, GazetteerError, StoreError};
pub use crate::gazetteer::Gazetteer;
pub use crate::matcher::{DEFAULT_THRESHOLD_METERS, find_visited_peaks};
pub use crate::options::{InvalidPointPolicy, ParseOptions, VerifyOptions};
pub use crate::parser::{parse_track, parse_track_with};
pub use crate::types::{CoordinateConfidence, GeoPoint, Peak, PeakId, Track};

/// Parse GPX text into a track, returned as a JS object.
#[wasm_bindgen(js_name = parseTrack)]
pub fn parse_track_js(content: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ParseOptions = from_js_or_default(options)?;
    let track = parser::parse_track_with(content, &opts)?;
    to_js(&track)
}

/// Ids of the peaks visited by a GPX track.
#[wasm_bindgen(js_name = findVisitedPeaks)]
pub fn find_visited_peaks_js(
    content: &str,
    gazetteer: JsValue,
    options: JsValue,
) -> Result<Vec<u32>, JsValue> {
    console_error_panic_hook::set_once();

    let opts: VerifyOptions = from_js_or_default(options)?;
    let gazetteer = gazetteer_from_js(gazetteer)?;
    let track = parser::parse_track_with(content, &opts.parse_options())?;
    Ok(gazetteer.find_visited(&track, opts.threshold_meters))
}

/// Verify an uploaded file, returned as a JS object.
#[wasm_bindgen(js_name = verifyTrack)]
pub fn verify_track_js(
    file_name: &str,
    content: &str,
    gazetteer: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: VerifyOptions = from_js_or_default(options)?;
    let gazetteer = gazetteer_from_js(gazetteer)?;
    let verification = verify::verify_upload(file_name, content, &gazetteer, &opts)?;
    to_js(&verification)
}

/// Verify an uploaded file and return the track and visited peaks as a
/// GeoJSON FeatureCollection.
#[wasm_bindgen(js_name = verificationToGeoJson)]
pub fn verification_to_geojson_js(
    file_name: &str,
    content: &str,
    gazetteer: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: VerifyOptions = from_js_or_default(options)?;
    let gazetteer = gazetteer_from_js(gazetteer)?;
    let (verification, track) =
        verify::verify_upload_track(file_name, content, &gazetteer, &opts)?;
    let fc = converter::to_feature_collection(&track, &gazetteer, &verification.visited);
    to_js(&fc)
}

/// The bundled Baiyue gazetteer.
#[wasm_bindgen(js_name = builtinGazetteer)]
pub fn builtin_gazetteer_js() -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    to_js(Gazetteer::baiyue().peaks())
}

fn gazetteer_from_js(value: JsValue) -> Result<Gazetteer, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Gazetteer::baiyue());
    }
    let peaks: Vec<Peak> = serde_wasm_bindgen::from_value(value).map_err(js_error)?;
    Ok(Gazetteer::new(peaks)?)
}

fn from_js_or_default<T>(value: JsValue) -> Result<T, JsValue>
where
    T: Default + serde::de::DeserializeOwned,
{
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(value).map_err(js_error)
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn js_error(e: serde_wasm_bindgen::Error) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
