use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::FormatError;
use crate::geo::is_valid_coordinate;
use crate::options::{InvalidPointPolicy, ParseOptions};
use crate::types::{GeoPoint, Track};

type Result<T> = std::result::Result<T, FormatError>;

/// A `<trkpt>` whose end tag has not been seen yet.
struct PendingPoint {
    /// `None` when the coordinates were invalid and the point is being dropped.
    point: Option<GeoPoint>,
    ele_seen: bool,
    time_seen: bool,
}

/// Parse a GPX document into a [`Track`] using the default options.
pub fn parse_track(xml: &str) -> Result<Track> {
    parse_track_with(xml, &ParseOptions::default())
}

/// Parse a GPX document into a [`Track`].
///
/// Every `<trkpt>` is collected regardless of nesting, so tracks and
/// segments are flattened into one sequence in document order. The track
/// name is the first `<name>` directly inside a `<trk>`.
pub fn parse_track_with(xml: &str, opts: &ParseOptions) -> Result<Track> {
    let mut reader = Reader::from_str(xml);

    // Local names of the currently open elements, outermost first.
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;

    let mut name: Option<String> = None;
    let mut name_seen = false;
    let mut points: Vec<GeoPoint> = Vec::new();
    let mut pending: Option<PendingPoint> = None;
    let mut skipped = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                enter_element(&open, &mut seen_root)?;
                match e.local_name().as_ref() {
                    b"trkpt" => {
                        let point = read_point(&e, opts.invalid_points)?;
                        if point.is_none() {
                            skipped += 1;
                        }
                        pending = Some(PendingPoint {
                            point,
                            ele_seen: false,
                            time_seen: false,
                        });
                    }
                    b"ele" if pending.as_ref().is_some_and(|p| !p.ele_seen) => {
                        let text = read_text_owned(&mut reader, &e)?;
                        if let Some(p) = pending.as_mut() {
                            set_elevation(p, &text);
                        }
                        continue;
                    }
                    b"time" if pending.as_ref().is_some_and(|p| !p.time_seen) => {
                        let text = read_text_owned(&mut reader, &e)?;
                        if let Some(p) = pending.as_mut() {
                            set_time(p, &text);
                        }
                        continue;
                    }
                    b"name" if !name_seen && parent_is(&open, b"trk") => {
                        name_seen = true;
                        name = non_empty(&read_text_owned(&mut reader, &e)?);
                        continue;
                    }
                    _ => {}
                }
                open.push(e.local_name().as_ref().to_vec());
            }
            Ok(Event::Empty(e)) => {
                enter_element(&open, &mut seen_root)?;
                match e.local_name().as_ref() {
                    b"trkpt" => match read_point(&e, opts.invalid_points)? {
                        Some(point) => points.push(point),
                        None => skipped += 1,
                    },
                    b"ele" => {
                        if let Some(p) = pending.as_mut().filter(|p| !p.ele_seen) {
                            set_elevation(p, "");
                        }
                    }
                    b"time" => {
                        if let Some(p) = pending.as_mut().filter(|p| !p.time_seen) {
                            set_time(p, "");
                        }
                    }
                    b"name" if !name_seen && parent_is(&open, b"trk") => name_seen = true,
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                let closed = open
                    .pop()
                    .ok_or(FormatError::Malformed("unexpected closing tag"))?;
                if closed == b"trkpt" {
                    if let Some(point) = pending.take().and_then(|p| p.point) {
                        points.push(point);
                    }
                }
            }
            Ok(Event::Text(e)) if open.is_empty() => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(FormatError::Malformed("content outside the root element"));
                }
            }
            Ok(Event::CData(_) | Event::GeneralRef(_)) if open.is_empty() => {
                return Err(FormatError::Malformed("content outside the root element"));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FormatError::Xml(e)),
            _ => {}
        }
    }

    if !seen_root {
        return Err(FormatError::Malformed("no root element"));
    }
    if !open.is_empty() {
        return Err(FormatError::Malformed("unclosed element at end of input"));
    }

    tracing::debug!(
        points = points.len(),
        skipped,
        name = name.as_deref().unwrap_or_default(),
        "parsed track"
    );

    Track::new(name, points)
}

/// Enforce a single root element before opening a new one.
fn enter_element(open: &[Vec<u8>], seen_root: &mut bool) -> Result<()> {
    if open.is_empty() {
        if *seen_root {
            return Err(FormatError::Malformed("multiple root elements"));
        }
        *seen_root = true;
    }
    Ok(())
}

fn parent_is(open: &[Vec<u8>], local_name: &[u8]) -> bool {
    open.last().is_some_and(|n| n.as_slice() == local_name)
}

/// Read the coordinates of a `<trkpt>`, applying `policy` to bad ones.
fn read_point(e: &BytesStart<'_>, policy: InvalidPointPolicy) -> Result<Option<GeoPoint>> {
    match parse_lat_lon(e) {
        Ok((lat, lon)) => Ok(Some(GeoPoint::new(lat, lon))),
        Err(
            err @ (FormatError::MissingCoordinate { .. } | FormatError::InvalidCoordinate { .. }),
        ) => match policy {
            InvalidPointPolicy::Reject => Err(err),
            InvalidPointPolicy::Skip => {
                tracing::warn!("Skipping track point: {err}");
                Ok(None)
            }
        },
        Err(err) => Err(err),
    }
}

/// Parse lat/lon attributes from a point element's start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        match attr.key.local_name().as_ref() {
            b"lat" => {
                let val = attr.unescape_value().map_err(|e| FormatError::Xml(e.into()))?;
                lat = Some(parse_degrees(&val, "lat", 90.0)?);
            }
            b"lon" => {
                let val = attr.unescape_value().map_err(|e| FormatError::Xml(e.into()))?;
                lon = Some(parse_degrees(&val, "lon", 180.0)?);
            }
            _ => {}
        }
    }

    let lat = lat.ok_or(FormatError::MissingCoordinate { attribute: "lat" })?;
    let lon = lon.ok_or(FormatError::MissingCoordinate { attribute: "lon" })?;
    debug_assert!(is_valid_coordinate(lat, lon));

    Ok((lat, lon))
}

fn parse_degrees(val: &str, attribute: &'static str, limit: f64) -> Result<f64> {
    val.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(|| FormatError::InvalidCoordinate {
            attribute,
            value: val.to_string(),
        })
}

fn set_elevation(p: &mut PendingPoint, text: &str) {
    p.ele_seen = true;
    if let Some(point) = p.point.as_mut() {
        point.elevation = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    }
}

fn set_time(p: &mut PendingPoint, text: &str) {
    p.time_seen = true;
    if let Some(point) = p.point.as_mut() {
        point.timestamp = non_empty(text);
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
/// Text of nested elements is included, as with DOM `textContent`.
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();
    // Open descendants sharing the start tag's name.
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(std::str::from_utf8(&e).unwrap_or_default());
            }
            Ok(Event::CData(e)) => {
                text.push_str(std::str::from_utf8(&e).unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(&e).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => return Err(FormatError::Malformed("undefined entity reference")),
                    }
                }
            }
            Ok(Event::Start(e)) if e.name().0 == end_name.as_slice() => depth += 1,
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => {
                return Err(FormatError::Malformed("unclosed element at end of input"));
            }
            Err(e) => return Err(FormatError::Xml(e)),
            _ => {}
        }
    }

    Ok(text)
}
