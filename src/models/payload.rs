//! Serialized map payload types consumed by the front-end map layer.
//!
//! Field names here (`c`, `d`, `s`, `f`, `p`, `t`, `e`) are part of the
//! stored/consumed JSON contract and must not be renamed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stroke/fill styling and priority for one zone, the `d` part of a
/// zone feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStyle {
    /// Stroke color, comma-separated RGB triple.
    pub s: String,
    /// Fill color, comma-separated RGB triple.
    pub f: String,
    /// Draw priority, higher wins.
    pub p: Option<i16>,
}

/// One zone as the map layer consumes it: the polygon coordinates `c`
/// (empty until populated from `map_coordinates`) and the styling `d`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneFeature {
    pub c: Vec<LatLng>,
    pub d: ZoneStyle,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A start/end time-of-day range (HHMM-packed integers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub s: i16,
    pub e: i16,
}

/// Serialized view of a time slot: day list plus the non-empty ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotPayload {
    pub d: Vec<String>,
    pub t: Vec<TimeRange>,
}

/// Export record for one sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignExport {
    pub id: i64,
    pub restriction: String,
    pub timelimit: Option<i32>,
    pub permit_exempt: bool,
    pub holiday_exempt: bool,
    pub zone_id: Option<i64>,
    pub pos: Option<LatLng>,
    pub times: Vec<TimeSlotPayload>,
    pub blocks: Vec<i64>,
}

/// The full map export: zone features keyed by zone id, plus all signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    pub zones: BTreeMap<i64, ZoneFeature>,
    pub signs: Vec<SignExport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zone_feature_json_shape() {
        let feature = ZoneFeature {
            c: vec![LatLng { lat: 44.97, lng: -93.26 }],
            d: ZoneStyle {
                s: "0,255,255".to_string(),
                f: "255,0,0".to_string(),
                p: Some(2),
            },
        };
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(
            value,
            json!({
                "c": [{"lat": 44.97, "lng": -93.26}],
                "d": {"s": "0,255,255", "f": "255,0,0", "p": 2}
            })
        );
    }

    #[test]
    fn zone_map_keys_on_id() {
        let mut zones = BTreeMap::new();
        zones.insert(
            7i64,
            ZoneFeature {
                c: Vec::new(),
                d: ZoneStyle {
                    s: "0,255,255".to_string(),
                    f: "0,255,255".to_string(),
                    p: None,
                },
            },
        );
        let value = serde_json::to_value(&zones).unwrap();
        assert!(value.get("7").is_some());
    }

    #[test]
    fn time_slot_payload_json_shape() {
        let payload = TimeSlotPayload {
            d: vec!["monday".to_string(), "tuesday".to_string()],
            t: vec![TimeRange { s: 800, e: 1100 }],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"d": ["monday", "tuesday"], "t": [{"s": 800, "e": 1100}]})
        );
    }
}
