//! Diesel model structs for the parking map entities.
//!
//! Important: FK nullability and ON DELETE behavior (cascade vs set
//! null) live in the migrations; the structs here mirror the columns
//! exactly. Serialization helpers produce the payload types in
//! `models::payload`.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use core::fmt;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::models::payload::{LatLng, TimeRange, TimeSlotPayload, ZoneFeature, ZoneStyle};
use crate::schema;
use crate::utils::{ensure_non_negative, validate_color_list, validate_days, ValidationError};

/// Logical path prefix under which photo image files are stored. The
/// database keeps only the reference; the files live elsewhere.
pub const PHOTO_UPLOAD_PREFIX: &str = "maps/photos/signs";

pub const DEFAULT_COLOR_RGB: &str = "0,255,255";

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::city_state_codes)]
pub struct CityStateCode {
    pub id: i64,
    pub city: String,
    pub state: String,
    pub zipcode: i64,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::city_state_codes)]
pub struct NewCityStateCode {
    pub city: String,
    pub state: String,
    pub zipcode: i64,
}

impl NewCityStateCode {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("zipcode", self.zipcode)
    }
}

impl Display for CityStateCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} ({})", self.city, self.state, self.zipcode)
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::zones)]
pub struct Zone {
    pub id: i64,
    pub priority: Option<i16>,
    pub fillcolorrgb: String,
    pub strokecolorrgb: String,
    pub zonetype: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::zones)]
pub struct NewZone {
    pub priority: Option<i16>,
    pub fillcolorrgb: String,
    pub strokecolorrgb: String,
    pub zonetype: Option<String>,
    pub label: Option<String>,
}

impl Default for NewZone {
    fn default() -> Self {
        NewZone {
            priority: None,
            fillcolorrgb: DEFAULT_COLOR_RGB.to_string(),
            strokecolorrgb: DEFAULT_COLOR_RGB.to_string(),
            zonetype: None,
            label: None,
        }
    }
}

impl NewZone {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_color_list("fillcolorrgb", &self.fillcolorrgb)?;
        validate_color_list("strokecolorrgb", &self.strokecolorrgb)?;
        if let Some(p) = self.priority {
            ensure_non_negative("priority", p)?;
        }
        Ok(())
    }
}

impl Zone {
    /// Serialized view keyed by the zone's identifier. The coordinate
    /// list `c` is left empty here; the export layer fills it from the
    /// zone's `map_coordinates` rows in order-index order.
    pub fn serialize(&self) -> BTreeMap<i64, ZoneFeature> {
        let data = ZoneStyle {
            s: self.strokecolorrgb.clone(),
            f: self.fillcolorrgb.clone(),
            p: self.priority,
        };
        BTreeMap::from([(self.id, ZoneFeature { c: Vec::new(), d: data })])
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.zonetype.as_deref().unwrap_or("None"))
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::photos)]
pub struct Photo {
    pub id: i64,
    pub rawtext: Option<String>,
    pub image: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::photos)]
pub struct NewPhoto {
    pub rawtext: Option<String>,
    pub image: String,
    pub pub_date: DateTime<Utc>,
}

impl NewPhoto {
    /// Build a photo reference under the fixed upload prefix.
    pub fn new(image_name: &str, pub_date: DateTime<Utc>) -> Self {
        NewPhoto {
            rawtext: None,
            image: format!("{}/{}", PHOTO_UPLOAD_PREFIX, image_name),
            pub_date,
        }
    }
}

impl Display for Photo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.image)
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::street_blocks)]
#[diesel(belongs_to(CityStateCode, foreign_key = csc_id))]
pub struct StreetBlock {
    pub id: i64,
    pub addresshigh: String,
    pub addresslow: String,
    pub tigerlineid: i64,
    pub side: Option<String>,
    pub name: String,
    pub csc_id: Option<i64>,
    pub odd_bool: bool,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::street_blocks)]
pub struct NewStreetBlock {
    pub addresshigh: String,
    pub addresslow: String,
    pub tigerlineid: i64,
    pub side: Option<String>,
    pub name: String,
    pub csc_id: Option<i64>,
    pub odd_bool: bool,
}

impl Default for NewStreetBlock {
    fn default() -> Self {
        NewStreetBlock {
            addresshigh: "0".to_string(),
            addresslow: "0".to_string(),
            tigerlineid: 0,
            side: None,
            name: "main".to_string(),
            csc_id: None,
            odd_bool: false,
        }
    }
}

impl NewStreetBlock {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("tigerlineid", self.tigerlineid)
    }
}

impl StreetBlock {
    /// Composed address line. The city/state/zip segment requires the
    /// referenced CityStateCode; with the reference nulled (or never
    /// set) only the address range and street name are rendered.
    pub fn address_line(&self, csc: Option<&CityStateCode>) -> String {
        match csc {
            Some(c) => format!(
                "{}-{} {}, {}, {}({})",
                self.addresshigh, self.addresslow, self.name, c.city, c.state, c.zipcode
            ),
            None => format!("{}-{} {}", self.addresshigh, self.addresslow, self.name),
        }
    }
}

impl Display for StreetBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_line(None))
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::map_coordinates)]
#[diesel(belongs_to(Zone))]
#[diesel(belongs_to(StreetBlock, foreign_key = block_id))]
pub struct MapCoordinates {
    pub id: i64,
    pub zone_id: Option<i64>,
    pub block_id: Option<i64>,
    pub lat: BigDecimal,
    pub lng: BigDecimal,
    pub ordinal: i16,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::map_coordinates)]
pub struct NewMapCoordinates {
    pub zone_id: Option<i64>,
    pub block_id: Option<i64>,
    pub lat: BigDecimal,
    pub lng: BigDecimal,
    pub ordinal: i16,
}

impl Default for NewMapCoordinates {
    fn default() -> Self {
        NewMapCoordinates {
            zone_id: None,
            block_id: None,
            lat: BigDecimal::from(0),
            lng: BigDecimal::from(0),
            ordinal: 0,
        }
    }
}

impl NewMapCoordinates {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("order", self.ordinal)
    }
}

impl MapCoordinates {
    /// The point as a plain lat/lng pair.
    pub fn as_pair(&self) -> LatLng {
        LatLng {
            lat: self.lat.to_f64().unwrap_or_default(),
            lng: self.lng.to_f64().unwrap_or_default(),
        }
    }
}

impl Display for MapCoordinates {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{} - ({}, {})", self.ordinal, self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::time_slots)]
pub struct TimeSlot {
    pub id: i64,
    pub days: Vec<String>,
    pub timestart: Option<i16>,
    pub timeend: Option<i16>,
    pub alttimestart: Option<i16>,
    pub alttimeend: Option<i16>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::time_slots)]
pub struct NewTimeSlot {
    pub days: Vec<String>,
    pub timestart: Option<i16>,
    pub timeend: Option<i16>,
    pub alttimestart: Option<i16>,
    pub alttimeend: Option<i16>,
}

impl Default for NewTimeSlot {
    fn default() -> Self {
        NewTimeSlot {
            days: vec!["everyday".to_string()],
            timestart: None,
            timeend: None,
            alttimestart: None,
            alttimeend: None,
        }
    }
}

impl NewTimeSlot {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_days(&self.days)?;
        for (field, value) in [
            ("timestart", self.timestart),
            ("timeend", self.timeend),
            ("alttimestart", self.alttimestart),
            ("alttimeend", self.alttimeend),
        ] {
            if let Some(v) = value {
                ensure_non_negative(field, v)?;
            }
        }
        Ok(())
    }
}

impl TimeSlot {
    /// True if any of the given day names (case-insensitively) is in
    /// this slot's day list. The stored list is not normalized, so
    /// stored days must be lowercase for the match to behave as
    /// intended. `_hour` is accepted for signature compatibility but
    /// unused; matching is day-granular.
    pub fn applies(&self, days: &[&str], _hour: i16) -> bool {
        days.iter().any(|day| self.days.contains(&day.to_lowercase()))
    }

    /// Day list plus the non-empty time ranges. A range is emitted only
    /// when both endpoints are set and non-zero; a zero endpoint is
    /// indistinguishable from "unset" and drops the range.
    pub fn serialize(&self) -> TimeSlotPayload {
        let mut times = Vec::new();
        for (start, end) in [(self.timestart, self.timeend), (self.alttimestart, self.alttimeend)] {
            if let (Some(s), Some(e)) = (start, end) {
                if s != 0 && e != 0 {
                    times.push(TimeRange { s, e });
                }
            }
        }
        TimeSlotPayload {
            d: self.days.clone(),
            t: times,
        }
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let days = self
            .days
            .iter()
            .filter_map(|d| d.chars().next())
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let fmt_time = |t: Option<i16>| t.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        let mut times = format!("{}-{}", fmt_time(self.timestart), fmt_time(self.timeend));
        if let (Some(s), Some(e)) = (self.alttimestart, self.alttimeend) {
            times.push_str(&format!(", {}-{}", s, e));
        }
        write!(f, "{} ({})", days, times)
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::signs)]
#[diesel(belongs_to(Photo))]
#[diesel(belongs_to(Zone))]
#[diesel(belongs_to(MapCoordinates, foreign_key = pos_id))]
pub struct Sign {
    pub id: i64,
    pub restriction: String,
    pub timelimit: Option<i32>,
    pub rawtext: String,
    pub permitexempt_bool: bool,
    pub holiday_bool: bool,
    pub photo_id: Option<i64>,
    pub timeslotone_id: Option<i64>,
    pub timeslottwo_id: Option<i64>,
    pub timeslotthree_id: Option<i64>,
    pub zone_id: Option<i64>,
    pub pos_id: Option<i64>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::signs)]
pub struct NewSign {
    pub restriction: String,
    pub timelimit: Option<i32>,
    pub rawtext: String,
    pub permitexempt_bool: bool,
    pub holiday_bool: bool,
    pub photo_id: Option<i64>,
    pub timeslotone_id: Option<i64>,
    pub timeslottwo_id: Option<i64>,
    pub timeslotthree_id: Option<i64>,
    pub zone_id: Option<i64>,
    pub pos_id: Option<i64>,
}

impl Default for NewSign {
    fn default() -> Self {
        NewSign {
            restriction: "No".to_string(),
            timelimit: Some(0),
            rawtext: String::new(),
            permitexempt_bool: false,
            holiday_bool: false,
            photo_id: None,
            timeslotone_id: None,
            timeslottwo_id: None,
            timeslotthree_id: None,
            zone_id: None,
            pos_id: None,
        }
    }
}

impl NewSign {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(limit) = self.timelimit {
            ensure_non_negative("timelimit", limit)?;
        }
        Ok(())
    }
}

impl Sign {
    /// Human-readable label: zone type plus restriction code. With no
    /// zone attached the zone segment renders empty.
    pub fn label(&self, zone: Option<&Zone>) -> String {
        format!(
            "{} ({}).",
            zone.and_then(|z| z.zonetype.as_deref()).unwrap_or(""),
            self.restriction
        )
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label(None))
    }
}

/// Join row for the Sign <-> StreetBlock many-to-many relation.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Insertable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::sign_blocks)]
#[diesel(primary_key(sign_id, block_id))]
#[diesel(belongs_to(Sign))]
#[diesel(belongs_to(StreetBlock, foreign_key = block_id))]
pub struct SignBlock {
    pub sign_id: i64,
    pub block_id: i64,
}

/// A sign together with its up to three time slots, resolved in
/// declared order (slot one, two, three).
#[derive(Debug, Clone)]
pub struct SignWithSlots {
    pub sign: Sign,
    pub slots: [Option<TimeSlot>; 3],
}

impl SignWithSlots {
    /// True if any attached slot reports true for the given days;
    /// short-circuits on the first match, false with no slots attached.
    pub fn applies(&self, days: &[&str], hour: i16) -> bool {
        self.slots.iter().flatten().any(|slot| slot.applies(days, hour))
    }

    /// Serialized forms of the attached slots, unattached slots
    /// skipped, declared order preserved.
    pub fn times_serialized(&self) -> Vec<TimeSlotPayload> {
        self.slots.iter().flatten().map(TimeSlot::serialize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: i64) -> Zone {
        Zone {
            id,
            priority: Some(2),
            fillcolorrgb: "255,0,0".to_string(),
            strokecolorrgb: "0,255,255".to_string(),
            zonetype: Some("Residential".to_string()),
            label: Some("Near North".to_string()),
        }
    }

    fn slot(days: &[&str], start: Option<i16>, end: Option<i16>) -> TimeSlot {
        TimeSlot {
            id: 1,
            days: days.iter().map(|d| d.to_string()).collect(),
            timestart: start,
            timeend: end,
            alttimestart: None,
            alttimeend: None,
        }
    }

    fn sign() -> Sign {
        Sign {
            id: 10,
            restriction: "2HR PARKING".to_string(),
            timelimit: Some(120),
            rawtext: String::new(),
            permitexempt_bool: false,
            holiday_bool: false,
            photo_id: None,
            timeslotone_id: None,
            timeslottwo_id: None,
            timeslotthree_id: None,
            zone_id: None,
            pos_id: None,
        }
    }

    #[test]
    fn zone_serialize_keys_on_id() {
        let z = zone(7);
        let map = z.serialize();
        assert_eq!(map.len(), 1);
        let feature = map.get(&7).expect("keyed by zone id");
        assert!(feature.c.is_empty());
        assert_eq!(feature.d.s, "0,255,255");
        assert_eq!(feature.d.f, "255,0,0");
        assert_eq!(feature.d.p, Some(2));
    }

    #[test]
    fn coordinates_as_pair() {
        let point = MapCoordinates {
            id: 1,
            zone_id: None,
            block_id: None,
            lat: "44.977800".parse().unwrap(),
            lng: "-93.265000".parse().unwrap(),
            ordinal: 3,
        };
        let pair = point.as_pair();
        assert!((pair.lat - 44.9778).abs() < 1e-9);
        assert!((pair.lng + 93.265).abs() < 1e-9);
        assert_eq!(point.to_string(), "#3 - (44.977800, -93.265000)");
    }

    #[test]
    fn slot_applies_lowercases_input_only() {
        let monday = slot(&["monday"], None, None);
        assert!(monday.applies(&["Monday"], 9));
        assert!(monday.applies(&["saturday", "MONDAY"], 0));
        assert!(!monday.applies(&["tuesday"], 9));

        let tuesday = slot(&["tuesday"], None, None);
        assert!(!tuesday.applies(&["Monday"], 9));

        // stored days are not normalized, so a stored mixed-case day
        // never matches
        let stored_upper = slot(&["Monday"], None, None);
        assert!(!stored_upper.applies(&["monday"], 9));
    }

    #[test]
    fn slot_serialize_includes_complete_ranges_only() {
        let s = TimeSlot {
            id: 2,
            days: vec!["everyday".to_string()],
            timestart: Some(800),
            timeend: Some(1100),
            alttimestart: Some(1600),
            alttimeend: Some(1800),
        };
        let payload = s.serialize();
        assert_eq!(payload.d, vec!["everyday"]);
        assert_eq!(
            payload.t,
            vec![TimeRange { s: 800, e: 1100 }, TimeRange { s: 1600, e: 1800 }]
        );
    }

    #[test]
    fn slot_serialize_drops_zero_and_unset_ranges() {
        // zero endpoints are treated as unset
        let zero_start = slot(&["monday"], Some(0), Some(1100));
        assert!(zero_start.serialize().t.is_empty());

        let missing_end = slot(&["monday"], Some(800), None);
        assert!(missing_end.serialize().t.is_empty());

        let unset = slot(&["monday"], None, None);
        assert!(unset.serialize().t.is_empty());
    }

    #[test]
    fn sign_applies_across_slots() {
        let mut with_slots = SignWithSlots {
            sign: sign(),
            slots: [None, None, None],
        };
        assert!(!with_slots.applies(&["monday"], 9));

        with_slots.slots[1] = Some(slot(&["monday"], Some(800), Some(1100)));
        assert!(with_slots.applies(&["Monday"], 9));
        assert!(!with_slots.applies(&["friday"], 9));

        with_slots.slots[2] = Some(slot(&["friday"], None, None));
        assert!(with_slots.applies(&["friday"], 9));
    }

    #[test]
    fn sign_times_preserve_declared_order() {
        let with_slots = SignWithSlots {
            sign: sign(),
            slots: [
                None,
                Some(slot(&["monday"], Some(800), Some(1100))),
                Some(slot(&["friday"], Some(900), Some(1700))),
            ],
        };
        let times = with_slots.times_serialized();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0].d, vec!["monday"]);
        assert_eq!(times[1].d, vec!["friday"]);
    }

    #[test]
    fn sign_label_with_and_without_zone() {
        let s = sign();
        let z = zone(7);
        assert_eq!(s.label(Some(&z)), "Residential (2HR PARKING).");
        assert_eq!(s.label(None), " (2HR PARKING).");
        assert_eq!(s.to_string(), " (2HR PARKING).");
    }

    #[test]
    fn block_address_line_guards_missing_reference() {
        let block = StreetBlock {
            id: 4,
            addresshigh: "399".to_string(),
            addresslow: "301".to_string(),
            tigerlineid: 106_062_339,
            side: Some("N".to_string()),
            name: "Hennepin Ave".to_string(),
            csc_id: Some(1),
            odd_bool: true,
        };
        let csc = CityStateCode {
            id: 1,
            city: "Minneapolis".to_string(),
            state: "Minnesota".to_string(),
            zipcode: 55401,
        };
        assert_eq!(
            block.address_line(Some(&csc)),
            "399-301 Hennepin Ave, Minneapolis, Minnesota(55401)"
        );
        assert_eq!(block.address_line(None), "399-301 Hennepin Ave");
        assert_eq!(csc.to_string(), "Minneapolis, Minnesota (55401)");
    }

    #[test]
    fn slot_display_initials_and_ranges() {
        let s = TimeSlot {
            id: 3,
            days: vec!["monday".to_string(), "wednesday".to_string()],
            timestart: Some(800),
            timeend: Some(1100),
            alttimestart: None,
            alttimeend: None,
        };
        assert_eq!(s.to_string(), "m,w (800-1100)");

        let unset = slot(&["everyday"], None, None);
        assert_eq!(unset.to_string(), "e (---)");
    }

    #[test]
    fn new_row_defaults_match_schema() {
        let z = NewZone::default();
        assert_eq!(z.fillcolorrgb, DEFAULT_COLOR_RGB);
        assert_eq!(z.strokecolorrgb, DEFAULT_COLOR_RGB);
        assert!(z.validate().is_ok());

        let b = NewStreetBlock::default();
        assert_eq!(b.name, "main");
        assert_eq!(b.addresshigh, "0");
        assert!(!b.odd_bool);

        let t = NewTimeSlot::default();
        assert_eq!(t.days, vec!["everyday"]);

        let s = NewSign::default();
        assert_eq!(s.restriction, "No");
        assert_eq!(s.timelimit, Some(0));
    }

    #[test]
    fn validation_rejects_bad_writes() {
        let mut z = NewZone::default();
        z.fillcolorrgb = "0,teal,255".to_string();
        assert!(z.validate().is_err());

        let mut t = NewTimeSlot::default();
        t.timestart = Some(-5);
        assert!(t.validate().is_err());

        let csc = NewCityStateCode {
            city: "Anytown".to_string(),
            state: "Delaware".to_string(),
            zipcode: -1,
        };
        assert!(csc.validate().is_err());
    }

    #[test]
    fn photo_reference_uses_upload_prefix() {
        let p = NewPhoto::new("sign_042.jpg", Utc::now());
        assert_eq!(p.image, "maps/photos/signs/sign_042.jpg");
    }
}
