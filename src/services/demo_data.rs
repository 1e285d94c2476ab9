//! Deterministic demo dataset: a small downtown grid with zones,
//! blocks, time slots and signs, for exercising the export pipeline
//! without surveyed data.

use crate::db::models::{
    NewCityStateCode, NewMapCoordinates, NewSign, NewStreetBlock, NewTimeSlot, NewZone,
};
use crate::services::store;
use bigdecimal::BigDecimal;
use diesel::PgConnection;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const BASE_LAT: f64 = 44.9778;
const BASE_LNG: f64 = -93.2650;
const GRID_STEP: f64 = 0.0016;

const STREET_NAMES: [&str; 6] = [
    "Hennepin Ave",
    "Nicollet Mall",
    "Washington Ave",
    "1st Ave N",
    "Marquette Ave",
    "3rd St S",
];

// (label, zonetype, fillcolorrgb, strokecolorrgb, priority)
const ZONE_SPECS: [(&str, &str, &str, &str, i16); 4] = [
    ("Warehouse District", "Commercial", "255,165,0", "255,140,0", 1),
    ("Mill District", "Residential", "0,255,255", "0,128,128", 2),
    ("Government Plaza", "No Parking", "255,0,0", "139,0,0", 3),
    ("Riverfront", "Metered", "0,255,0", "0,100,0", 1),
];

const RESTRICTIONS: [&str; 5] = [
    "2HR PARKING",
    "NO PARKING",
    "PERMIT ONLY",
    "1HR PARKING",
    "NO STOPPING",
];

const WEEKDAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];

pub fn run(conn: &mut PgConnection) -> Result<(), String> {
    if !store::all_zones(conn)?.is_empty() {
        info!("Demo data: zones already present, skipping seed");
        return Ok(());
    }

    let mut rng = SmallRng::seed_from_u64(0x5147_4E50_4152_4Bu64);

    let csc = store::insert_city_state_code(
        conn,
        &NewCityStateCode {
            city: "Minneapolis".to_string(),
            state: "Minnesota".to_string(),
            zipcode: 55401,
        },
    )?;

    // Zones with a rectangular outline each, offset along the grid.
    let mut zone_ids = Vec::with_capacity(ZONE_SPECS.len());
    for (index, (label, zonetype, fill, stroke, priority)) in ZONE_SPECS.iter().enumerate() {
        let zone = store::insert_zone(
            conn,
            &NewZone {
                priority: Some(*priority),
                fillcolorrgb: (*fill).to_string(),
                strokecolorrgb: (*stroke).to_string(),
                zonetype: Some((*zonetype).to_string()),
                label: Some((*label).to_string()),
            },
        )?;
        let west = BASE_LNG + index as f64 * 2.0 * GRID_STEP;
        let corners = [
            (BASE_LAT, west),
            (BASE_LAT, west + GRID_STEP),
            (BASE_LAT + GRID_STEP, west + GRID_STEP),
            (BASE_LAT + GRID_STEP, west),
        ];
        for (ordinal, (lat, lng)) in corners.iter().enumerate() {
            store::insert_coordinates(
                conn,
                &NewMapCoordinates {
                    zone_id: Some(zone.id),
                    block_id: None,
                    lat: decimal(*lat)?,
                    lng: decimal(*lng)?,
                    ordinal: ordinal as i16,
                },
            )?;
        }
        zone_ids.push(zone.id);
    }

    // One block per street, alternating odd/even addressing.
    let mut block_ids = Vec::with_capacity(STREET_NAMES.len());
    for (index, street) in STREET_NAMES.iter().enumerate() {
        let low = 100 * (index + 1);
        let block = store::insert_street_block(
            conn,
            &NewStreetBlock {
                addresshigh: (low + 99).to_string(),
                addresslow: low.to_string(),
                tigerlineid: 106_000_000 + index as i64,
                side: Some(if index % 2 == 0 { "N" } else { "S" }.to_string()),
                name: (*street).to_string(),
                csc_id: Some(csc.id),
                odd_bool: index % 2 == 1,
            },
        )?;
        block_ids.push(block.id);
    }

    // A sign per block: restriction, day window, position mid-block.
    let mut sign_count = 0usize;
    for (index, block_id) in block_ids.iter().enumerate() {
        let restriction = RESTRICTIONS[rng.random_range(0..RESTRICTIONS.len())];
        let day = WEEKDAYS[rng.random_range(0..WEEKDAYS.len())];

        let primary = store::insert_time_slot(
            conn,
            &NewTimeSlot {
                days: vec![day.to_string()],
                timestart: Some(800),
                timeend: Some(1100),
                alttimestart: None,
                alttimeend: None,
            },
        )?;
        let cleaning = if rng.random_bool(0.5) {
            Some(store::insert_time_slot(
                conn,
                &NewTimeSlot {
                    days: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
                    timestart: Some(1600),
                    timeend: Some(1800),
                    alttimestart: Some(2200),
                    alttimeend: Some(2359),
                },
            )?)
        } else {
            None
        };

        let pos = store::insert_coordinates(
            conn,
            &NewMapCoordinates {
                zone_id: None,
                block_id: Some(*block_id),
                lat: decimal(BASE_LAT + index as f64 * GRID_STEP / 2.0)?,
                lng: decimal(BASE_LNG + GRID_STEP / 2.0)?,
                ordinal: 0,
            },
        )?;

        let sign = store::insert_sign(
            conn,
            &NewSign {
                restriction: restriction.to_string(),
                timelimit: Some(if restriction == "2HR PARKING" { 120 } else { 0 }),
                rawtext: format!("{} {}", restriction, day.to_uppercase()),
                permitexempt_bool: restriction == "PERMIT ONLY",
                holiday_bool: rng.random_bool(0.3),
                photo_id: None,
                timeslotone_id: Some(primary.id),
                timeslottwo_id: cleaning.map(|s| s.id),
                timeslotthree_id: None,
                zone_id: Some(zone_ids[index % zone_ids.len()]),
                pos_id: Some(pos.id),
            },
        )?;
        store::attach_block(conn, sign.id, *block_id)?;
        // corner signs cover the cross street too
        if index + 1 < block_ids.len() && rng.random_bool(0.4) {
            store::attach_block(conn, sign.id, block_ids[index + 1])?;
        }
        sign_count += 1;
    }

    info!(
        "Demo data: seeded {} zone(s), {} block(s), {} sign(s)",
        zone_ids.len(),
        block_ids.len(),
        sign_count
    );
    Ok(())
}

fn decimal(value: f64) -> Result<BigDecimal, String> {
    format!("{:.6}", value)
        .parse::<BigDecimal>()
        .map_err(|e| format!("coordinate {} not representable: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::decimal;

    #[test]
    fn decimal_keeps_six_fractional_digits() {
        let d = decimal(44.9778).unwrap();
        assert_eq!(d.to_string(), "44.977800");
        assert!(decimal(-93.265).is_ok());
    }
}
