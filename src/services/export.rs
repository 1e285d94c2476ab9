//! Builds the map payload the front-end layer renders: zone features
//! keyed by zone id with their polygon coordinates filled in, plus one
//! export record per sign.

use crate::db::models as dbm;
use crate::models::payload::{MapExport, SignExport, ZoneFeature};
use crate::services::store;
use diesel::PgConnection;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Assemble the full export from the database.
pub fn build(conn: &mut PgConnection) -> Result<MapExport, String> {
    let zones = zone_features(conn)?;
    let signs = sign_exports(conn)?;
    Ok(MapExport { zones, signs })
}

/// Every zone's serialized form, with the `c` list populated from the
/// zone's coordinates in order-index order.
fn zone_features(conn: &mut PgConnection) -> Result<BTreeMap<i64, ZoneFeature>, String> {
    let mut features = BTreeMap::new();
    for zone in store::all_zones(conn)? {
        let mut serialized = zone.serialize();
        let points = store::zone_coordinates(conn, zone.id)?;
        if let Some(feature) = serialized.get_mut(&zone.id) {
            feature.c = points.iter().map(dbm::MapCoordinates::as_pair).collect();
        }
        debug!("Export: zone {} ({} point(s))", zone, points.len());
        features.append(&mut serialized);
    }
    Ok(features)
}

fn sign_exports(conn: &mut PgConnection) -> Result<Vec<SignExport>, String> {
    let mut exports = Vec::new();
    for sign in store::all_signs(conn)? {
        let pos = match sign.pos_id {
            Some(id) => store::get_coordinates(conn, id)?.map(|p| p.as_pair()),
            None => None,
        };
        let blocks = store::blocks_for_sign(conn, sign.id)?;
        let view = store::load_sign_with_slots(conn, sign)?;
        exports.push(SignExport {
            id: view.sign.id,
            restriction: view.sign.restriction.clone(),
            timelimit: view.sign.timelimit,
            permit_exempt: view.sign.permitexempt_bool,
            holiday_exempt: view.sign.holiday_bool,
            zone_id: view.sign.zone_id,
            pos,
            times: view.times_serialized(),
            blocks,
        });
    }
    Ok(exports)
}

/// Build the export and write it as pretty JSON.
pub fn run(conn: &mut PgConnection, path: &Path) -> Result<(), String> {
    let export = build(conn)?;
    let json = serde_json::to_string_pretty(&export).map_err(|e| format!("serialize export failed: {}", e))?;
    fs::write(path, json).map_err(|e| format!("write {} failed: {}", path.display(), e))?;
    info!(
        "Export: wrote {} zone(s), {} sign(s) to {}",
        export.zones.len(),
        export.signs.len(),
        path.display()
    );
    Ok(())
}
