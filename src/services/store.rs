//! Validated CRUD over the parking map tables.
//!
//! Inserts validate before touching the database and return the
//! persisted row. Deletes are plain row deletes; the cascade/set-null
//! outcomes for dependent rows are enforced by the FK policies in the
//! migrations and observed through this layer.

use crate::db::models as dbm;
use crate::schema;
use diesel::prelude::*;
use diesel::PgConnection;

pub fn insert_city_state_code(
    conn: &mut PgConnection,
    row: &dbm::NewCityStateCode,
) -> Result<dbm::CityStateCode, String> {
    use schema::city_state_codes::dsl as C;
    row.validate().map_err(|e| format!("city/state/zip validation failed: {}", e))?;
    diesel::insert_into(C::city_state_codes)
        .values(row)
        .returning(dbm::CityStateCode::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert city_state_code failed: {}", e))
}

pub fn insert_zone(conn: &mut PgConnection, row: &dbm::NewZone) -> Result<dbm::Zone, String> {
    use schema::zones::dsl as Z;
    row.validate().map_err(|e| format!("zone validation failed: {}", e))?;
    diesel::insert_into(Z::zones)
        .values(row)
        .returning(dbm::Zone::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert zone failed: {}", e))
}

pub fn insert_photo(conn: &mut PgConnection, row: &dbm::NewPhoto) -> Result<dbm::Photo, String> {
    use schema::photos::dsl as P;
    diesel::insert_into(P::photos)
        .values(row)
        .returning(dbm::Photo::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert photo failed: {}", e))
}

pub fn insert_street_block(
    conn: &mut PgConnection,
    row: &dbm::NewStreetBlock,
) -> Result<dbm::StreetBlock, String> {
    use schema::street_blocks::dsl as B;
    row.validate().map_err(|e| format!("street block validation failed: {}", e))?;
    diesel::insert_into(B::street_blocks)
        .values(row)
        .returning(dbm::StreetBlock::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert street_block failed: {}", e))
}

pub fn insert_coordinates(
    conn: &mut PgConnection,
    row: &dbm::NewMapCoordinates,
) -> Result<dbm::MapCoordinates, String> {
    use schema::map_coordinates::dsl as M;
    row.validate().map_err(|e| format!("coordinate validation failed: {}", e))?;
    diesel::insert_into(M::map_coordinates)
        .values(row)
        .returning(dbm::MapCoordinates::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert map_coordinates failed: {}", e))
}

pub fn insert_time_slot(conn: &mut PgConnection, row: &dbm::NewTimeSlot) -> Result<dbm::TimeSlot, String> {
    use schema::time_slots::dsl as T;
    row.validate().map_err(|e| format!("time slot validation failed: {}", e))?;
    diesel::insert_into(T::time_slots)
        .values(row)
        .returning(dbm::TimeSlot::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert time_slot failed: {}", e))
}

pub fn insert_sign(conn: &mut PgConnection, row: &dbm::NewSign) -> Result<dbm::Sign, String> {
    use schema::signs::dsl as S;
    row.validate().map_err(|e| format!("sign validation failed: {}", e))?;
    diesel::insert_into(S::signs)
        .values(row)
        .returning(dbm::Sign::as_returning())
        .get_result(conn)
        .map_err(|e| format!("insert sign failed: {}", e))
}

/// Link a sign to a block it covers. Idempotent.
pub fn attach_block(conn: &mut PgConnection, sign_id: i64, block_id: i64) -> Result<(), String> {
    use schema::sign_blocks::dsl as SB;
    let link = dbm::SignBlock { sign_id, block_id };
    diesel::insert_into(SB::sign_blocks)
        .values(&link)
        .on_conflict((SB::sign_id, SB::block_id))
        .do_nothing()
        .execute(conn)
        .map_err(|e| format!("attach sign_block failed: {}", e))?;
    Ok(())
}

pub fn detach_block(conn: &mut PgConnection, sign_id: i64, block_id: i64) -> Result<usize, String> {
    use schema::sign_blocks::dsl as SB;
    diesel::delete(SB::sign_blocks.filter(SB::sign_id.eq(sign_id).and(SB::block_id.eq(block_id))))
        .execute(conn)
        .map_err(|e| format!("detach sign_block failed: {}", e))
}

/// Block ids covered by a sign, ascending.
pub fn blocks_for_sign(conn: &mut PgConnection, sign_id: i64) -> Result<Vec<i64>, String> {
    use schema::sign_blocks::dsl as SB;
    SB::sign_blocks
        .filter(SB::sign_id.eq(sign_id))
        .select(SB::block_id)
        .order(SB::block_id.asc())
        .load(conn)
        .map_err(|e| format!("load sign_blocks failed: {}", e))
}

/// A zone's polygon points in order-index order.
pub fn zone_coordinates(conn: &mut PgConnection, zone_id: i64) -> Result<Vec<dbm::MapCoordinates>, String> {
    use schema::map_coordinates::dsl as M;
    M::map_coordinates
        .filter(M::zone_id.eq(zone_id))
        .order(M::ordinal.asc())
        .select(dbm::MapCoordinates::as_select())
        .load(conn)
        .map_err(|e| format!("load zone coordinates failed: {}", e))
}

pub fn all_zones(conn: &mut PgConnection) -> Result<Vec<dbm::Zone>, String> {
    use schema::zones::dsl as Z;
    Z::zones
        .order(Z::id.asc())
        .select(dbm::Zone::as_select())
        .load(conn)
        .map_err(|e| format!("load zones failed: {}", e))
}

pub fn all_signs(conn: &mut PgConnection) -> Result<Vec<dbm::Sign>, String> {
    use schema::signs::dsl as S;
    S::signs
        .order(S::id.asc())
        .select(dbm::Sign::as_select())
        .load(conn)
        .map_err(|e| format!("load signs failed: {}", e))
}

pub fn get_sign(conn: &mut PgConnection, sign_id: i64) -> Result<Option<dbm::Sign>, String> {
    use schema::signs::dsl as S;
    S::signs
        .find(sign_id)
        .select(dbm::Sign::as_select())
        .first(conn)
        .optional()
        .map_err(|e| format!("fetch sign {} failed: {}", sign_id, e))
}

pub fn get_zone(conn: &mut PgConnection, zone_id: i64) -> Result<Option<dbm::Zone>, String> {
    use schema::zones::dsl as Z;
    Z::zones
        .find(zone_id)
        .select(dbm::Zone::as_select())
        .first(conn)
        .optional()
        .map_err(|e| format!("fetch zone {} failed: {}", zone_id, e))
}

pub fn get_street_block(conn: &mut PgConnection, block_id: i64) -> Result<Option<dbm::StreetBlock>, String> {
    use schema::street_blocks::dsl as B;
    B::street_blocks
        .find(block_id)
        .select(dbm::StreetBlock::as_select())
        .first(conn)
        .optional()
        .map_err(|e| format!("fetch street_block {} failed: {}", block_id, e))
}

pub fn get_coordinates(conn: &mut PgConnection, id: i64) -> Result<Option<dbm::MapCoordinates>, String> {
    use schema::map_coordinates::dsl as M;
    M::map_coordinates
        .find(id)
        .select(dbm::MapCoordinates::as_select())
        .first(conn)
        .optional()
        .map_err(|e| format!("fetch map_coordinates {} failed: {}", id, e))
}

fn get_time_slot(conn: &mut PgConnection, id: i64) -> Result<Option<dbm::TimeSlot>, String> {
    use schema::time_slots::dsl as T;
    T::time_slots
        .find(id)
        .select(dbm::TimeSlot::as_select())
        .first(conn)
        .optional()
        .map_err(|e| format!("fetch time_slot {} failed: {}", id, e))
}

/// Resolve a sign's slot references in declared order. A dangling
/// reference resolves to None rather than erroring; the FK policies
/// should make that unreachable.
pub fn load_sign_with_slots(conn: &mut PgConnection, sign: dbm::Sign) -> Result<dbm::SignWithSlots, String> {
    let mut slots = [None, None, None];
    for (i, slot_id) in [sign.timeslotone_id, sign.timeslottwo_id, sign.timeslotthree_id]
        .into_iter()
        .enumerate()
    {
        if let Some(id) = slot_id {
            slots[i] = get_time_slot(conn, id)?;
        }
    }
    Ok(dbm::SignWithSlots { sign, slots })
}

pub fn delete_city_state_code(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::city_state_codes::dsl as C;
    diesel::delete(C::city_state_codes.find(id))
        .execute(conn)
        .map_err(|e| format!("delete city_state_code {} failed: {}", id, e))
}

pub fn delete_zone(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::zones::dsl as Z;
    diesel::delete(Z::zones.find(id))
        .execute(conn)
        .map_err(|e| format!("delete zone {} failed: {}", id, e))
}

pub fn delete_photo(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::photos::dsl as P;
    diesel::delete(P::photos.find(id))
        .execute(conn)
        .map_err(|e| format!("delete photo {} failed: {}", id, e))
}

pub fn delete_time_slot(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::time_slots::dsl as T;
    diesel::delete(T::time_slots.find(id))
        .execute(conn)
        .map_err(|e| format!("delete time_slot {} failed: {}", id, e))
}

pub fn delete_coordinates(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::map_coordinates::dsl as M;
    diesel::delete(M::map_coordinates.find(id))
        .execute(conn)
        .map_err(|e| format!("delete map_coordinates {} failed: {}", id, e))
}

pub fn delete_street_block(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::street_blocks::dsl as B;
    diesel::delete(B::street_blocks.find(id))
        .execute(conn)
        .map_err(|e| format!("delete street_block {} failed: {}", id, e))
}

pub fn delete_sign(conn: &mut PgConnection, id: i64) -> Result<usize, String> {
    use schema::signs::dsl as S;
    diesel::delete(S::signs.find(id))
        .execute(conn)
        .map_err(|e| format!("delete sign {} failed: {}", id, e))
}
