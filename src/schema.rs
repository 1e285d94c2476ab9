//! Handwritten Diesel schema declarations used by model structs.
//!
//! Migrations define the actual tables, constraints and ON DELETE
//! policies. This module only provides `diesel::table!` declarations so
//! we can derive Insertable/Queryable in a type-safe way without
//! running `diesel print-schema`.

diesel::table! {
    city_state_codes (id) {
        id -> BigInt,
        city -> Text,
        state -> Text,
        zipcode -> BigInt,
    }
}

diesel::table! {
    zones (id) {
        id -> BigInt,
        priority -> Nullable<SmallInt>,
        fillcolorrgb -> Text,
        strokecolorrgb -> Text,
        zonetype -> Nullable<Text>,
        label -> Nullable<Text>,
    }
}

diesel::table! {
    photos (id) {
        id -> BigInt,
        rawtext -> Nullable<Text>,
        image -> Text,
        pub_date -> Timestamptz,
    }
}

diesel::table! {
    street_blocks (id) {
        id -> BigInt,
        addresshigh -> Text,
        addresslow -> Text,
        tigerlineid -> BigInt,
        side -> Nullable<Text>,
        name -> Text,
        csc_id -> Nullable<BigInt>,
        odd_bool -> Bool,
    }
}

diesel::table! {
    map_coordinates (id) {
        id -> BigInt,
        zone_id -> Nullable<BigInt>,
        block_id -> Nullable<BigInt>,
        lat -> Numeric,
        lng -> Numeric,
        // "order" collides with QueryDsl::order, hence the rename.
        #[sql_name = "order"]
        ordinal -> SmallInt,
    }
}

diesel::table! {
    time_slots (id) {
        id -> BigInt,
        days -> Array<Text>,
        timestart -> Nullable<SmallInt>,
        timeend -> Nullable<SmallInt>,
        alttimestart -> Nullable<SmallInt>,
        alttimeend -> Nullable<SmallInt>,
    }
}

diesel::table! {
    signs (id) {
        id -> BigInt,
        restriction -> Text,
        timelimit -> Nullable<Integer>,
        rawtext -> Text,
        permitexempt_bool -> Bool,
        holiday_bool -> Bool,
        photo_id -> Nullable<BigInt>,
        timeslotone_id -> Nullable<BigInt>,
        timeslottwo_id -> Nullable<BigInt>,
        timeslotthree_id -> Nullable<BigInt>,
        zone_id -> Nullable<BigInt>,
        pos_id -> Nullable<BigInt>,
    }
}

// Join table for the Sign <-> StreetBlock many-to-many relation.
diesel::table! {
    sign_blocks (sign_id, block_id) {
        sign_id -> BigInt,
        block_id -> BigInt,
    }
}

diesel::joinable!(street_blocks -> city_state_codes (csc_id));
diesel::joinable!(map_coordinates -> zones (zone_id));
diesel::joinable!(map_coordinates -> street_blocks (block_id));
diesel::joinable!(signs -> photos (photo_id));
diesel::joinable!(signs -> zones (zone_id));
diesel::joinable!(signs -> map_coordinates (pos_id));
diesel::joinable!(sign_blocks -> signs (sign_id));
diesel::joinable!(sign_blocks -> street_blocks (block_id));
// signs has three FK columns into time_slots, so `joinable!` cannot be
// declared for that pair; slot lookups filter on id explicitly.

diesel::allow_tables_to_appear_in_same_query!(
    city_state_codes,
    zones,
    photos,
    street_blocks,
    map_coordinates,
    time_slots,
    signs,
    sign_blocks,
);
