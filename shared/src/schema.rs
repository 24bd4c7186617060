diesel::table! {
    stations (id) {
        id -> Int4,
        name -> Varchar,
        location -> Varchar,
        capacity -> Int4,
        available -> Int4,
    }
}

diesel::table! {
    bookings (id) {
        id -> Int4,
        user_name -> Varchar,
        station_id -> Int4,
        time -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(stations, bookings);
