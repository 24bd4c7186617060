use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Queryable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::stations)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub available: i32,
}

/// Full field set for both station creation and replacement. Every field is
/// required; a PUT with this body overwrites the whole row.
#[derive(Debug, Clone, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::stations)]
pub struct StationFields {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub available: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i32,
    pub user_name: String,
    pub station_id: i32,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub user_name: String,
    pub station_id: i32,
    pub time: DateTime<Utc>,
}
