use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Integer;
use diesel::sqlite::Sqlite;
use diesel::{AsExpression, FromSqlRow};
use serde_repr::Serialize_repr;

use crate::models::Country;
use crate::schema::{countries, eru_owners, erus, fact_people, facts, heops, rdrt_people, rdrts};

/// Kind of emergency response unit, stored as an integer tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize_repr,
    strum::Display, strum::EnumIter,
)]
#[diesel(sql_type = Integer)]
#[repr(i32)]
pub enum EruType {
    #[strum(serialize = "Basecamp")]
    Basecamp = 0,
    #[strum(serialize = "IT & Telecom")]
    Telecom = 1,
    #[strum(serialize = "Logistics")]
    Logistics = 2,
    #[strum(serialize = "RCRC Emergency Hospital")]
    EmergencyHospital = 3,
    #[strum(serialize = "RCRC Emergency Clinic")]
    EmergencyClinic = 4,
    #[strum(serialize = "Relief")]
    Relief = 5,
    #[strum(serialize = "WASH M15")]
    WashM15 = 6,
    #[strum(serialize = "WASH MSM20")]
    WashMsm20 = 7,
    #[strum(serialize = "WASH M40")]
    WashM40 = 8,
}

impl EruType {
    pub fn from_tag(tag: i32) -> Option<EruType> {
        use EruType::*;
        match tag {
            0 => Some(Basecamp),
            1 => Some(Telecom),
            2 => Some(Logistics),
            3 => Some(EmergencyHospital),
            4 => Some(EmergencyClinic),
            5 => Some(Relief),
            6 => Some(WashM15),
            7 => Some(WashMsm20),
            8 => Some(WashM40),
            _ => None,
        }
    }

    pub fn tag(self) -> i32 {
        self as i32
    }
}

impl ToSql<Integer, Sqlite> for EruType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(*self as i32);
        Ok(IsNull::No)
    }
}

impl FromSql<Integer, Sqlite> for EruType {
    fn from_sql(value: diesel::backend::RawValue<'_, Sqlite>) -> deserialize::Result<Self> {
        let tag = <i32 as FromSql<Integer, Sqlite>>::from_sql(value)?;
        EruType::from_tag(tag).ok_or_else(|| format!("unrecognized ERU type tag {tag}").into())
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = eru_owners)]
pub struct EruOwner {
    pub id: i32,
    pub national_society_country_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = eru_owners)]
pub struct NewEruOwner {
    pub national_society_country_id: Option<i32>,
}

impl EruOwner {
    /// Human-readable name, following the owning national society when one is
    /// linked. Owners with no country fall back to their row id.
    pub fn display_name(&self, conn: &mut SqliteConnection) -> QueryResult<String> {
        let country = match self.national_society_country_id {
            Some(cid) => countries::table.find(cid).first::<Country>(conn).optional()?,
            None => None,
        };
        Ok(match country {
            Some(c) if !c.society_name.is_empty() => format!("{} ({})", c.society_name, c.name),
            Some(c) => c.name,
            None => format!("ERU owner #{}", self.id),
        })
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = erus)]
#[diesel(belongs_to(EruOwner, foreign_key = eru_owner_id))]
pub struct Eru {
    pub id: i32,
    pub kind: EruType,
    pub units: i32,
    pub equipment_units: i32,
    pub deployed_to_id: Option<i32>,
    pub event_id: Option<i32>,
    pub eru_owner_id: i32,
    pub available: bool,
}

#[derive(Insertable)]
#[diesel(table_name = erus)]
pub struct NewEru {
    #[diesel(column_name = type_)]
    pub kind: EruType,
    pub units: i32,
    pub equipment_units: i32,
    pub deployed_to_id: Option<i32>,
    pub event_id: Option<i32>,
    pub eru_owner_id: i32,
    pub available: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = heops)]
pub struct Heop {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub country_id: i32,
    pub region_id: i32,
    pub event_id: Option<i32>,
    pub dtype_id: Option<i32>,
    pub person: Option<String>,
    pub role: Option<String>,
    pub comments: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = heops)]
pub struct NewHeop<'a> {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub country_id: i32,
    pub region_id: i32,
    pub event_id: Option<i32>,
    pub dtype_id: Option<i32>,
    pub person: Option<&'a str>,
    pub role: Option<&'a str>,
    pub comments: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = facts)]
pub struct Fact {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub country_id: i32,
    pub region_id: i32,
    pub event_id: Option<i32>,
    pub dtype_id: Option<i32>,
    pub comments: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = facts)]
pub struct NewFact<'a> {
    pub start_date: Option<NaiveDateTime>,
    pub country_id: i32,
    pub region_id: i32,
    pub event_id: Option<i32>,
    pub dtype_id: Option<i32>,
    pub comments: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = fact_people)]
#[diesel(belongs_to(Fact, foreign_key = fact_id))]
pub struct FactPerson {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub society_deployed_from: Option<String>,
    pub fact_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = fact_people)]
pub struct NewFactPerson<'a> {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<&'a str>,
    pub role: Option<&'a str>,
    pub society_deployed_from: Option<&'a str>,
    pub fact_id: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = rdrts)]
pub struct Rdrt {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub country_id: i32,
    pub region_id: i32,
    pub event_id: Option<i32>,
    pub dtype_id: Option<i32>,
    pub comments: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = rdrts)]
pub struct NewRdrt<'a> {
    pub start_date: Option<NaiveDateTime>,
    pub country_id: i32,
    pub region_id: i32,
    pub event_id: Option<i32>,
    pub dtype_id: Option<i32>,
    pub comments: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = rdrt_people)]
#[diesel(belongs_to(Rdrt, foreign_key = rdrt_id))]
pub struct RdrtPerson {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub society_deployed_from: Option<String>,
    pub rdrt_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = rdrt_people)]
pub struct NewRdrtPerson<'a> {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<&'a str>,
    pub role: Option<&'a str>,
    pub society_deployed_from: Option<&'a str>,
    pub rdrt_id: i32,
}
