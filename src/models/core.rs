use chrono::NaiveDateTime;
use diesel::prelude::*;
use itertools::Itertools;

use crate::models::ModelError;
use crate::schema::{
    appeals, countries, disaster_types, documents, events, field_report_countries, field_reports,
    regions, services,
};

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = disaster_types)]
pub struct DisasterType {
    pub id: i32,
    pub name: String,
    pub summary: String,
}

#[derive(Insertable)]
#[diesel(table_name = disaster_types)]
pub struct NewDisasterType<'a> {
    pub name: &'a str,
    pub summary: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = regions)]
pub struct Region {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = regions)]
pub struct NewRegion<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = countries)]
pub struct Country {
    pub id: i32,
    pub name: String,
    pub iso: Option<String>,
    pub society_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = countries)]
pub struct NewCountry<'a> {
    pub name: &'a str,
    pub iso: Option<&'a str>,
    pub society_name: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: i32,
    pub eid: Option<i32>,
    pub name: String,
    pub dtype_id: Option<i32>,
    pub summary: String,
    pub status: String,
    pub region: String,
    pub code: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub eid: Option<i32>,
    pub name: &'a str,
    pub dtype_id: Option<i32>,
    pub summary: &'a str,
    pub status: &'a str,
    pub region: &'a str,
    pub code: Option<&'a str>,
}

impl Event {
    /// Names of every country touched by this event, through both its appeals
    /// and its field reports. Deduplicated and sorted.
    pub fn countries(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<String>> {
        let report_ids: Vec<i32> = field_reports::table
            .filter(field_reports::event_id.eq(self.id))
            .select(field_reports::id)
            .load(conn)?;
        let mut country_ids: Vec<i32> = field_report_countries::table
            .filter(field_report_countries::field_report_id.eq_any(report_ids))
            .select(field_report_countries::country_id)
            .load(conn)?;
        let appeal_countries: Vec<Option<i32>> = appeals::table
            .filter(appeals::event_id.eq(self.id))
            .select(appeals::country_id)
            .load(conn)?;
        country_ids.extend(appeal_countries.into_iter().flatten());

        let names: Vec<String> = countries::table
            .filter(countries::id.eq_any(country_ids))
            .select(countries::name)
            .load(conn)?;
        Ok(names.into_iter().unique().sorted().collect())
    }

    /// Earliest start date among this event's appeals. Appeals without a start
    /// date do not contribute.
    pub fn start_date(&self, conn: &mut SqliteConnection) -> Result<NaiveDateTime, ModelError> {
        appeals::table
            .filter(appeals::event_id.eq(self.id))
            .select(diesel::dsl::min(appeals::start_date))
            .first::<Option<NaiveDateTime>>(conn)?
            .ok_or(ModelError::NoAppeals(self.id))
    }

    /// Latest end date among this event's appeals.
    pub fn end_date(&self, conn: &mut SqliteConnection) -> Result<NaiveDateTime, ModelError> {
        appeals::table
            .filter(appeals::event_id.eq(self.id))
            .select(diesel::dsl::max(appeals::end_date))
            .first::<Option<NaiveDateTime>>(conn)?
            .ok_or(ModelError::NoAppeals(self.id))
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = documents)]
pub struct Document {
    pub id: i32,
    pub name: String,
    pub uri: String,
}

#[derive(Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocument<'a> {
    pub name: &'a str,
    pub uri: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = appeals)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
pub struct Appeal {
    pub id: i32,
    pub aid: String,
    pub name: Option<String>,
    pub summary: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub event_id: Option<i32>,
    pub country_id: Option<i32>,
    pub sector: String,
    pub num_beneficiaries: i32,
    pub amount_requested: f64,
    pub amount_funded: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = appeals)]
pub struct NewAppeal<'a> {
    pub aid: &'a str,
    pub name: Option<&'a str>,
    pub summary: &'a str,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub event_id: Option<i32>,
    pub country_id: Option<i32>,
    pub sector: &'a str,
    pub num_beneficiaries: i32,
    pub amount_requested: f64,
    pub amount_funded: f64,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = field_reports)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
pub struct FieldReport {
    pub id: i32,
    pub rid: String,
    pub summary: String,
    pub description: String,
    pub dtype_id: i32,
    pub event_id: Option<i32>,
    pub status: i32,
    pub request_assistance: bool,
    pub num_injured: Option<i32>,
    pub num_dead: Option<i32>,
    pub num_missing: Option<i32>,
    pub num_affected: Option<i32>,
    pub num_displaced: Option<i32>,
    pub num_assisted_gov: Option<i32>,
    pub num_assisted_rc: Option<i32>,
    pub num_localstaff: Option<i32>,
    pub num_volunteers: Option<i32>,
    pub num_expats_delegates: Option<i32>,
    pub action: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = field_reports)]
pub struct NewFieldReport<'a> {
    pub rid: &'a str,
    pub summary: &'a str,
    pub description: &'a str,
    pub dtype_id: i32,
    pub event_id: Option<i32>,
    pub status: i32,
    pub request_assistance: bool,
    pub action: &'a str,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = field_report_countries)]
#[diesel(belongs_to(FieldReport, foreign_key = field_report_id))]
pub struct FieldReportCountry {
    pub id: i32,
    pub field_report_id: i32,
    pub country_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = field_report_countries)]
pub struct NewFieldReportCountry {
    pub field_report_id: i32,
    pub country_id: i32,
}

impl FieldReport {
    pub fn countries(&self, conn: &mut SqliteConnection) -> QueryResult<Vec<Country>> {
        field_report_countries::table
            .inner_join(countries::table)
            .filter(field_report_countries::field_report_id.eq(self.id))
            .select(countries::all_columns)
            .order(countries::id.asc())
            .load(conn)
    }

    /// Replaces the set of countries this report is linked to.
    pub fn set_countries(&self, conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<()> {
        diesel::delete(
            field_report_countries::table
                .filter(field_report_countries::field_report_id.eq(self.id)),
        )
        .execute(conn)?;
        let rows: Vec<_> = ids
            .iter()
            .map(|&country_id| NewFieldReportCountry {
                field_report_id: self.id,
                country_id,
            })
            .collect();
        diesel::insert_into(field_report_countries::table)
            .values(rows)
            .execute(conn)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = services)]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub summary: String,
    pub deployed: bool,
    pub location: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = services)]
pub struct NewService<'a> {
    pub name: &'a str,
    pub summary: &'a str,
    pub deployed: bool,
    pub location: &'a str,
}
