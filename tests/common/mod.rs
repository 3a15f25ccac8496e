#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rocket::http::Header;
use rocket::local::blocking::Client;
use tempfile::TempDir;

use sitrep::auth::ApiKey;
use sitrep::models::{
    Appeal, Country, DisasterType, Document, Eru, EruOwner, EruType, Event, Fact, FactPerson,
    FieldReport, Heop, NewAppeal, NewCountry, NewDisasterType, NewDocument, NewEru, NewEruOwner,
    NewEvent, NewFact, NewFactPerson, NewFieldReport, NewFieldReportCountry, NewHeop, NewRdrt,
    NewRdrtPerson, NewRegion, NewService, Rdrt, RdrtPerson, Region, Service,
};
use sitrep::schema::{
    appeals, countries, disaster_types, documents, eru_owners, erus, events, fact_people, facts,
    field_report_countries, field_reports, heops, rdrt_people, rdrts, regions, services,
};

pub struct TestServer {
    pub client: Client,
    db_path: PathBuf,
    _tmp: TempDir,
}

/// Boots the full application against a fresh database in a temp directory.
/// Migrations run through the ignite fairing, exactly as in production.
pub fn server() -> TestServer {
    let _ = env_logger::builder().is_test(true).try_init();
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("sitrep.sqlite");
    let figment = rocket::Config::figment()
        .merge(("databases.sitrep.url", db_path.display().to_string()))
        .merge(("log_level", "off"));
    let client = Client::tracked(sitrep::build_rocket(figment)).unwrap();
    TestServer {
        client,
        db_path,
        _tmp: tmp,
    }
}

impl TestServer {
    /// Direct connection to the server's database, for seeding fixtures.
    pub fn conn(&self) -> SqliteConnection {
        sitrep::db::connect(self.db_path.to_str().unwrap()).unwrap()
    }

    pub fn auth_header(&self) -> Header<'static> {
        let mut conn = self.conn();
        let key = ApiKey::issue(&mut conn, "tests", 30).unwrap();
        Header::new("Authorization", format!("ApiKey {}", key.key))
    }
}

/// In-memory database with migrations applied, for model-level tests.
pub fn memory_conn() -> SqliteConnection {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut conn = sitrep::db::connect(":memory:").unwrap();
    sitrep::db::run_migrations(&mut conn).unwrap();
    conn
}

pub fn dt(s: &str) -> NaiveDateTime {
    let padded = if s.len() == 10 {
        format!("{s} 00:00:00")
    } else {
        s.to_owned()
    };
    NaiveDateTime::parse_from_str(&padded, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn insert_region(conn: &mut SqliteConnection, name: &str) -> Region {
    diesel::insert_into(regions::table)
        .values(&NewRegion { name })
        .get_result(conn)
        .unwrap()
}

pub fn insert_country(
    conn: &mut SqliteConnection,
    name: &str,
    iso: Option<&str>,
    society_name: &str,
) -> Country {
    diesel::insert_into(countries::table)
        .values(&NewCountry {
            name,
            iso,
            society_name,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_dtype(conn: &mut SqliteConnection, name: &str) -> DisasterType {
    diesel::insert_into(disaster_types::table)
        .values(&NewDisasterType { name, summary: "" })
        .get_result(conn)
        .unwrap()
}

pub fn insert_event(conn: &mut SqliteConnection, name: &str, dtype_id: Option<i32>) -> Event {
    diesel::insert_into(events::table)
        .values(&NewEvent {
            eid: None,
            name,
            dtype_id,
            summary: "",
            status: "Active",
            region: "",
            code: None,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_document(conn: &mut SqliteConnection, name: &str, uri: &str) -> Document {
    diesel::insert_into(documents::table)
        .values(&NewDocument { name, uri })
        .get_result(conn)
        .unwrap()
}

pub fn insert_service(
    conn: &mut SqliteConnection,
    name: &str,
    deployed: bool,
    location: &str,
) -> Service {
    diesel::insert_into(services::table)
        .values(&NewService {
            name,
            summary: "",
            deployed,
            location,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_appeal(
    conn: &mut SqliteConnection,
    aid: &str,
    event_id: Option<i32>,
    country_id: Option<i32>,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
) -> Appeal {
    diesel::insert_into(appeals::table)
        .values(&NewAppeal {
            aid,
            name: None,
            summary: "",
            start_date,
            end_date,
            event_id,
            country_id,
            sector: "Relief",
            num_beneficiaries: 0,
            amount_requested: 0.0,
            amount_funded: 0.0,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_field_report(
    conn: &mut SqliteConnection,
    rid: &str,
    dtype_id: i32,
    event_id: Option<i32>,
    status: i32,
) -> FieldReport {
    diesel::insert_into(field_reports::table)
        .values(&NewFieldReport {
            rid,
            summary: "",
            description: "",
            dtype_id,
            event_id,
            status,
            request_assistance: false,
            action: "",
        })
        .get_result(conn)
        .unwrap()
}

pub fn link_report_country(conn: &mut SqliteConnection, field_report_id: i32, country_id: i32) {
    diesel::insert_into(field_report_countries::table)
        .values(&NewFieldReportCountry {
            field_report_id,
            country_id,
        })
        .execute(conn)
        .unwrap();
}

pub fn insert_eru_owner(
    conn: &mut SqliteConnection,
    national_society_country_id: Option<i32>,
) -> EruOwner {
    diesel::insert_into(eru_owners::table)
        .values(&NewEruOwner {
            national_society_country_id,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_eru(
    conn: &mut SqliteConnection,
    kind: EruType,
    eru_owner_id: i32,
    deployed_to_id: Option<i32>,
) -> Eru {
    diesel::insert_into(erus::table)
        .values(&NewEru {
            kind,
            units: 1,
            equipment_units: 1,
            deployed_to_id,
            event_id: None,
            eru_owner_id,
            available: true,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_heop(
    conn: &mut SqliteConnection,
    country_id: i32,
    region_id: i32,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
    person: Option<&str>,
) -> Heop {
    diesel::insert_into(heops::table)
        .values(&NewHeop {
            start_date,
            end_date,
            country_id,
            region_id,
            event_id: None,
            dtype_id: None,
            person,
            role: None,
            comments: None,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_fact(
    conn: &mut SqliteConnection,
    country_id: i32,
    region_id: i32,
    start_date: Option<NaiveDateTime>,
) -> Fact {
    diesel::insert_into(facts::table)
        .values(&NewFact {
            start_date,
            country_id,
            region_id,
            event_id: None,
            dtype_id: None,
            comments: None,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_fact_person(conn: &mut SqliteConnection, fact_id: i32, name: &str) -> FactPerson {
    diesel::insert_into(fact_people::table)
        .values(&NewFactPerson {
            start_date: None,
            end_date: None,
            name: Some(name),
            role: None,
            society_deployed_from: None,
            fact_id,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_rdrt(
    conn: &mut SqliteConnection,
    country_id: i32,
    region_id: i32,
    start_date: Option<NaiveDateTime>,
) -> Rdrt {
    diesel::insert_into(rdrts::table)
        .values(&NewRdrt {
            start_date,
            country_id,
            region_id,
            event_id: None,
            dtype_id: None,
            comments: None,
        })
        .get_result(conn)
        .unwrap()
}

pub fn insert_rdrt_person(conn: &mut SqliteConnection, rdrt_id: i32, name: &str) -> RdrtPerson {
    diesel::insert_into(rdrt_people::table)
        .values(&NewRdrtPerson {
            start_date: None,
            end_date: None,
            name: Some(name),
            role: None,
            society_deployed_from: None,
            rdrt_id,
        })
        .get_result(conn)
        .unwrap()
}
