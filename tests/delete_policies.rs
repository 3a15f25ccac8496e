mod common;

use common::*;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use sitrep::models::{Appeal, EruOwner, EruType, FieldReport};
use sitrep::schema::{
    appeals, countries, disaster_types, eru_owners, erus, events, fact_people, facts,
    field_reports,
};

#[test]
fn deleting_a_country_detaches_its_eru_owner() {
    let mut conn = memory_conn();
    let country = insert_country(&mut conn, "Iceland", Some("IS"), "Icelandic Red Cross");
    let owner = insert_eru_owner(&mut conn, Some(country.id));
    assert_eq!(
        owner.display_name(&mut conn).unwrap(),
        "Icelandic Red Cross (Iceland)"
    );

    diesel::delete(countries::table.find(country.id))
        .execute(&mut conn)
        .unwrap();

    let reloaded: EruOwner = eru_owners::table.find(owner.id).first(&mut conn).unwrap();
    assert_eq!(reloaded.national_society_country_id, None);
    assert_eq!(
        reloaded.display_name(&mut conn).unwrap(),
        format!("ERU owner #{}", owner.id)
    );
}

#[test]
fn deleting_an_owner_removes_its_erus() {
    let mut conn = memory_conn();
    let owner = insert_eru_owner(&mut conn, None);
    insert_eru(&mut conn, EruType::Basecamp, owner.id, None);
    insert_eru(&mut conn, EruType::Relief, owner.id, None);

    diesel::delete(eru_owners::table.find(owner.id))
        .execute(&mut conn)
        .unwrap();

    let remaining: i64 = erus::table.count().get_result(&mut conn).unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn disaster_type_with_reports_cannot_be_deleted() {
    let mut conn = memory_conn();
    let dtype = insert_dtype(&mut conn, "Cyclone");
    insert_field_report(&mut conn, "FR200", dtype.id, None, 1);

    let result = diesel::delete(disaster_types::table.find(dtype.id)).execute(&mut conn);
    assert!(matches!(
        result,
        Err(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            _
        ))
    ));
}

#[test]
fn deleting_an_event_detaches_appeals_and_reports() {
    let mut conn = memory_conn();
    let dtype = insert_dtype(&mut conn, "Storm");
    let event = insert_event(&mut conn, "Autumn storm", Some(dtype.id));
    let appeal = insert_appeal(&mut conn, "AP300", Some(event.id), None, None, None);
    let report = insert_field_report(&mut conn, "FR300", dtype.id, Some(event.id), 1);

    diesel::delete(events::table.find(event.id))
        .execute(&mut conn)
        .unwrap();

    let appeal: Appeal = appeals::table.find(appeal.id).first(&mut conn).unwrap();
    assert_eq!(appeal.event_id, None);
    let report: FieldReport = field_reports::table.find(report.id).first(&mut conn).unwrap();
    assert_eq!(report.event_id, None);
}

#[test]
fn deleting_a_fact_removes_its_people() {
    let mut conn = memory_conn();
    let country = insert_country(&mut conn, "Fiji", Some("FJ"), "Fiji Red Cross");
    let region = insert_region(&mut conn, "Pacific");
    let fact = insert_fact(&mut conn, country.id, region.id, None);
    insert_fact_person(&mut conn, fact.id, "A. Vula");

    diesel::delete(facts::table.find(fact.id))
        .execute(&mut conn)
        .unwrap();

    let remaining: i64 = fact_people::table.count().get_result(&mut conn).unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn updating_an_owner_touches_updated_at() {
    let mut conn = memory_conn();
    let country = insert_country(&mut conn, "Spain", Some("ES"), "Spanish Red Cross");
    let other = insert_country(&mut conn, "Portugal", Some("PT"), "Portuguese Red Cross");
    let owner = insert_eru_owner(&mut conn, Some(country.id));

    // push updated_at into the past, then make an ordinary update
    diesel::update(eru_owners::table.find(owner.id))
        .set(eru_owners::updated_at.eq(dt("2000-01-01")))
        .execute(&mut conn)
        .unwrap();
    diesel::update(eru_owners::table.find(owner.id))
        .set(eru_owners::national_society_country_id.eq(other.id))
        .execute(&mut conn)
        .unwrap();

    let reloaded: EruOwner = eru_owners::table.find(owner.id).first(&mut conn).unwrap();
    assert!(reloaded.updated_at > dt("2001-01-01"));
}
