mod common;

use common::*;
use sitrep::models::ModelError;

#[test]
fn event_countries_span_appeals_and_field_reports() {
    let mut conn = memory_conn();
    let dtype = insert_dtype(&mut conn, "Flood");
    let event = insert_event(&mut conn, "River flood", Some(dtype.id));
    let kenya = insert_country(&mut conn, "Kenya", Some("KE"), "Kenya Red Cross");
    let uganda = insert_country(&mut conn, "Uganda", Some("UG"), "Uganda Red Cross");
    let chad = insert_country(&mut conn, "Chad", None, "");

    insert_appeal(&mut conn, "AP001", Some(event.id), Some(kenya.id), None, None);
    insert_appeal(&mut conn, "AP002", Some(event.id), Some(uganda.id), None, None);
    let report = insert_field_report(&mut conn, "FR001", dtype.id, Some(event.id), 1);
    link_report_country(&mut conn, report.id, uganda.id);
    link_report_country(&mut conn, report.id, chad.id);

    let names = event.countries(&mut conn).unwrap();
    assert_eq!(names, ["Chad", "Kenya", "Uganda"]);
}

#[test]
fn event_dates_aggregate_min_start_and_max_end() {
    let mut conn = memory_conn();
    let event = insert_event(&mut conn, "Drought", None);
    insert_appeal(
        &mut conn,
        "AP010",
        Some(event.id),
        None,
        Some(dt("2017-03-01")),
        Some(dt("2017-06-30")),
    );
    insert_appeal(
        &mut conn,
        "AP011",
        Some(event.id),
        None,
        Some(dt("2017-01-15")),
        Some(dt("2017-04-01")),
    );

    assert_eq!(event.start_date(&mut conn).unwrap(), dt("2017-01-15"));
    assert_eq!(event.end_date(&mut conn).unwrap(), dt("2017-06-30"));
}

#[test]
fn event_without_appeals_has_no_aggregate_dates() {
    let mut conn = memory_conn();
    let event = insert_event(&mut conn, "Quiet event", None);

    let err = event.start_date(&mut conn).unwrap_err();
    assert!(matches!(err, ModelError::NoAppeals(id) if id == event.id));
    let err = event.end_date(&mut conn).unwrap_err();
    assert!(matches!(err, ModelError::NoAppeals(id) if id == event.id));
}

#[test]
fn appeals_without_dates_do_not_contribute() {
    let mut conn = memory_conn();
    let event = insert_event(&mut conn, "Undated", None);
    insert_appeal(&mut conn, "AP020", Some(event.id), None, None, None);

    // MIN over all-null dates is null, same as having no appeals at all
    assert!(matches!(
        event.start_date(&mut conn),
        Err(ModelError::NoAppeals(_))
    ));
}

#[test]
fn set_countries_replaces_existing_links() {
    let mut conn = memory_conn();
    let dtype = insert_dtype(&mut conn, "Earthquake");
    let report = insert_field_report(&mut conn, "FR100", dtype.id, None, 2);
    let nepal = insert_country(&mut conn, "Nepal", Some("NP"), "Nepal Red Cross");
    let india = insert_country(&mut conn, "India", Some("IN"), "Indian Red Cross");

    report.set_countries(&mut conn, &[nepal.id, india.id]).unwrap();
    let linked = report.countries(&mut conn).unwrap();
    assert_eq!(linked.len(), 2);

    report.set_countries(&mut conn, &[india.id]).unwrap();
    let linked = report.countries(&mut conn).unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, india.id);
}
