mod common;

use common::*;
use rocket::http::{Header, Status};
use serde_json::Value;
use sitrep::auth::ApiKey;
use sitrep::models::EruType;

#[test]
fn deployments_require_an_api_key() {
    let server = server();

    let response = server.client.get("/api/v1/eru").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["error"], "authentication required");
}

#[test]
fn expired_keys_are_rejected() {
    let server = server();
    let mut conn = server.conn();
    let key = ApiKey::issue(&mut conn, "stale", -1).unwrap();

    let response = server
        .client
        .get("/api/v1/heop")
        .header(Header::new("Authorization", format!("ApiKey {}", key.key)))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn garbled_authorization_header_is_rejected() {
    let server = server();

    let response = server
        .client
        .get("/api/v1/fact")
        .header(Header::new("Authorization", "Bearer whatever"))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn eru_type_filter_selects_matching_units() {
    let server = server();
    let mut conn = server.conn();
    let norway = insert_country(&mut conn, "Norway", Some("NO"), "Norwegian Red Cross");
    let owner = insert_eru_owner(&mut conn, Some(norway.id));
    insert_eru(&mut conn, EruType::Basecamp, owner.id, None);
    insert_eru(&mut conn, EruType::Logistics, owner.id, None);
    insert_eru(&mut conn, EruType::Relief, owner.id, None);

    let response = server
        .client
        .get("/api/v1/eru?type=2")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["type"], 2);
    assert_eq!(body["objects"][0]["type_display"], "Logistics");
    assert_eq!(
        body["objects"][0]["eru_owner"]["national_society_country"]["iso"],
        "NO"
    );

    let response = server
        .client
        .get("/api/v1/eru?type__in=0,5")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 2);
}

#[test]
fn eru_deployment_state_filters() {
    let server = server();
    let mut conn = server.conn();
    let peru = insert_country(&mut conn, "Peru", Some("PE"), "Peruvian Red Cross");
    let owner = insert_eru_owner(&mut conn, None);
    let deployed = insert_eru(&mut conn, EruType::WashM15, owner.id, Some(peru.id));
    let parked = insert_eru(&mut conn, EruType::WashM40, owner.id, None);

    let response = server
        .client
        .get("/api/v1/eru?deployed_to__isnull=true")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["id"], parked.id);

    let response = server
        .client
        .get("/api/v1/eru?deployed_to__isnull=false")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["objects"][0]["id"], deployed.id);
    assert_eq!(body["objects"][0]["deployed_to"]["name"], "Peru");

    let response = server
        .client
        .get(format!("/api/v1/eru?deployed_to__in={}", peru.id))
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["id"], deployed.id);
}

#[test]
fn eru_filters_traverse_to_the_owning_society() {
    let server = server();
    let mut conn = server.conn();
    let germany = insert_country(&mut conn, "Germany", Some("DE"), "German Red Cross");
    let benin = insert_country(&mut conn, "Benin", Some("BJ"), "Red Cross of Benin");
    let german_owner = insert_eru_owner(&mut conn, Some(germany.id));
    let benin_owner = insert_eru_owner(&mut conn, Some(benin.id));
    let german_eru = insert_eru(&mut conn, EruType::EmergencyHospital, german_owner.id, None);
    insert_eru(&mut conn, EruType::EmergencyClinic, benin_owner.id, None);

    let response = server
        .client
        .get(format!(
            "/api/v1/eru?eru_owner__national_society_country={}",
            germany.id
        ))
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["id"], german_eru.id);

    let response = server
        .client
        .get(format!(
            "/api/v1/eru?eru_owner__national_society_country__in={},{}",
            germany.id, benin.id
        ))
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 2);
}

#[test]
fn eru_owner_accepts_country_as_a_filter_alias() {
    let server = server();
    let mut conn = server.conn();
    let japan = insert_country(&mut conn, "Japan", Some("JP"), "Japanese Red Cross");
    let owner = insert_eru_owner(&mut conn, Some(japan.id));
    insert_eru_owner(&mut conn, None);

    let response = server
        .client
        .get(format!("/api/v1/eru_owner?country={}", japan.id))
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["id"], owner.id);
}

#[test]
fn eru_owner_detail_includes_its_units() {
    let server = server();
    let mut conn = server.conn();
    let japan = insert_country(&mut conn, "Japan", Some("JP"), "Japanese Red Cross");
    let owner = insert_eru_owner(&mut conn, Some(japan.id));
    insert_eru(&mut conn, EruType::Telecom, owner.id, None);
    insert_eru(&mut conn, EruType::Logistics, owner.id, None);

    let response = server
        .client
        .get(format!("/api/v1/eru_owner/{}", owner.id))
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["national_society_country"]["society_name"], "Japanese Red Cross");
    assert_eq!(body["eru_set"].as_array().unwrap().len(), 2);
    assert_eq!(body["eru_set"][0]["type_display"], "IT & Telecom");

    let missing = server
        .client
        .get("/api/v1/eru_owner/99999")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(missing.status(), Status::NotFound);
    let body: Value = missing.into_json().unwrap();
    assert_eq!(body["error"], "not found");
}

#[test]
fn heop_date_window_and_ordering() {
    let server = server();
    let mut conn = server.conn();
    let country = insert_country(&mut conn, "Philippines", Some("PH"), "Philippine Red Cross");
    let region = insert_region(&mut conn, "Asia Pacific");
    insert_heop(&mut conn, country.id, region.id, Some(dt("2016-01-10")), None, Some("A"));
    insert_heop(&mut conn, country.id, region.id, Some(dt("2017-02-01")), None, Some("B"));
    insert_heop(&mut conn, country.id, region.id, Some(dt("2018-03-05")), None, Some("C"));

    let response = server
        .client
        .get("/api/v1/heop?start_date__gte=2016-06-01&order_by=-start_date")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 2);
    assert_eq!(body["objects"][0]["start_date"], "2018-03-05T00:00:00");
    assert_eq!(body["objects"][1]["start_date"], "2017-02-01T00:00:00");
    assert_eq!(body["objects"][0]["country"]["iso"], "PH");
    assert_eq!(body["objects"][0]["region"]["name"], "Asia Pacific");
}

#[test]
fn heop_year_and_person_filters() {
    let server = server();
    let mut conn = server.conn();
    let country = insert_country(&mut conn, "Haiti", Some("HT"), "Haitian Red Cross");
    let region = insert_region(&mut conn, "Americas");
    insert_heop(&mut conn, country.id, region.id, Some(dt("2016-08-20")), None, Some("M. Previl"));
    insert_heop(&mut conn, country.id, region.id, Some(dt("2017-09-01")), None, Some("J. Baptiste"));

    let response = server
        .client
        .get("/api/v1/heop?start_date__year=2017")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["person"], "J. Baptiste");

    let response = server
        .client
        .get("/api/v1/heop?person__in=M.%20Previl,Nobody")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["person"], "M. Previl");
}

#[test]
fn unknown_query_parameters_are_rejected() {
    let server = server();

    let response = server
        .client
        .get("/api/v1/heop?made_up=3")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn malformed_date_filter_is_rejected() {
    let server = server();

    let response = server
        .client
        .get("/api/v1/heop?start_date__gt=yesterday")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn backwards_date_range_is_rejected() {
    let server = server();

    let response = server
        .client
        .get("/api/v1/heop?start_date__range=2018-01-01,2017-01-01")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn unknown_ordering_field_is_rejected() {
    let server = server();

    let response = server
        .client
        .get("/api/v1/heop?order_by=altitude")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().unwrap();
    assert!(body["error"].as_str().unwrap().contains("altitude"));
}

#[test]
fn pagination_envelope_walks_pages() {
    let server = server();
    let mut conn = server.conn();
    let samoa = insert_country(&mut conn, "Samoa", Some("WS"), "Samoa Red Cross");
    let tonga = insert_country(&mut conn, "Tonga", Some("TO"), "Tonga Red Cross");
    let region = insert_region(&mut conn, "Pacific");
    for _ in 0..5 {
        insert_fact(&mut conn, samoa.id, region.id, None);
    }
    insert_fact(&mut conn, tonga.id, region.id, None);

    let response = server
        .client
        .get(format!("/api/v1/fact?country={}&limit=2", samoa.id))
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["limit"], 2);
    assert_eq!(body["meta"]["offset"], 0);
    assert_eq!(body["meta"]["total_count"], 5);
    assert_eq!(body["objects"].as_array().unwrap().len(), 2);
    assert!(body["meta"]["previous"].is_null());
    let next = body["meta"]["next"].as_str().unwrap().to_owned();
    assert!(next.contains("offset=2"));
    assert!(next.contains(&format!("country={}", samoa.id)));

    let response = server
        .client
        .get(next.as_str())
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["offset"], 2);
    let previous = body["meta"]["previous"].as_str().unwrap().to_owned();
    assert!(previous.contains("offset=0"));
    let next = body["meta"]["next"].as_str().unwrap().to_owned();
    assert!(next.contains("offset=4"));

    let response = server
        .client
        .get(next.as_str())
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["objects"].as_array().unwrap().len(), 1);
    assert!(body["meta"]["next"].is_null());
}

#[test]
fn fact_range_filter_returns_exactly_the_window() {
    let server = server();
    let mut conn = server.conn();
    let country = insert_country(&mut conn, "Fiji", Some("FJ"), "Fiji Red Cross");
    let region = insert_region(&mut conn, "Pacific");
    insert_fact(&mut conn, country.id, region.id, Some(dt("2016-01-01")));
    insert_fact(&mut conn, country.id, region.id, Some(dt("2016-05-10")));
    insert_fact(&mut conn, country.id, region.id, Some(dt("2016-11-20")));
    insert_fact(&mut conn, country.id, region.id, Some(dt("2017-02-02")));

    let response = server
        .client
        .get("/api/v1/fact?start_date__range=2016-02-01,2016-12-31&order_by=-start_date")
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 2);
    assert_eq!(body["objects"][0]["start_date"], "2016-11-20T00:00:00");
    assert_eq!(body["objects"][1]["start_date"], "2016-05-10T00:00:00");
}

#[test]
fn fact_list_embeds_people() {
    let server = server();
    let mut conn = server.conn();
    let country = insert_country(&mut conn, "Malawi", Some("MW"), "Malawi Red Cross");
    let region = insert_region(&mut conn, "Africa");
    let fact = insert_fact(&mut conn, country.id, region.id, Some(dt("2017-03-10")));
    insert_fact_person(&mut conn, fact.id, "T. Banda");
    insert_fact_person(&mut conn, fact.id, "L. Phiri");

    let response = server
        .client
        .get("/api/v1/fact")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["objects"][0]["people"].as_array().unwrap().len(), 2);
    assert_eq!(body["objects"][0]["people"][0]["name"], "T. Banda");
    assert_eq!(body["objects"][0]["country"]["name"], "Malawi");
}

#[test]
fn fact_person_embeds_its_deployment() {
    let server = server();
    let mut conn = server.conn();
    let country = insert_country(&mut conn, "Ecuador", Some("EC"), "Ecuadorian Red Cross");
    let region = insert_region(&mut conn, "Americas");
    let fact = insert_fact(&mut conn, country.id, region.id, Some(dt("2016-04-18")));
    let person = insert_fact_person(&mut conn, fact.id, "R. Mera");

    let response = server
        .client
        .get(format!("/api/v1/fact_person/{}", person.id))
        .header(server.auth_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["name"], "R. Mera");
    assert_eq!(body["fact"]["id"], fact.id);
    assert_eq!(body["fact"]["country"]["name"], "Ecuador");
    assert_eq!(body["fact"]["start_date"], "2016-04-18T00:00:00");
}

#[test]
fn rdrt_mirrors_the_fact_surface() {
    let server = server();
    let mut conn = server.conn();
    let country = insert_country(&mut conn, "Vanuatu", Some("VU"), "Vanuatu Red Cross");
    let region = insert_region(&mut conn, "Pacific");
    let early = insert_rdrt(&mut conn, country.id, region.id, Some(dt("2015-03-14")));
    let late = insert_rdrt(&mut conn, country.id, region.id, Some(dt("2015-05-02")));
    insert_rdrt_person(&mut conn, early.id, "S. Kalo");

    let response = server
        .client
        .get("/api/v1/rdrt?order_by=-start_date")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 2);
    assert_eq!(body["objects"][0]["id"], late.id);
    assert_eq!(body["objects"][1]["people"][0]["name"], "S. Kalo");

    let response = server
        .client
        .get("/api/v1/rdrt_person?name=S.%20Kalo")
        .header(server.auth_header())
        .dispatch();
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["rdrt"]["id"], early.id);
}
