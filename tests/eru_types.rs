use sitrep::models::EruType;
use strum::IntoEnumIterator;

#[test]
fn tags_round_trip() {
    for kind in EruType::iter() {
        assert_eq!(EruType::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(EruType::from_tag(9), None);
    assert_eq!(EruType::from_tag(-1), None);
}

#[test]
fn display_labels_match_the_catalogue() {
    assert_eq!(EruType::Basecamp.to_string(), "Basecamp");
    assert_eq!(EruType::Telecom.to_string(), "IT & Telecom");
    assert_eq!(
        EruType::EmergencyHospital.to_string(),
        "RCRC Emergency Hospital"
    );
    assert_eq!(EruType::WashMsm20.to_string(), "WASH MSM20");
}

#[test]
fn serializes_as_an_integer_tag() {
    let value = serde_json::to_value(EruType::Logistics).unwrap();
    assert_eq!(value, serde_json::json!(2));
}
