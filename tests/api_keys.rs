mod common;

use common::*;
use diesel::prelude::*;
use sitrep::auth::ApiKey;
use sitrep::schema::api_keys;

#[test]
fn issued_keys_are_persisted_and_unique() {
    let mut conn = memory_conn();
    let first = ApiKey::issue(&mut conn, "ops", 30).unwrap();
    let second = ApiKey::issue(&mut conn, "ops", 30).unwrap();
    assert_ne!(first.key, second.key);

    let stored: ApiKey = api_keys::table
        .filter(api_keys::key.eq(&first.key))
        .first(&mut conn)
        .unwrap();
    assert_eq!(stored.holder, "ops");
    assert!(!stored.is_expired());
}

#[test]
fn keys_expire_after_their_validity_window() {
    let mut conn = memory_conn();
    let expired = ApiKey::issue(&mut conn, "ops", -1).unwrap();
    assert!(expired.is_expired());

    let fresh = ApiKey::issue(&mut conn, "ops", 1).unwrap();
    assert!(!fresh.is_expired());
}
