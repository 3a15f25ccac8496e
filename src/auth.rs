use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use uuid::Uuid;

use crate::db::SitrepDb;
use crate::error::ApiError;
use crate::schema::api_keys;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = api_keys)]
pub struct ApiKey {
    pub id: i32,
    pub key: String,
    pub holder: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = api_keys)]
pub struct NewApiKey<'a> {
    pub key: &'a str,
    pub holder: &'a str,
    pub expires_at: NaiveDateTime,
}

impl ApiKey {
    /// Mints a fresh random key for `holder`, valid for `valid_days` days.
    pub fn issue(
        conn: &mut SqliteConnection,
        holder: &str,
        valid_days: i64,
    ) -> QueryResult<ApiKey> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now().naive_utc() + Duration::days(valid_days);
        diesel::insert_into(api_keys::table)
            .values(NewApiKey {
                key: &token,
                holder,
                expires_at,
            })
            .get_result(conn)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}

fn token_from_header(value: &str) -> Option<&str> {
    let rest = value.strip_prefix("ApiKey ")?.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Request guard for the deployments endpoints. Accepts
/// `Authorization: ApiKey <token>` where the token matches an unexpired row
/// in `api_keys`.
pub struct AuthenticatedKey {
    pub key: ApiKey,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedKey {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, ApiError> {
        let token = match req.headers().get_one("Authorization").and_then(token_from_header) {
            Some(t) => t.to_owned(),
            None => return Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
        };
        let db = match req.guard::<SitrepDb>().await {
            Outcome::Success(db) => db,
            _ => {
                return Outcome::Error((Status::InternalServerError, ApiError::PoolUnavailable))
            }
        };
        let found = db
            .run(move |c| {
                api_keys::table
                    .filter(api_keys::key.eq(token))
                    .first::<ApiKey>(c)
                    .optional()
            })
            .await;
        match found {
            Ok(Some(key)) if !key.is_expired() => Outcome::Success(AuthenticatedKey { key }),
            Ok(_) => Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
            Err(e) => Outcome::Error((Status::InternalServerError, ApiError::Database(e))),
        }
    }
}
