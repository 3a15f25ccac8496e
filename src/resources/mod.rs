mod core;
mod deployments;
mod params;
mod views;

pub use self::core::core_routes;
pub use self::deployments::deployment_routes;
pub use params::{
    DateTimeArg, DateTimeRange, EruTypeArg, EruTypeList, Filter, IdList, OrderBy, OrderSpec,
    StrList,
};
pub use views::*;

use rocket::http::Status;
use rocket::request::{self, FromRequest, Request};
use rocket::serde::json::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Resolved paging for one request, after defaults and caps are applied.
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub limit: i64,
    pub offset: i64,
}

impl PageSpec {
    pub fn new(
        limit: Option<i64>,
        offset: Option<i64>,
        config: &ApiConfig,
    ) -> Result<PageSpec, ApiError> {
        let limit = limit.unwrap_or(config.default_limit);
        let offset = offset.unwrap_or(0);
        if limit < 0 {
            return Err(ApiError::BadRequest("limit must not be negative".to_owned()));
        }
        if offset < 0 {
            return Err(ApiError::BadRequest("offset must not be negative".to_owned()));
        }
        // limit=0 asks for the largest allowed page
        let limit = if limit == 0 {
            config.max_limit
        } else {
            limit.min(config.max_limit)
        };
        Ok(PageSpec { limit, offset })
    }
}

/// The path and raw query of the request being served, for building paging
/// links that preserve every filter.
pub struct RequestContext {
    path: String,
    query: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestContext {
    type Error = std::convert::Infallible;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        request::Outcome::Success(RequestContext {
            path: req.uri().path().as_str().to_owned(),
            query: req.uri().query().map(|q| q.as_str().to_owned()),
        })
    }
}

impl RequestContext {
    /// URI for the same request with different paging.
    fn page_uri(&self, limit: i64, offset: i64) -> String {
        let mut pairs: Vec<String> = self
            .query
            .as_deref()
            .unwrap_or("")
            .split('&')
            .filter(|pair| {
                !pair.is_empty()
                    && !pair.starts_with("limit=")
                    && !pair.starts_with("offset=")
                    && *pair != "limit"
                    && *pair != "offset"
            })
            .map(str::to_owned)
            .collect();
        pairs.push(format!("limit={limit}"));
        pairs.push(format!("offset={offset}"));
        format!("{}?{}", self.path, pairs.join("&"))
    }
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub limit: i64,
    pub offset: i64,
    pub total_count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Standard list envelope: paging metadata plus the page of objects.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub objects: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(objects: Vec<T>, total_count: i64, spec: PageSpec, ctx: &RequestContext) -> Page<T> {
        let next = (spec.offset + spec.limit < total_count)
            .then(|| ctx.page_uri(spec.limit, spec.offset + spec.limit));
        let previous = (spec.offset > 0)
            .then(|| ctx.page_uri(spec.limit, (spec.offset - spec.limit).max(0)));
        Page {
            meta: PageMeta {
                limit: spec.limit,
                offset: spec.offset,
                total_count,
                next,
                previous,
            },
            objects,
        }
    }
}

#[rocket::catch(401)]
fn unauthorized() -> Json<Value> {
    Json(json!({ "error": "authentication required" }))
}

#[rocket::catch(404)]
fn not_found() -> Json<Value> {
    Json(json!({ "error": "not found" }))
}

#[rocket::catch(default)]
fn fallback(status: Status, _req: &Request) -> Json<Value> {
    Json(json!({ "error": status.reason().unwrap_or("request failed") }))
}

pub fn catchers() -> Vec<rocket::Catcher> {
    rocket::catchers![unauthorized, not_found, fallback]
}
