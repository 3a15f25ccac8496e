use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Integer};
use diesel::sqlite::Sqlite;
use rocket::form::{self, Strict};
use rocket::serde::json::Json;
use rocket::{FromForm, State};

use crate::auth::AuthenticatedKey;
use crate::config::ApiConfig;
use crate::db::SitrepDb;
use crate::error::ApiError;
use crate::models::{Eru, EruOwner, Fact, FactPerson, Heop, Rdrt, RdrtPerson};
use crate::resources::params::{
    validate_order, DateTimeArg, DateTimeRange, EruTypeArg, EruTypeList, Filter, IdList,
    OrderSpec, StrList,
};
use crate::resources::views::{
    EruOwnerView, EruView, FactPersonView, FactView, HeopView, RdrtPersonView, RdrtView,
};
use crate::resources::{Page, PageSpec, RequestContext};
use crate::schema::{eru_owners, erus, fact_people, facts, heops, rdrt_people, rdrts};

pub fn deployment_routes() -> Vec<rocket::Route> {
    rocket::routes![
        eru_owner_list,
        eru_owner_detail,
        eru_list,
        eru_detail,
        heop_list,
        heop_detail,
        fact_list,
        fact_detail,
        fact_person_list,
        fact_person_detail,
        rdrt_list,
        rdrt_detail,
        rdrt_person_list,
        rdrt_person_detail,
    ]
}

const ERU_OWNER_ORDERING: &[&str] = &["created_at", "national_society_country"];

#[derive(FromForm)]
pub struct EruOwnerParams {
    // `country` is accepted as an alias for the national society country
    pub country: Filter<i32>,
    pub country__in: Filter<IdList>,
    pub national_society_country: Filter<i32>,
    pub national_society_country__in: Filter<IdList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn eru_owner_query(p: &EruOwnerParams) -> eru_owners::BoxedQuery<'static, Sqlite> {
    let mut q = eru_owners::table.into_boxed();
    if let Some(v) = p.country.0 {
        q = q.filter(eru_owners::national_society_country_id.eq(v));
    }
    if let Some(list) = &p.country__in.0 {
        q = q.filter(eru_owners::national_society_country_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.national_society_country.0 {
        q = q.filter(eru_owners::national_society_country_id.eq(v));
    }
    if let Some(list) = &p.national_society_country__in.0 {
        q = q.filter(eru_owners::national_society_country_id.eq_any(list.0.clone()));
    }
    q
}

fn eru_owner_order(
    mut q: eru_owners::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> eru_owners::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("created_at", false) => q.then_order_by(eru_owners::created_at.asc()),
            ("created_at", true) => q.then_order_by(eru_owners::created_at.desc()),
            ("national_society_country", false) => {
                q.then_order_by(eru_owners::national_society_country_id.asc())
            }
            ("national_society_country", true) => {
                q.then_order_by(eru_owners::national_society_country_id.desc())
            }
            _ => q,
        };
    }
    q.then_order_by(eru_owners::id.asc())
}

#[rocket::get("/eru_owner?<params..>")]
pub async fn eru_owner_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<EruOwnerParams>, form::Errors<'_>>,
) -> Result<Json<Page<EruOwnerView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, ERU_OWNER_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<EruOwnerView>), ApiError> {
            let total = eru_owner_query(&params).count().get_result(c)?;
            let rows: Vec<EruOwner> = eru_owner_order(eru_owner_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, EruOwnerView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/eru_owner/<id>")]
pub async fn eru_owner_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<EruOwnerView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<EruOwnerView>, ApiError> {
            match eru_owners::table.find(id).first::<EruOwner>(c).optional()? {
                Some(row) => Ok(EruOwnerView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const ERU_ORDERING: &[&str] = &["type", "units", "eru_owner"];

#[derive(FromForm)]
pub struct EruParams {
    pub eru_owner: Filter<i32>,
    pub eru_owner__in: Filter<IdList>,
    pub eru_owner__national_society_country: Filter<i32>,
    pub eru_owner__national_society_country__in: Filter<IdList>,
    pub r#type: Filter<EruTypeArg>,
    pub type__in: Filter<EruTypeList>,
    pub deployed_to__in: Filter<IdList>,
    pub deployed_to__isnull: Filter<bool>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn eru_query(p: &EruParams) -> erus::BoxedQuery<'static, Sqlite> {
    let mut q = erus::table.into_boxed();
    if let Some(v) = p.eru_owner.0 {
        q = q.filter(erus::eru_owner_id.eq(v));
    }
    if let Some(list) = &p.eru_owner__in.0 {
        q = q.filter(erus::eru_owner_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.eru_owner__national_society_country.0 {
        let owners = eru_owners::table
            .filter(eru_owners::national_society_country_id.eq(v))
            .select(eru_owners::id);
        q = q.filter(erus::eru_owner_id.eq_any(owners));
    }
    if let Some(list) = &p.eru_owner__national_society_country__in.0 {
        let owners = eru_owners::table
            .filter(eru_owners::national_society_country_id.eq_any(list.0.clone()))
            .select(eru_owners::id);
        q = q.filter(erus::eru_owner_id.eq_any(owners));
    }
    if let Some(arg) = p.r#type.0 {
        q = q.filter(erus::type_.eq(arg.0));
    }
    if let Some(list) = &p.type__in.0 {
        q = q.filter(erus::type_.eq_any(list.0.clone()));
    }
    if let Some(list) = &p.deployed_to__in.0 {
        q = q.filter(erus::deployed_to_id.eq_any(list.0.clone()));
    }
    if let Some(isnull) = p.deployed_to__isnull.0 {
        q = if isnull {
            q.filter(erus::deployed_to_id.is_null())
        } else {
            q.filter(erus::deployed_to_id.is_not_null())
        };
    }
    q
}

fn eru_order(
    mut q: erus::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> erus::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("type", false) => q.then_order_by(erus::type_.asc()),
            ("type", true) => q.then_order_by(erus::type_.desc()),
            ("units", false) => q.then_order_by(erus::units.asc()),
            ("units", true) => q.then_order_by(erus::units.desc()),
            ("eru_owner", false) => q.then_order_by(erus::eru_owner_id.asc()),
            ("eru_owner", true) => q.then_order_by(erus::eru_owner_id.desc()),
            _ => q,
        };
    }
    q.then_order_by(erus::id.asc())
}

#[rocket::get("/eru?<params..>")]
pub async fn eru_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<EruParams>, form::Errors<'_>>,
) -> Result<Json<Page<EruView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, ERU_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<EruView>), ApiError> {
            let total = eru_query(&params).count().get_result(c)?;
            let rows: Vec<Eru> = eru_order(eru_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, EruView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/eru/<id>")]
pub async fn eru_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<EruView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<EruView>, ApiError> {
            match erus::table.find(id).first::<Eru>(c).optional()? {
                Some(row) => Ok(EruView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const HEOP_ORDERING: &[&str] = &[
    "start_date",
    "end_date",
    "country",
    "region",
    "event",
    "dtype",
    "person",
    "role",
];

#[derive(FromForm)]
pub struct HeopParams {
    pub start_date__gt: Filter<DateTimeArg>,
    pub start_date__gte: Filter<DateTimeArg>,
    pub start_date__lt: Filter<DateTimeArg>,
    pub start_date__lte: Filter<DateTimeArg>,
    pub start_date__range: Filter<DateTimeRange>,
    pub start_date__year: Filter<i32>,
    pub start_date__month: Filter<i32>,
    pub start_date__day: Filter<i32>,
    pub end_date__gt: Filter<DateTimeArg>,
    pub end_date__gte: Filter<DateTimeArg>,
    pub end_date__lt: Filter<DateTimeArg>,
    pub end_date__lte: Filter<DateTimeArg>,
    pub end_date__range: Filter<DateTimeRange>,
    pub end_date__year: Filter<i32>,
    pub end_date__month: Filter<i32>,
    pub end_date__day: Filter<i32>,
    pub country: Filter<i32>,
    pub country__in: Filter<IdList>,
    pub region: Filter<i32>,
    pub region__in: Filter<IdList>,
    pub event: Filter<i32>,
    pub event__in: Filter<IdList>,
    pub dtype: Filter<i32>,
    pub dtype__in: Filter<IdList>,
    pub person: Filter<String>,
    pub person__in: Filter<StrList>,
    pub role: Filter<String>,
    pub role__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn heop_query(p: &HeopParams) -> heops::BoxedQuery<'static, Sqlite> {
    let mut q = heops::table.into_boxed();
    if let Some(v) = p.start_date__gt.0 {
        q = q.filter(heops::start_date.gt(v.0));
    }
    if let Some(v) = p.start_date__gte.0 {
        q = q.filter(heops::start_date.ge(v.0));
    }
    if let Some(v) = p.start_date__lt.0 {
        q = q.filter(heops::start_date.lt(v.0));
    }
    if let Some(v) = p.start_date__lte.0 {
        q = q.filter(heops::start_date.le(v.0));
    }
    if let Some(r) = p.start_date__range.0 {
        q = q.filter(heops::start_date.between(r.lower, r.upper));
    }
    if let Some(v) = p.start_date__year.0 {
        q = q.filter(
            sql::<Bool>("CAST(strftime('%Y', start_date) AS INTEGER) = ").bind::<Integer, _>(v),
        );
    }
    if let Some(v) = p.start_date__month.0 {
        q = q.filter(
            sql::<Bool>("CAST(strftime('%m', start_date) AS INTEGER) = ").bind::<Integer, _>(v),
        );
    }
    if let Some(v) = p.start_date__day.0 {
        q = q.filter(
            sql::<Bool>("CAST(strftime('%d', start_date) AS INTEGER) = ").bind::<Integer, _>(v),
        );
    }
    if let Some(v) = p.end_date__gt.0 {
        q = q.filter(heops::end_date.gt(v.0));
    }
    if let Some(v) = p.end_date__gte.0 {
        q = q.filter(heops::end_date.ge(v.0));
    }
    if let Some(v) = p.end_date__lt.0 {
        q = q.filter(heops::end_date.lt(v.0));
    }
    if let Some(v) = p.end_date__lte.0 {
        q = q.filter(heops::end_date.le(v.0));
    }
    if let Some(r) = p.end_date__range.0 {
        q = q.filter(heops::end_date.between(r.lower, r.upper));
    }
    if let Some(v) = p.end_date__year.0 {
        q = q.filter(
            sql::<Bool>("CAST(strftime('%Y', end_date) AS INTEGER) = ").bind::<Integer, _>(v),
        );
    }
    if let Some(v) = p.end_date__month.0 {
        q = q.filter(
            sql::<Bool>("CAST(strftime('%m', end_date) AS INTEGER) = ").bind::<Integer, _>(v),
        );
    }
    if let Some(v) = p.end_date__day.0 {
        q = q.filter(
            sql::<Bool>("CAST(strftime('%d', end_date) AS INTEGER) = ").bind::<Integer, _>(v),
        );
    }
    if let Some(v) = p.country.0 {
        q = q.filter(heops::country_id.eq(v));
    }
    if let Some(list) = &p.country__in.0 {
        q = q.filter(heops::country_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.region.0 {
        q = q.filter(heops::region_id.eq(v));
    }
    if let Some(list) = &p.region__in.0 {
        q = q.filter(heops::region_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.event.0 {
        q = q.filter(heops::event_id.eq(v));
    }
    if let Some(list) = &p.event__in.0 {
        q = q.filter(heops::event_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.dtype.0 {
        q = q.filter(heops::dtype_id.eq(v));
    }
    if let Some(list) = &p.dtype__in.0 {
        q = q.filter(heops::dtype_id.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.person.0 {
        q = q.filter(heops::person.eq(v.clone()));
    }
    if let Some(list) = &p.person__in.0 {
        q = q.filter(heops::person.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.role.0 {
        q = q.filter(heops::role.eq(v.clone()));
    }
    if let Some(list) = &p.role__in.0 {
        q = q.filter(heops::role.eq_any(list.0.clone()));
    }
    q
}

fn heop_order(
    mut q: heops::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> heops::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("start_date", false) => q.then_order_by(heops::start_date.asc()),
            ("start_date", true) => q.then_order_by(heops::start_date.desc()),
            ("end_date", false) => q.then_order_by(heops::end_date.asc()),
            ("end_date", true) => q.then_order_by(heops::end_date.desc()),
            ("country", false) => q.then_order_by(heops::country_id.asc()),
            ("country", true) => q.then_order_by(heops::country_id.desc()),
            ("region", false) => q.then_order_by(heops::region_id.asc()),
            ("region", true) => q.then_order_by(heops::region_id.desc()),
            ("event", false) => q.then_order_by(heops::event_id.asc()),
            ("event", true) => q.then_order_by(heops::event_id.desc()),
            ("dtype", false) => q.then_order_by(heops::dtype_id.asc()),
            ("dtype", true) => q.then_order_by(heops::dtype_id.desc()),
            ("person", false) => q.then_order_by(heops::person.asc()),
            ("person", true) => q.then_order_by(heops::person.desc()),
            ("role", false) => q.then_order_by(heops::role.asc()),
            ("role", true) => q.then_order_by(heops::role.desc()),
            _ => q,
        };
    }
    q.then_order_by(heops::id.asc())
}

#[rocket::get("/heop?<params..>")]
pub async fn heop_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<HeopParams>, form::Errors<'_>>,
) -> Result<Json<Page<HeopView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, HEOP_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<HeopView>), ApiError> {
            let total = heop_query(&params).count().get_result(c)?;
            let rows: Vec<Heop> = heop_order(heop_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, HeopView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/heop/<id>")]
pub async fn heop_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<HeopView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<HeopView>, ApiError> {
            match heops::table.find(id).first::<Heop>(c).optional()? {
                Some(row) => Ok(HeopView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const FACT_ORDERING: &[&str] = &["start_date", "country", "region", "event", "dtype"];

#[derive(FromForm)]
pub struct FactParams {
    pub start_date__gt: Filter<DateTimeArg>,
    pub start_date__gte: Filter<DateTimeArg>,
    pub start_date__lt: Filter<DateTimeArg>,
    pub start_date__lte: Filter<DateTimeArg>,
    pub start_date__range: Filter<DateTimeRange>,
    pub start_date__year: Filter<i32>,
    pub start_date__month: Filter<i32>,
    pub start_date__day: Filter<i32>,
    pub country: Filter<i32>,
    pub country__in: Filter<IdList>,
    pub region: Filter<i32>,
    pub region__in: Filter<IdList>,
    pub event: Filter<i32>,
    pub event__in: Filter<IdList>,
    pub dtype: Filter<i32>,
    pub dtype__in: Filter<IdList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

macro_rules! deployment_date_filters {
    ($q:ident, $p:ident, $table:ident) => {{
        if let Some(v) = $p.start_date__gt.0 {
            $q = $q.filter($table::start_date.gt(v.0));
        }
        if let Some(v) = $p.start_date__gte.0 {
            $q = $q.filter($table::start_date.ge(v.0));
        }
        if let Some(v) = $p.start_date__lt.0 {
            $q = $q.filter($table::start_date.lt(v.0));
        }
        if let Some(v) = $p.start_date__lte.0 {
            $q = $q.filter($table::start_date.le(v.0));
        }
        if let Some(r) = $p.start_date__range.0 {
            $q = $q.filter($table::start_date.between(r.lower, r.upper));
        }
        if let Some(v) = $p.start_date__year.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%Y', start_date) AS INTEGER) = ")
                    .bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.start_date__month.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%m', start_date) AS INTEGER) = ")
                    .bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.start_date__day.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%d', start_date) AS INTEGER) = ")
                    .bind::<Integer, _>(v),
            );
        }
    }};
}

fn fact_query(p: &FactParams) -> facts::BoxedQuery<'static, Sqlite> {
    let mut q = facts::table.into_boxed();
    deployment_date_filters!(q, p, facts);
    if let Some(v) = p.country.0 {
        q = q.filter(facts::country_id.eq(v));
    }
    if let Some(list) = &p.country__in.0 {
        q = q.filter(facts::country_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.region.0 {
        q = q.filter(facts::region_id.eq(v));
    }
    if let Some(list) = &p.region__in.0 {
        q = q.filter(facts::region_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.event.0 {
        q = q.filter(facts::event_id.eq(v));
    }
    if let Some(list) = &p.event__in.0 {
        q = q.filter(facts::event_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.dtype.0 {
        q = q.filter(facts::dtype_id.eq(v));
    }
    if let Some(list) = &p.dtype__in.0 {
        q = q.filter(facts::dtype_id.eq_any(list.0.clone()));
    }
    q
}

fn fact_order(
    mut q: facts::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> facts::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("start_date", false) => q.then_order_by(facts::start_date.asc()),
            ("start_date", true) => q.then_order_by(facts::start_date.desc()),
            ("country", false) => q.then_order_by(facts::country_id.asc()),
            ("country", true) => q.then_order_by(facts::country_id.desc()),
            ("region", false) => q.then_order_by(facts::region_id.asc()),
            ("region", true) => q.then_order_by(facts::region_id.desc()),
            ("event", false) => q.then_order_by(facts::event_id.asc()),
            ("event", true) => q.then_order_by(facts::event_id.desc()),
            ("dtype", false) => q.then_order_by(facts::dtype_id.asc()),
            ("dtype", true) => q.then_order_by(facts::dtype_id.desc()),
            _ => q,
        };
    }
    q.then_order_by(facts::id.asc())
}

#[rocket::get("/fact?<params..>")]
pub async fn fact_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<FactParams>, form::Errors<'_>>,
) -> Result<Json<Page<FactView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, FACT_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<FactView>), ApiError> {
            let total = fact_query(&params).count().get_result(c)?;
            let rows: Vec<Fact> = fact_order(fact_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, FactView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/fact/<id>")]
pub async fn fact_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<FactView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<FactView>, ApiError> {
            match facts::table.find(id).first::<Fact>(c).optional()? {
                Some(row) => Ok(FactView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const RDRT_ORDERING: &[&str] = &["start_date", "country", "region", "event", "dtype"];

#[derive(FromForm)]
pub struct RdrtParams {
    pub start_date__gt: Filter<DateTimeArg>,
    pub start_date__gte: Filter<DateTimeArg>,
    pub start_date__lt: Filter<DateTimeArg>,
    pub start_date__lte: Filter<DateTimeArg>,
    pub start_date__range: Filter<DateTimeRange>,
    pub start_date__year: Filter<i32>,
    pub start_date__month: Filter<i32>,
    pub start_date__day: Filter<i32>,
    pub country: Filter<i32>,
    pub country__in: Filter<IdList>,
    pub region: Filter<i32>,
    pub region__in: Filter<IdList>,
    pub event: Filter<i32>,
    pub event__in: Filter<IdList>,
    pub dtype: Filter<i32>,
    pub dtype__in: Filter<IdList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn rdrt_query(p: &RdrtParams) -> rdrts::BoxedQuery<'static, Sqlite> {
    let mut q = rdrts::table.into_boxed();
    deployment_date_filters!(q, p, rdrts);
    if let Some(v) = p.country.0 {
        q = q.filter(rdrts::country_id.eq(v));
    }
    if let Some(list) = &p.country__in.0 {
        q = q.filter(rdrts::country_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.region.0 {
        q = q.filter(rdrts::region_id.eq(v));
    }
    if let Some(list) = &p.region__in.0 {
        q = q.filter(rdrts::region_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.event.0 {
        q = q.filter(rdrts::event_id.eq(v));
    }
    if let Some(list) = &p.event__in.0 {
        q = q.filter(rdrts::event_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.dtype.0 {
        q = q.filter(rdrts::dtype_id.eq(v));
    }
    if let Some(list) = &p.dtype__in.0 {
        q = q.filter(rdrts::dtype_id.eq_any(list.0.clone()));
    }
    q
}

fn rdrt_order(
    mut q: rdrts::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> rdrts::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("start_date", false) => q.then_order_by(rdrts::start_date.asc()),
            ("start_date", true) => q.then_order_by(rdrts::start_date.desc()),
            ("country", false) => q.then_order_by(rdrts::country_id.asc()),
            ("country", true) => q.then_order_by(rdrts::country_id.desc()),
            ("region", false) => q.then_order_by(rdrts::region_id.asc()),
            ("region", true) => q.then_order_by(rdrts::region_id.desc()),
            ("event", false) => q.then_order_by(rdrts::event_id.asc()),
            ("event", true) => q.then_order_by(rdrts::event_id.desc()),
            ("dtype", false) => q.then_order_by(rdrts::dtype_id.asc()),
            ("dtype", true) => q.then_order_by(rdrts::dtype_id.desc()),
            _ => q,
        };
    }
    q.then_order_by(rdrts::id.asc())
}

#[rocket::get("/rdrt?<params..>")]
pub async fn rdrt_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<RdrtParams>, form::Errors<'_>>,
) -> Result<Json<Page<RdrtView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, RDRT_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<RdrtView>), ApiError> {
            let total = rdrt_query(&params).count().get_result(c)?;
            let rows: Vec<Rdrt> = rdrt_order(rdrt_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, RdrtView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/rdrt/<id>")]
pub async fn rdrt_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<RdrtView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<RdrtView>, ApiError> {
            match rdrts::table.find(id).first::<Rdrt>(c).optional()? {
                Some(row) => Ok(RdrtView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const PERSON_ORDERING: &[&str] = &[
    "start_date",
    "end_date",
    "name",
    "role",
    "society_deployed_from",
];

#[derive(FromForm)]
pub struct FactPersonParams {
    pub start_date__gt: Filter<DateTimeArg>,
    pub start_date__gte: Filter<DateTimeArg>,
    pub start_date__lt: Filter<DateTimeArg>,
    pub start_date__lte: Filter<DateTimeArg>,
    pub start_date__range: Filter<DateTimeRange>,
    pub start_date__year: Filter<i32>,
    pub start_date__month: Filter<i32>,
    pub start_date__day: Filter<i32>,
    pub end_date__gt: Filter<DateTimeArg>,
    pub end_date__gte: Filter<DateTimeArg>,
    pub end_date__lt: Filter<DateTimeArg>,
    pub end_date__lte: Filter<DateTimeArg>,
    pub end_date__range: Filter<DateTimeRange>,
    pub end_date__year: Filter<i32>,
    pub end_date__month: Filter<i32>,
    pub end_date__day: Filter<i32>,
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub role: Filter<String>,
    pub role__in: Filter<StrList>,
    pub society_deployed_from: Filter<String>,
    pub society_deployed_from__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

macro_rules! person_filters {
    ($q:ident, $p:ident, $table:ident) => {{
        if let Some(v) = $p.start_date__gt.0 {
            $q = $q.filter($table::start_date.gt(v.0));
        }
        if let Some(v) = $p.start_date__gte.0 {
            $q = $q.filter($table::start_date.ge(v.0));
        }
        if let Some(v) = $p.start_date__lt.0 {
            $q = $q.filter($table::start_date.lt(v.0));
        }
        if let Some(v) = $p.start_date__lte.0 {
            $q = $q.filter($table::start_date.le(v.0));
        }
        if let Some(r) = $p.start_date__range.0 {
            $q = $q.filter($table::start_date.between(r.lower, r.upper));
        }
        if let Some(v) = $p.start_date__year.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%Y', start_date) AS INTEGER) = ")
                    .bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.start_date__month.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%m', start_date) AS INTEGER) = ")
                    .bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.start_date__day.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%d', start_date) AS INTEGER) = ")
                    .bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.end_date__gt.0 {
            $q = $q.filter($table::end_date.gt(v.0));
        }
        if let Some(v) = $p.end_date__gte.0 {
            $q = $q.filter($table::end_date.ge(v.0));
        }
        if let Some(v) = $p.end_date__lt.0 {
            $q = $q.filter($table::end_date.lt(v.0));
        }
        if let Some(v) = $p.end_date__lte.0 {
            $q = $q.filter($table::end_date.le(v.0));
        }
        if let Some(r) = $p.end_date__range.0 {
            $q = $q.filter($table::end_date.between(r.lower, r.upper));
        }
        if let Some(v) = $p.end_date__year.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%Y', end_date) AS INTEGER) = ").bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.end_date__month.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%m', end_date) AS INTEGER) = ").bind::<Integer, _>(v),
            );
        }
        if let Some(v) = $p.end_date__day.0 {
            $q = $q.filter(
                sql::<Bool>("CAST(strftime('%d', end_date) AS INTEGER) = ").bind::<Integer, _>(v),
            );
        }
        if let Some(v) = &$p.name.0 {
            $q = $q.filter($table::name.eq(v.clone()));
        }
        if let Some(list) = &$p.name__in.0 {
            $q = $q.filter($table::name.eq_any(list.0.clone()));
        }
        if let Some(v) = &$p.role.0 {
            $q = $q.filter($table::role.eq(v.clone()));
        }
        if let Some(list) = &$p.role__in.0 {
            $q = $q.filter($table::role.eq_any(list.0.clone()));
        }
        if let Some(v) = &$p.society_deployed_from.0 {
            $q = $q.filter($table::society_deployed_from.eq(v.clone()));
        }
        if let Some(list) = &$p.society_deployed_from__in.0 {
            $q = $q.filter($table::society_deployed_from.eq_any(list.0.clone()));
        }
    }};
}

macro_rules! person_ordering {
    ($q:ident, $order:ident, $table:ident) => {{
        for &(field, descending) in $order {
            $q = match (field, descending) {
                ("start_date", false) => $q.then_order_by($table::start_date.asc()),
                ("start_date", true) => $q.then_order_by($table::start_date.desc()),
                ("end_date", false) => $q.then_order_by($table::end_date.asc()),
                ("end_date", true) => $q.then_order_by($table::end_date.desc()),
                ("name", false) => $q.then_order_by($table::name.asc()),
                ("name", true) => $q.then_order_by($table::name.desc()),
                ("role", false) => $q.then_order_by($table::role.asc()),
                ("role", true) => $q.then_order_by($table::role.desc()),
                ("society_deployed_from", false) => {
                    $q.then_order_by($table::society_deployed_from.asc())
                }
                ("society_deployed_from", true) => {
                    $q.then_order_by($table::society_deployed_from.desc())
                }
                _ => $q,
            };
        }
        $q.then_order_by($table::id.asc())
    }};
}

fn fact_person_query(p: &FactPersonParams) -> fact_people::BoxedQuery<'static, Sqlite> {
    let mut q = fact_people::table.into_boxed();
    person_filters!(q, p, fact_people);
    q
}

fn fact_person_order(
    mut q: fact_people::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> fact_people::BoxedQuery<'static, Sqlite> {
    person_ordering!(q, order, fact_people)
}

#[rocket::get("/fact_person?<params..>")]
pub async fn fact_person_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<FactPersonParams>, form::Errors<'_>>,
) -> Result<Json<Page<FactPersonView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, PERSON_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<FactPersonView>), ApiError> {
            let total = fact_person_query(&params).count().get_result(c)?;
            let rows: Vec<FactPerson> = fact_person_order(fact_person_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, FactPersonView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/fact_person/<id>")]
pub async fn fact_person_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<FactPersonView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<FactPersonView>, ApiError> {
            match fact_people::table.find(id).first::<FactPerson>(c).optional()? {
                Some(row) => Ok(FactPersonView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

#[derive(FromForm)]
pub struct RdrtPersonParams {
    pub start_date__gt: Filter<DateTimeArg>,
    pub start_date__gte: Filter<DateTimeArg>,
    pub start_date__lt: Filter<DateTimeArg>,
    pub start_date__lte: Filter<DateTimeArg>,
    pub start_date__range: Filter<DateTimeRange>,
    pub start_date__year: Filter<i32>,
    pub start_date__month: Filter<i32>,
    pub start_date__day: Filter<i32>,
    pub end_date__gt: Filter<DateTimeArg>,
    pub end_date__gte: Filter<DateTimeArg>,
    pub end_date__lt: Filter<DateTimeArg>,
    pub end_date__lte: Filter<DateTimeArg>,
    pub end_date__range: Filter<DateTimeRange>,
    pub end_date__year: Filter<i32>,
    pub end_date__month: Filter<i32>,
    pub end_date__day: Filter<i32>,
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub role: Filter<String>,
    pub role__in: Filter<StrList>,
    pub society_deployed_from: Filter<String>,
    pub society_deployed_from__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn rdrt_person_query(p: &RdrtPersonParams) -> rdrt_people::BoxedQuery<'static, Sqlite> {
    let mut q = rdrt_people::table.into_boxed();
    person_filters!(q, p, rdrt_people);
    q
}

fn rdrt_person_order(
    mut q: rdrt_people::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> rdrt_people::BoxedQuery<'static, Sqlite> {
    person_ordering!(q, order, rdrt_people)
}

#[rocket::get("/rdrt_person?<params..>")]
pub async fn rdrt_person_list(
    _key: AuthenticatedKey,
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<RdrtPersonParams>, form::Errors<'_>>,
) -> Result<Json<Page<RdrtPersonView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, PERSON_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<RdrtPersonView>), ApiError> {
            let total = rdrt_person_query(&params).count().get_result(c)?;
            let rows: Vec<RdrtPerson> = rdrt_person_order(rdrt_person_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, RdrtPersonView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/rdrt_person/<id>")]
pub async fn rdrt_person_detail(
    _key: AuthenticatedKey,
    db: SitrepDb,
    id: i32,
) -> Result<Json<RdrtPersonView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<RdrtPersonView>, ApiError> {
            match rdrt_people::table.find(id).first::<RdrtPerson>(c).optional()? {
                Some(row) => Ok(RdrtPersonView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}
