use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Integer};
use diesel::sqlite::Sqlite;
use rocket::form::{self, Strict};
use rocket::serde::json::Json;
use rocket::{FromForm, State};

use crate::config::ApiConfig;
use crate::db::SitrepDb;
use crate::error::ApiError;
use crate::models::{Appeal, Country, DisasterType, Document, Event, FieldReport, Region, Service};
use crate::resources::params::{
    validate_order, DateTimeArg, DateTimeRange, Filter, IdList, OrderSpec, StrList,
};
use crate::resources::views::{
    AppealView, CountryView, DisasterTypeView, DocumentView, EventDetailView, EventView,
    FieldReportView, RegionView, ServiceView,
};
use crate::resources::{Page, PageSpec, RequestContext};
use crate::schema::{
    appeals, countries, disaster_types, documents, events, field_report_countries, field_reports,
    regions, services,
};

pub fn core_routes() -> Vec<rocket::Route> {
    rocket::routes![
        disaster_type_list,
        disaster_type_detail,
        region_list,
        region_detail,
        country_list,
        country_detail,
        event_list,
        event_detail,
        appeal_list,
        appeal_detail,
        field_report_list,
        field_report_detail,
        document_list,
        document_detail,
        service_list,
        service_detail,
    ]
}

const DISASTER_TYPE_ORDERING: &[&str] = &["name"];

#[derive(FromForm)]
pub struct DisasterTypeParams {
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn disaster_type_query(p: &DisasterTypeParams) -> disaster_types::BoxedQuery<'static, Sqlite> {
    let mut q = disaster_types::table.into_boxed();
    if let Some(v) = &p.name.0 {
        q = q.filter(disaster_types::name.eq(v.clone()));
    }
    if let Some(list) = &p.name__in.0 {
        q = q.filter(disaster_types::name.eq_any(list.0.clone()));
    }
    q
}

fn disaster_type_order(
    mut q: disaster_types::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> disaster_types::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("name", false) => q.then_order_by(disaster_types::name.asc()),
            ("name", true) => q.then_order_by(disaster_types::name.desc()),
            _ => q,
        };
    }
    q.then_order_by(disaster_types::id.asc())
}

#[rocket::get("/disaster_type?<params..>")]
pub async fn disaster_type_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<DisasterTypeParams>, form::Errors<'_>>,
) -> Result<Json<Page<DisasterTypeView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, DISASTER_TYPE_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<DisasterTypeView>), ApiError> {
            let total = disaster_type_query(&params).count().get_result(c)?;
            let rows: Vec<DisasterType> = disaster_type_order(disaster_type_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, rows.into_iter().map(DisasterTypeView::from).collect()))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/disaster_type/<id>")]
pub async fn disaster_type_detail(
    db: SitrepDb,
    id: i32,
) -> Result<Json<DisasterTypeView>, ApiError> {
    let row = db
        .run(move |c| disaster_types::table.find(id).first::<DisasterType>(c).optional())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(row.into()))
}

const REGION_ORDERING: &[&str] = &["name"];

#[derive(FromForm)]
pub struct RegionParams {
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn region_query(p: &RegionParams) -> regions::BoxedQuery<'static, Sqlite> {
    let mut q = regions::table.into_boxed();
    if let Some(v) = &p.name.0 {
        q = q.filter(regions::name.eq(v.clone()));
    }
    if let Some(list) = &p.name__in.0 {
        q = q.filter(regions::name.eq_any(list.0.clone()));
    }
    q
}

fn region_order(
    mut q: regions::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> regions::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("name", false) => q.then_order_by(regions::name.asc()),
            ("name", true) => q.then_order_by(regions::name.desc()),
            _ => q,
        };
    }
    q.then_order_by(regions::id.asc())
}

#[rocket::get("/region?<params..>")]
pub async fn region_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<RegionParams>, form::Errors<'_>>,
) -> Result<Json<Page<RegionView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, REGION_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<RegionView>), ApiError> {
            let total = region_query(&params).count().get_result(c)?;
            let rows: Vec<Region> = region_order(region_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, rows.into_iter().map(RegionView::from).collect()))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/region/<id>")]
pub async fn region_detail(db: SitrepDb, id: i32) -> Result<Json<RegionView>, ApiError> {
    let row = db
        .run(move |c| regions::table.find(id).first::<Region>(c).optional())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(row.into()))
}

const COUNTRY_ORDERING: &[&str] = &["name", "iso"];

#[derive(FromForm)]
pub struct CountryParams {
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub iso: Filter<String>,
    pub iso__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn country_query(p: &CountryParams) -> countries::BoxedQuery<'static, Sqlite> {
    let mut q = countries::table.into_boxed();
    if let Some(v) = &p.name.0 {
        q = q.filter(countries::name.eq(v.clone()));
    }
    if let Some(list) = &p.name__in.0 {
        q = q.filter(countries::name.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.iso.0 {
        q = q.filter(countries::iso.eq(v.clone()));
    }
    if let Some(list) = &p.iso__in.0 {
        q = q.filter(countries::iso.eq_any(list.0.clone()));
    }
    q
}

fn country_order(
    mut q: countries::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> countries::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("name", false) => q.then_order_by(countries::name.asc()),
            ("name", true) => q.then_order_by(countries::name.desc()),
            ("iso", false) => q.then_order_by(countries::iso.asc()),
            ("iso", true) => q.then_order_by(countries::iso.desc()),
            _ => q,
        };
    }
    q.then_order_by(countries::id.asc())
}

#[rocket::get("/country?<params..>")]
pub async fn country_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<CountryParams>, form::Errors<'_>>,
) -> Result<Json<Page<CountryView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, COUNTRY_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<CountryView>), ApiError> {
            let total = country_query(&params).count().get_result(c)?;
            let rows: Vec<Country> = country_order(country_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, rows.into_iter().map(CountryView::from).collect()))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/country/<id>")]
pub async fn country_detail(db: SitrepDb, id: i32) -> Result<Json<CountryView>, ApiError> {
    let row = db
        .run(move |c| countries::table.find(id).first::<Country>(c).optional())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(row.into()))
}

const EVENT_ORDERING: &[&str] = &["name", "created_at"];

#[derive(FromForm)]
pub struct EventParams {
    pub eid: Filter<i32>,
    pub eid__in: Filter<IdList>,
    pub dtype: Filter<i32>,
    pub dtype__in: Filter<IdList>,
    pub status: Filter<String>,
    pub status__in: Filter<StrList>,
    pub region: Filter<String>,
    pub region__in: Filter<StrList>,
    pub code: Filter<String>,
    pub created_at__gt: Filter<DateTimeArg>,
    pub created_at__gte: Filter<DateTimeArg>,
    pub created_at__lt: Filter<DateTimeArg>,
    pub created_at__lte: Filter<DateTimeArg>,
    pub created_at__range: Filter<DateTimeRange>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn event_query(p: &EventParams) -> events::BoxedQuery<'static, Sqlite> {
    let mut q = events::table.into_boxed();
    if let Some(v) = p.eid.0 {
        q = q.filter(events::eid.eq(v));
    }
    if let Some(list) = &p.eid__in.0 {
        q = q.filter(events::eid.eq_any(list.0.clone()));
    }
    if let Some(v) = p.dtype.0 {
        q = q.filter(events::dtype_id.eq(v));
    }
    if let Some(list) = &p.dtype__in.0 {
        q = q.filter(events::dtype_id.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.status.0 {
        q = q.filter(events::status.eq(v.clone()));
    }
    if let Some(list) = &p.status__in.0 {
        q = q.filter(events::status.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.region.0 {
        q = q.filter(events::region.eq(v.clone()));
    }
    if let Some(list) = &p.region__in.0 {
        q = q.filter(events::region.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.code.0 {
        q = q.filter(events::code.eq(v.clone()));
    }
    if let Some(v) = p.created_at__gt.0 {
        q = q.filter(events::created_at.gt(v.0));
    }
    if let Some(v) = p.created_at__gte.0 {
        q = q.filter(events::created_at.ge(v.0));
    }
    if let Some(v) = p.created_at__lt.0 {
        q = q.filter(events::created_at.lt(v.0));
    }
    if let Some(v) = p.created_at__lte.0 {
        q = q.filter(events::created_at.le(v.0));
    }
    if let Some(r) = p.created_at__range.0 {
        q = q.filter(events::created_at.between(r.lower, r.upper));
    }
    q
}

fn event_order(
    mut q: events::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> events::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("name", false) => q.then_order_by(events::name.asc()),
            ("name", true) => q.then_order_by(events::name.desc()),
            ("created_at", false) => q.then_order_by(events::created_at.asc()),
            ("created_at", true) => q.then_order_by(events::created_at.desc()),
            _ => q,
        };
    }
    q.then_order_by(events::id.asc())
}

#[rocket::get("/event?<params..>")]
pub async fn event_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<EventParams>, form::Errors<'_>>,
) -> Result<Json<Page<EventView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, EVENT_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<EventView>), ApiError> {
            let total = event_query(&params).count().get_result(c)?;
            let rows: Vec<Event> = event_order(event_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, EventView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/event/<id>")]
pub async fn event_detail(db: SitrepDb, id: i32) -> Result<Json<EventDetailView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<EventDetailView>, ApiError> {
            match events::table.find(id).first::<Event>(c).optional()? {
                Some(event) => Ok(Some(EventDetailView::load(event, c)?)),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const APPEAL_ORDERING: &[&str] = &["start_date", "end_date", "aid", "event", "country"];

#[derive(FromForm)]
pub struct AppealParams {
    pub aid: Filter<String>,
    pub event: Filter<i32>,
    pub event__in: Filter<IdList>,
    pub country: Filter<i32>,
    pub country__in: Filter<IdList>,
    pub sector: Filter<String>,
    pub sector__in: Filter<StrList>,
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
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn appeal_query(p: &AppealParams) -> appeals::BoxedQuery<'static, Sqlite> {
    let mut q = appeals::table.into_boxed();
    if let Some(v) = &p.aid.0 {
        q = q.filter(appeals::aid.eq(v.clone()));
    }
    if let Some(v) = p.event.0 {
        q = q.filter(appeals::event_id.eq(v));
    }
    if let Some(list) = &p.event__in.0 {
        q = q.filter(appeals::event_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.country.0 {
        q = q.filter(appeals::country_id.eq(v));
    }
    if let Some(list) = &p.country__in.0 {
        q = q.filter(appeals::country_id.eq_any(list.0.clone()));
    }
    if let Some(v) = &p.sector.0 {
        q = q.filter(appeals::sector.eq(v.clone()));
    }
    if let Some(list) = &p.sector__in.0 {
        q = q.filter(appeals::sector.eq_any(list.0.clone()));
    }
    if let Some(v) = p.start_date__gt.0 {
        q = q.filter(appeals::start_date.gt(v.0));
    }
    if let Some(v) = p.start_date__gte.0 {
        q = q.filter(appeals::start_date.ge(v.0));
    }
    if let Some(v) = p.start_date__lt.0 {
        q = q.filter(appeals::start_date.lt(v.0));
    }
    if let Some(v) = p.start_date__lte.0 {
        q = q.filter(appeals::start_date.le(v.0));
    }
    if let Some(r) = p.start_date__range.0 {
        q = q.filter(appeals::start_date.between(r.lower, r.upper));
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
        q = q.filter(appeals::end_date.gt(v.0));
    }
    if let Some(v) = p.end_date__gte.0 {
        q = q.filter(appeals::end_date.ge(v.0));
    }
    if let Some(v) = p.end_date__lt.0 {
        q = q.filter(appeals::end_date.lt(v.0));
    }
    if let Some(v) = p.end_date__lte.0 {
        q = q.filter(appeals::end_date.le(v.0));
    }
    if let Some(r) = p.end_date__range.0 {
        q = q.filter(appeals::end_date.between(r.lower, r.upper));
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
    q
}

fn appeal_order(
    mut q: appeals::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> appeals::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("start_date", false) => q.then_order_by(appeals::start_date.asc()),
            ("start_date", true) => q.then_order_by(appeals::start_date.desc()),
            ("end_date", false) => q.then_order_by(appeals::end_date.asc()),
            ("end_date", true) => q.then_order_by(appeals::end_date.desc()),
            ("aid", false) => q.then_order_by(appeals::aid.asc()),
            ("aid", true) => q.then_order_by(appeals::aid.desc()),
            ("event", false) => q.then_order_by(appeals::event_id.asc()),
            ("event", true) => q.then_order_by(appeals::event_id.desc()),
            ("country", false) => q.then_order_by(appeals::country_id.asc()),
            ("country", true) => q.then_order_by(appeals::country_id.desc()),
            _ => q,
        };
    }
    q.then_order_by(appeals::id.asc())
}

#[rocket::get("/appeal?<params..>")]
pub async fn appeal_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<AppealParams>, form::Errors<'_>>,
) -> Result<Json<Page<AppealView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, APPEAL_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<AppealView>), ApiError> {
            let total = appeal_query(&params).count().get_result(c)?;
            let rows: Vec<Appeal> = appeal_order(appeal_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, AppealView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/appeal/<id>")]
pub async fn appeal_detail(db: SitrepDb, id: i32) -> Result<Json<AppealView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<AppealView>, ApiError> {
            match appeals::table.find(id).first::<Appeal>(c).optional()? {
                Some(row) => Ok(AppealView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const FIELD_REPORT_ORDERING: &[&str] = &["created_at", "rid", "dtype", "event", "status"];

#[derive(FromForm)]
pub struct FieldReportParams {
    pub rid: Filter<String>,
    pub dtype: Filter<i32>,
    pub dtype__in: Filter<IdList>,
    pub event: Filter<i32>,
    pub event__in: Filter<IdList>,
    pub status: Filter<i32>,
    pub status__in: Filter<IdList>,
    pub request_assistance: Filter<bool>,
    pub countries: Filter<i32>,
    pub countries__in: Filter<IdList>,
    pub created_at__gt: Filter<DateTimeArg>,
    pub created_at__gte: Filter<DateTimeArg>,
    pub created_at__lt: Filter<DateTimeArg>,
    pub created_at__lte: Filter<DateTimeArg>,
    pub created_at__range: Filter<DateTimeRange>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn field_report_query(p: &FieldReportParams) -> field_reports::BoxedQuery<'static, Sqlite> {
    let mut q = field_reports::table.into_boxed();
    if let Some(v) = &p.rid.0 {
        q = q.filter(field_reports::rid.eq(v.clone()));
    }
    if let Some(v) = p.dtype.0 {
        q = q.filter(field_reports::dtype_id.eq(v));
    }
    if let Some(list) = &p.dtype__in.0 {
        q = q.filter(field_reports::dtype_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.event.0 {
        q = q.filter(field_reports::event_id.eq(v));
    }
    if let Some(list) = &p.event__in.0 {
        q = q.filter(field_reports::event_id.eq_any(list.0.clone()));
    }
    if let Some(v) = p.status.0 {
        q = q.filter(field_reports::status.eq(v));
    }
    if let Some(list) = &p.status__in.0 {
        q = q.filter(field_reports::status.eq_any(list.0.clone()));
    }
    if let Some(v) = p.request_assistance.0 {
        q = q.filter(field_reports::request_assistance.eq(v));
    }
    // membership in the country link table, not a column on the report itself
    if let Some(v) = p.countries.0 {
        let linked = field_report_countries::table
            .filter(field_report_countries::country_id.eq(v))
            .select(field_report_countries::field_report_id);
        q = q.filter(field_reports::id.eq_any(linked));
    }
    if let Some(list) = &p.countries__in.0 {
        let linked = field_report_countries::table
            .filter(field_report_countries::country_id.eq_any(list.0.clone()))
            .select(field_report_countries::field_report_id);
        q = q.filter(field_reports::id.eq_any(linked));
    }
    if let Some(v) = p.created_at__gt.0 {
        q = q.filter(field_reports::created_at.gt(v.0));
    }
    if let Some(v) = p.created_at__gte.0 {
        q = q.filter(field_reports::created_at.ge(v.0));
    }
    if let Some(v) = p.created_at__lt.0 {
        q = q.filter(field_reports::created_at.lt(v.0));
    }
    if let Some(v) = p.created_at__lte.0 {
        q = q.filter(field_reports::created_at.le(v.0));
    }
    if let Some(r) = p.created_at__range.0 {
        q = q.filter(field_reports::created_at.between(r.lower, r.upper));
    }
    q
}

fn field_report_order(
    mut q: field_reports::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> field_reports::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("created_at", false) => q.then_order_by(field_reports::created_at.asc()),
            ("created_at", true) => q.then_order_by(field_reports::created_at.desc()),
            ("rid", false) => q.then_order_by(field_reports::rid.asc()),
            ("rid", true) => q.then_order_by(field_reports::rid.desc()),
            ("dtype", false) => q.then_order_by(field_reports::dtype_id.asc()),
            ("dtype", true) => q.then_order_by(field_reports::dtype_id.desc()),
            ("event", false) => q.then_order_by(field_reports::event_id.asc()),
            ("event", true) => q.then_order_by(field_reports::event_id.desc()),
            ("status", false) => q.then_order_by(field_reports::status.asc()),
            ("status", true) => q.then_order_by(field_reports::status.desc()),
            _ => q,
        };
    }
    q.then_order_by(field_reports::id.asc())
}

#[rocket::get("/field_report?<params..>")]
pub async fn field_report_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<FieldReportParams>, form::Errors<'_>>,
) -> Result<Json<Page<FieldReportView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, FIELD_REPORT_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<FieldReportView>), ApiError> {
            let total = field_report_query(&params).count().get_result(c)?;
            let rows: Vec<FieldReport> = field_report_order(field_report_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, FieldReportView::load_many(rows, c)?))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/field_report/<id>")]
pub async fn field_report_detail(
    db: SitrepDb,
    id: i32,
) -> Result<Json<FieldReportView>, ApiError> {
    let view = db
        .run(move |c| -> Result<Option<FieldReportView>, ApiError> {
            match field_reports::table.find(id).first::<FieldReport>(c).optional()? {
                Some(row) => Ok(FieldReportView::load_many(vec![row], c)?.pop()),
                None => Ok(None),
            }
        })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(view))
}

const DOCUMENT_ORDERING: &[&str] = &["name"];

#[derive(FromForm)]
pub struct DocumentParams {
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn document_query(p: &DocumentParams) -> documents::BoxedQuery<'static, Sqlite> {
    let mut q = documents::table.into_boxed();
    if let Some(v) = &p.name.0 {
        q = q.filter(documents::name.eq(v.clone()));
    }
    if let Some(list) = &p.name__in.0 {
        q = q.filter(documents::name.eq_any(list.0.clone()));
    }
    q
}

fn document_order(
    mut q: documents::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> documents::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("name", false) => q.then_order_by(documents::name.asc()),
            ("name", true) => q.then_order_by(documents::name.desc()),
            _ => q,
        };
    }
    q.then_order_by(documents::id.asc())
}

#[rocket::get("/document?<params..>")]
pub async fn document_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<DocumentParams>, form::Errors<'_>>,
) -> Result<Json<Page<DocumentView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, DOCUMENT_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<DocumentView>), ApiError> {
            let total = document_query(&params).count().get_result(c)?;
            let rows: Vec<Document> = document_order(document_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, rows.into_iter().map(DocumentView::from).collect()))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/document/<id>")]
pub async fn document_detail(db: SitrepDb, id: i32) -> Result<Json<DocumentView>, ApiError> {
    let row = db
        .run(move |c| documents::table.find(id).first::<Document>(c).optional())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(row.into()))
}

const SERVICE_ORDERING: &[&str] = &["name", "created_at"];

#[derive(FromForm)]
pub struct ServiceParams {
    pub name: Filter<String>,
    pub name__in: Filter<StrList>,
    pub deployed: Filter<bool>,
    pub location: Filter<String>,
    pub location__in: Filter<StrList>,
    pub order_by: OrderSpec,
    pub limit: Filter<i64>,
    pub offset: Filter<i64>,
}

fn service_query(p: &ServiceParams) -> services::BoxedQuery<'static, Sqlite> {
    let mut q = services::table.into_boxed();
    if let Some(v) = &p.name.0 {
        q = q.filter(services::name.eq(v.clone()));
    }
    if let Some(list) = &p.name__in.0 {
        q = q.filter(services::name.eq_any(list.0.clone()));
    }
    if let Some(v) = p.deployed.0 {
        q = q.filter(services::deployed.eq(v));
    }
    if let Some(v) = &p.location.0 {
        q = q.filter(services::location.eq(v.clone()));
    }
    if let Some(list) = &p.location__in.0 {
        q = q.filter(services::location.eq_any(list.0.clone()));
    }
    q
}

fn service_order(
    mut q: services::BoxedQuery<'static, Sqlite>,
    order: &[(&'static str, bool)],
) -> services::BoxedQuery<'static, Sqlite> {
    for &(field, descending) in order {
        q = match (field, descending) {
            ("name", false) => q.then_order_by(services::name.asc()),
            ("name", true) => q.then_order_by(services::name.desc()),
            ("created_at", false) => q.then_order_by(services::created_at.asc()),
            ("created_at", true) => q.then_order_by(services::created_at.desc()),
            _ => q,
        };
    }
    q.then_order_by(services::id.asc())
}

#[rocket::get("/service?<params..>")]
pub async fn service_list(
    db: SitrepDb,
    config: &State<ApiConfig>,
    ctx: RequestContext,
    params: Result<Strict<ServiceParams>, form::Errors<'_>>,
) -> Result<Json<Page<ServiceView>>, ApiError> {
    let params = params
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_inner();
    let spec = PageSpec::new(params.limit.0, params.offset.0, config.inner())?;
    let order = validate_order(&params.order_by, SERVICE_ORDERING)?;
    let (total, views) = db
        .run(move |c| -> Result<(i64, Vec<ServiceView>), ApiError> {
            let total = service_query(&params).count().get_result(c)?;
            let rows: Vec<Service> = service_order(service_query(&params), &order)
                .limit(spec.limit)
                .offset(spec.offset)
                .load(c)?;
            Ok((total, rows.into_iter().map(ServiceView::from).collect()))
        })
        .await?;
    Ok(Json(Page::new(views, total, spec, &ctx)))
}

#[rocket::get("/service/<id>")]
pub async fn service_detail(db: SitrepDb, id: i32) -> Result<Json<ServiceView>, ApiError> {
    let row = db
        .run(move |c| services::table.find(id).first::<Service>(c).optional())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(row.into()))
}
