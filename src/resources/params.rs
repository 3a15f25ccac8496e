use std::ops::Deref;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rocket::form::{self, DataField, FromForm, FromFormField, Options, ValueField};

use crate::error::ApiError;
use crate::models::EruType;

/// A single-valued query parameter that may be absent. Unlike `Option<T>` in
/// a form, a value that is present but fails to parse is a form error rather
/// than a silent `None`.
#[derive(Debug)]
pub struct Filter<T>(pub Option<T>);

#[rocket::async_trait]
impl<'v, T: FromFormField<'v>> FromForm<'v> for Filter<T> {
    type Context = Option<form::Result<'v, T>>;

    fn init(_opts: Options) -> Self::Context {
        None
    }

    fn push_value(ctxt: &mut Self::Context, field: ValueField<'v>) {
        *ctxt = Some(T::from_value(field));
    }

    async fn push_data(ctxt: &mut Self::Context, field: DataField<'v, '_>) {
        *ctxt = Some(T::from_data(field).await);
    }

    fn finalize(ctxt: Self::Context) -> form::Result<'v, Self> {
        match ctxt {
            None => Ok(Filter(None)),
            Some(Ok(value)) => Ok(Filter(Some(value))),
            Some(Err(errors)) => Err(errors),
        }
    }
}

impl<T> Deref for Filter<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Datetime filter value. Accepts `YYYY-MM-DD`, a bare ISO datetime, or an
/// RFC 3339 timestamp; zoned timestamps are converted to UTC.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeArg(pub NaiveDateTime);

#[rocket::async_trait]
impl<'r> FromFormField<'r> for DateTimeArg {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        parse_datetime(field.value)
            .map(Self)
            .ok_or_else(|| form::Error::validation("expected an ISO date or datetime").into())
    }
}

impl Deref for DateTimeArg {
    type Target = NaiveDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An inclusive datetime range, written `start,end`.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeRange {
    pub lower: NaiveDateTime,
    pub upper: NaiveDateTime,
}

#[rocket::async_trait]
impl<'r> FromFormField<'r> for DateTimeRange {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        let (lower, upper) = field
            .value
            .split_once(',')
            .ok_or_else(|| form::Error::validation("expected `start,end`"))?;
        let lower = parse_datetime(lower)
            .ok_or_else(|| form::Error::validation("range start is not a valid datetime"))?;
        let upper = parse_datetime(upper)
            .ok_or_else(|| form::Error::validation("range end is not a valid datetime"))?;
        if lower > upper {
            return Err(form::Error::validation("range start is after range end").into());
        }
        Ok(Self { lower, upper })
    }
}

pub struct IdList(pub Vec<i32>);

#[rocket::async_trait]
impl<'r> FromFormField<'r> for IdList {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        let ids = field
            .value
            .split(',')
            .map(|id_str| {
                id_str
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| form::Error::validation(e.to_string()).into())
            })
            .collect::<form::Result<_>>()?;
        Ok(Self(ids))
    }
}

impl Deref for IdList {
    type Target = Vec<i32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct StrList(pub Vec<String>);

#[rocket::async_trait]
impl<'r> FromFormField<'r> for StrList {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        Ok(Self(field.value.split(',').map(str::to_owned).collect()))
    }
}

impl Deref for StrList {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EruTypeArg(pub EruType);

fn eru_type_from_str(raw: &str) -> Option<EruType> {
    raw.trim().parse::<i32>().ok().and_then(EruType::from_tag)
}

#[rocket::async_trait]
impl<'r> FromFormField<'r> for EruTypeArg {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        eru_type_from_str(field.value)
            .map(Self)
            .ok_or_else(|| form::Error::validation("unknown ERU type tag").into())
    }
}

pub struct EruTypeList(pub Vec<EruType>);

#[rocket::async_trait]
impl<'r> FromFormField<'r> for EruTypeList {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        let kinds = field
            .value
            .split(',')
            .map(|tag| {
                eru_type_from_str(tag)
                    .ok_or_else(|| form::Error::validation("unknown ERU type tag").into())
            })
            .collect::<form::Result<_>>()?;
        Ok(Self(kinds))
    }
}

/// One `order_by` clause, `field` or `-field`.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

/// The collected `order_by` clauses of a request. The parameter may repeat and
/// each occurrence may hold a comma-separated list.
#[derive(Debug, Default)]
pub struct OrderSpec(pub Vec<OrderBy>);

#[rocket::async_trait]
impl<'v> FromForm<'v> for OrderSpec {
    type Context = Result<Vec<OrderBy>, form::Errors<'v>>;

    fn init(_opts: Options) -> Self::Context {
        Ok(Vec::new())
    }

    fn push_value(ctxt: &mut Self::Context, field: ValueField<'v>) {
        if ctxt.is_err() {
            return;
        }
        let mut parsed = Vec::new();
        for clause in field.value.split(',') {
            let (name, descending) = match clause.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (clause, false),
            };
            if name.is_empty() {
                *ctxt = Err(form::Error::validation("empty ordering field").into());
                return;
            }
            parsed.push(OrderBy {
                field: name.to_owned(),
                descending,
            });
        }
        if let Ok(clauses) = ctxt {
            clauses.extend(parsed);
        }
    }

    async fn push_data(ctxt: &mut Self::Context, field: DataField<'v, '_>) {
        *ctxt = Err(field.unexpected().into());
    }

    fn finalize(ctxt: Self::Context) -> form::Result<'v, Self> {
        ctxt.map(OrderSpec)
    }
}

/// Checks every ordering clause against a resource's allowed fields, returning
/// the canonical field names.
pub fn validate_order(
    spec: &OrderSpec,
    allowed: &'static [&'static str],
) -> Result<Vec<(&'static str, bool)>, ApiError> {
    spec.0
        .iter()
        .map(|clause| {
            allowed
                .iter()
                .find(|field| **field == clause.field)
                .map(|field| (*field, clause.descending))
                .ok_or_else(|| ApiError::BadOrdering(clause.field.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parse_datetime_accepts_the_documented_shapes() {
        assert_eq!(parse_datetime("2017-01-15"), Some(ts("2017-01-15 00:00:00")));
        assert_eq!(
            parse_datetime("2017-01-15T08:30:00"),
            Some(ts("2017-01-15 08:30:00"))
        );
        assert_eq!(
            parse_datetime("2017-01-15 08:30:00"),
            Some(ts("2017-01-15 08:30:00"))
        );
        // zoned timestamps normalize to UTC
        assert_eq!(
            parse_datetime("2017-01-15T08:30:00+02:00"),
            Some(ts("2017-01-15 06:30:00"))
        );
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime("15/01/2017"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn validate_order_resolves_direction_and_rejects_unknown_fields() {
        let spec = OrderSpec(vec![
            OrderBy {
                field: "start_date".to_owned(),
                descending: true,
            },
            OrderBy {
                field: "name".to_owned(),
                descending: false,
            },
        ]);
        let resolved = validate_order(&spec, &["name", "start_date"]).unwrap();
        assert_eq!(resolved, vec![("start_date", true), ("name", false)]);

        let spec = OrderSpec(vec![OrderBy {
            field: "altitude".to_owned(),
            descending: false,
        }]);
        let err = validate_order(&spec, &["name"]).unwrap_err();
        assert!(matches!(err, ApiError::BadOrdering(field) if field == "altitude"));
    }
}
