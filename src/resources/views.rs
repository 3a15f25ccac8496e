use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use itertools::Itertools;
use serde::Serialize;

use crate::models::{
    Appeal, Country, DisasterType, Document, Eru, EruOwner, EruType, Event, Fact, FactPerson,
    FieldReport, FieldReportCountry, Heop, ModelError, Rdrt, RdrtPerson, Region, Service,
};
use crate::schema::{
    countries, disaster_types, eru_owners, erus, events, fact_people, facts,
    field_report_countries, rdrt_people, rdrts, regions,
};

fn countries_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, Country>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(countries::table
        .filter(countries::id.eq_any(ids))
        .load::<Country>(conn)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect())
}

fn regions_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, Region>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(regions::table
        .filter(regions::id.eq_any(ids))
        .load::<Region>(conn)?
        .into_iter()
        .map(|r| (r.id, r))
        .collect())
}

fn disaster_types_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, DisasterType>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(disaster_types::table
        .filter(disaster_types::id.eq_any(ids))
        .load::<DisasterType>(conn)?
        .into_iter()
        .map(|d| (d.id, d))
        .collect())
}

fn events_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, Event>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(events::table
        .filter(events::id.eq_any(ids))
        .load::<Event>(conn)?
        .into_iter()
        .map(|e| (e.id, e))
        .collect())
}

fn eru_owners_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, EruOwner>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(eru_owners::table
        .filter(eru_owners::id.eq_any(ids))
        .load::<EruOwner>(conn)?
        .into_iter()
        .map(|o| (o.id, o))
        .collect())
}

fn facts_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, Fact>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(facts::table
        .filter(facts::id.eq_any(ids))
        .load::<Fact>(conn)?
        .into_iter()
        .map(|f| (f.id, f))
        .collect())
}

fn rdrts_by_id(
    ids: impl IntoIterator<Item = i32>,
    conn: &mut SqliteConnection,
) -> QueryResult<HashMap<i32, Rdrt>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    Ok(rdrts::table
        .filter(rdrts::id.eq_any(ids))
        .load::<Rdrt>(conn)?
        .into_iter()
        .map(|r| (r.id, r))
        .collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryView {
    pub id: i32,
    pub name: String,
    pub iso: Option<String>,
    pub society_name: String,
}

impl From<Country> for CountryView {
    fn from(c: Country) -> CountryView {
        CountryView {
            id: c.id,
            name: c.name,
            iso: c.iso,
            society_name: c.society_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionView {
    pub id: i32,
    pub name: String,
}

impl From<Region> for RegionView {
    fn from(r: Region) -> RegionView {
        RegionView {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisasterTypeView {
    pub id: i32,
    pub name: String,
    pub summary: String,
}

impl From<DisasterType> for DisasterTypeView {
    fn from(d: DisasterType) -> DisasterTypeView {
        DisasterTypeView {
            id: d.id,
            name: d.name,
            summary: d.summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub id: i32,
    pub name: String,
    pub uri: String,
}

impl From<Document> for DocumentView {
    fn from(d: Document) -> DocumentView {
        DocumentView {
            id: d.id,
            name: d.name,
            uri: d.uri,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub id: i32,
    pub name: String,
    pub summary: String,
    pub deployed: bool,
    pub location: String,
    pub created_at: NaiveDateTime,
}

impl From<Service> for ServiceView {
    fn from(s: Service) -> ServiceView {
        ServiceView {
            id: s.id,
            name: s.name,
            summary: s.summary,
            deployed: s.deployed,
            location: s.location,
            created_at: s.created_at,
        }
    }
}

/// Event as embedded in other resources: its own columns, nothing nested.
/// Keeps the payload bounded when events and their dependents reference each
/// other.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedEventView {
    pub id: i32,
    pub eid: Option<i32>,
    pub name: String,
    pub summary: String,
    pub status: String,
    pub region: String,
    pub code: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<Event> for RelatedEventView {
    fn from(e: Event) -> RelatedEventView {
        RelatedEventView {
            id: e.id,
            eid: e.eid,
            name: e.name,
            summary: e.summary,
            status: e.status,
            region: e.region,
            code: e.code,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventView {
    pub id: i32,
    pub eid: Option<i32>,
    pub name: String,
    pub summary: String,
    pub status: String,
    pub region: String,
    pub code: Option<String>,
    pub created_at: NaiveDateTime,
    pub dtype: Option<DisasterTypeView>,
}

fn event_view(e: Event, dtypes: &HashMap<i32, DisasterType>) -> EventView {
    let dtype = e
        .dtype_id
        .and_then(|id| dtypes.get(&id))
        .cloned()
        .map(DisasterTypeView::from);
    EventView {
        id: e.id,
        eid: e.eid,
        name: e.name,
        summary: e.summary,
        status: e.status,
        region: e.region,
        code: e.code,
        created_at: e.created_at,
        dtype,
    }
}

impl EventView {
    pub fn load_many(rows: Vec<Event>, conn: &mut SqliteConnection) -> QueryResult<Vec<EventView>> {
        let dtypes = disaster_types_by_id(rows.iter().filter_map(|e| e.dtype_id), conn)?;
        Ok(rows.into_iter().map(|e| event_view(e, &dtypes)).collect())
    }
}

/// Event detail: the event plus its derived fields, which need the linked
/// appeals and field reports.
#[derive(Debug, Serialize)]
pub struct EventDetailView {
    #[serde(flatten)]
    pub event: EventView,
    pub countries: Vec<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl EventDetailView {
    pub fn load(event: Event, conn: &mut SqliteConnection) -> Result<EventDetailView, ModelError> {
        let countries = event.countries(conn)?;
        let start_date = match event.start_date(conn) {
            Ok(d) => Some(d),
            Err(ModelError::NoAppeals(_)) => None,
            Err(e) => return Err(e),
        };
        let end_date = match event.end_date(conn) {
            Ok(d) => Some(d),
            Err(ModelError::NoAppeals(_)) => None,
            Err(e) => return Err(e),
        };
        let dtypes = disaster_types_by_id(event.dtype_id, conn)?;
        Ok(EventDetailView {
            event: event_view(event, &dtypes),
            countries,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AppealView {
    pub id: i32,
    pub aid: String,
    pub name: Option<String>,
    pub summary: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub sector: String,
    pub num_beneficiaries: i32,
    pub amount_requested: f64,
    pub amount_funded: f64,
    pub created_at: NaiveDateTime,
    pub event: Option<RelatedEventView>,
    pub country: Option<CountryView>,
}

impl AppealView {
    pub fn load_many(
        rows: Vec<Appeal>,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<AppealView>> {
        let events = events_by_id(rows.iter().filter_map(|a| a.event_id), conn)?;
        let countries = countries_by_id(rows.iter().filter_map(|a| a.country_id), conn)?;
        Ok(rows
            .into_iter()
            .map(|a| AppealView {
                id: a.id,
                aid: a.aid,
                name: a.name,
                summary: a.summary,
                start_date: a.start_date,
                end_date: a.end_date,
                sector: a.sector,
                num_beneficiaries: a.num_beneficiaries,
                amount_requested: a.amount_requested,
                amount_funded: a.amount_funded,
                created_at: a.created_at,
                event: a
                    .event_id
                    .and_then(|id| events.get(&id))
                    .cloned()
                    .map(RelatedEventView::from),
                country: a
                    .country_id
                    .and_then(|id| countries.get(&id))
                    .cloned()
                    .map(CountryView::from),
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldReportView {
    pub id: i32,
    pub rid: String,
    pub summary: String,
    pub description: String,
    pub status: i32,
    pub request_assistance: bool,
    pub num_injured: Option<i32>,
    pub num_dead: Option<i32>,
    pub num_missing: Option<i32>,
    pub num_affected: Option<i32>,
    pub num_displaced: Option<i32>,
    pub num_assisted_gov: Option<i32>,
    pub num_assisted_rc: Option<i32>,
    pub num_localstaff: Option<i32>,
    pub num_volunteers: Option<i32>,
    pub num_expats_delegates: Option<i32>,
    pub action: String,
    pub created_at: NaiveDateTime,
    pub dtype: DisasterTypeView,
    pub event: Option<RelatedEventView>,
    pub countries: Vec<CountryView>,
}

impl FieldReportView {
    pub fn load_many(
        rows: Vec<FieldReport>,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<FieldReportView>> {
        let dtypes = disaster_types_by_id(rows.iter().map(|r| r.dtype_id), conn)?;
        let events = events_by_id(rows.iter().filter_map(|r| r.event_id), conn)?;
        let links: Vec<FieldReportCountry> = field_report_countries::table
            .filter(field_report_countries::field_report_id.eq_any(rows.iter().map(|r| r.id)))
            .order(field_report_countries::id.asc())
            .load(conn)?;
        let countries = countries_by_id(links.iter().map(|l| l.country_id), conn)?;
        let mut linked: HashMap<i32, Vec<CountryView>> = HashMap::new();
        for link in links {
            if let Some(country) = countries.get(&link.country_id) {
                linked
                    .entry(link.field_report_id)
                    .or_default()
                    .push(country.clone().into());
            }
        }

        let mut views = Vec::with_capacity(rows.len());
        for r in rows {
            let dtype = dtypes
                .get(&r.dtype_id)
                .cloned()
                .map(DisasterTypeView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            views.push(FieldReportView {
                id: r.id,
                rid: r.rid,
                summary: r.summary,
                description: r.description,
                status: r.status,
                request_assistance: r.request_assistance,
                num_injured: r.num_injured,
                num_dead: r.num_dead,
                num_missing: r.num_missing,
                num_affected: r.num_affected,
                num_displaced: r.num_displaced,
                num_assisted_gov: r.num_assisted_gov,
                num_assisted_rc: r.num_assisted_rc,
                num_localstaff: r.num_localstaff,
                num_volunteers: r.num_volunteers,
                num_expats_delegates: r.num_expats_delegates,
                action: r.action,
                created_at: r.created_at,
                dtype,
                event: r
                    .event_id
                    .and_then(|id| events.get(&id))
                    .cloned()
                    .map(RelatedEventView::from),
                countries: linked.remove(&r.id).unwrap_or_default(),
            });
        }
        Ok(views)
    }
}

/// ERU owner as embedded in an ERU, without the owner's unit list.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedEruOwnerView {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub national_society_country: Option<CountryView>,
}

fn related_owner(owner: &EruOwner, countries: &HashMap<i32, Country>) -> RelatedEruOwnerView {
    RelatedEruOwnerView {
        id: owner.id,
        created_at: owner.created_at,
        updated_at: owner.updated_at,
        national_society_country: owner
            .national_society_country_id
            .and_then(|id| countries.get(&id))
            .cloned()
            .map(CountryView::from),
    }
}

#[derive(Debug, Serialize)]
pub struct EruView {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: EruType,
    pub type_display: String,
    pub units: i32,
    pub equipment_units: i32,
    pub available: bool,
    pub deployed_to: Option<CountryView>,
    pub event: Option<RelatedEventView>,
    pub eru_owner: RelatedEruOwnerView,
}

fn eru_view(
    eru: Eru,
    owners: &HashMap<i32, EruOwner>,
    countries: &HashMap<i32, Country>,
    events: &HashMap<i32, Event>,
) -> QueryResult<EruView> {
    let owner = owners
        .get(&eru.eru_owner_id)
        .ok_or(diesel::result::Error::NotFound)?;
    Ok(EruView {
        id: eru.id,
        kind: eru.kind,
        type_display: eru.kind.to_string(),
        units: eru.units,
        equipment_units: eru.equipment_units,
        available: eru.available,
        deployed_to: eru
            .deployed_to_id
            .and_then(|id| countries.get(&id))
            .cloned()
            .map(CountryView::from),
        event: eru
            .event_id
            .and_then(|id| events.get(&id))
            .cloned()
            .map(RelatedEventView::from),
        eru_owner: related_owner(owner, countries),
    })
}

impl EruView {
    pub fn load_many(rows: Vec<Eru>, conn: &mut SqliteConnection) -> QueryResult<Vec<EruView>> {
        let owners = eru_owners_by_id(rows.iter().map(|e| e.eru_owner_id), conn)?;
        let country_ids: Vec<i32> = rows
            .iter()
            .filter_map(|e| e.deployed_to_id)
            .chain(owners.values().filter_map(|o| o.national_society_country_id))
            .collect();
        let countries = countries_by_id(country_ids, conn)?;
        let events = events_by_id(rows.iter().filter_map(|e| e.event_id), conn)?;
        rows.into_iter()
            .map(|e| eru_view(e, &owners, &countries, &events))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct EruOwnerView {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub national_society_country: Option<CountryView>,
    pub eru_set: Vec<EruView>,
}

impl EruOwnerView {
    pub fn load_many(
        owners: Vec<EruOwner>,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<EruOwnerView>> {
        let owner_erus: Vec<Eru> = Eru::belonging_to(&owners)
            .order(erus::id.asc())
            .load(conn)?;
        let owner_map: HashMap<i32, EruOwner> =
            owners.iter().cloned().map(|o| (o.id, o)).collect();
        let country_ids: Vec<i32> = owners
            .iter()
            .filter_map(|o| o.national_society_country_id)
            .chain(owner_erus.iter().filter_map(|e| e.deployed_to_id))
            .collect();
        let countries = countries_by_id(country_ids, conn)?;
        let events = events_by_id(owner_erus.iter().filter_map(|e| e.event_id), conn)?;

        let grouped = owner_erus.grouped_by(&owners);
        owners
            .into_iter()
            .zip(grouped)
            .map(|(owner, erus_of_owner)| {
                let eru_set = erus_of_owner
                    .into_iter()
                    .map(|e| eru_view(e, &owner_map, &countries, &events))
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(EruOwnerView {
                    id: owner.id,
                    created_at: owner.created_at,
                    updated_at: owner.updated_at,
                    national_society_country: owner
                        .national_society_country_id
                        .and_then(|id| countries.get(&id))
                        .cloned()
                        .map(CountryView::from),
                    eru_set,
                })
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct HeopView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub person: Option<String>,
    pub role: Option<String>,
    pub comments: Option<String>,
    pub country: CountryView,
    pub region: RegionView,
    pub event: Option<RelatedEventView>,
    pub dtype: Option<DisasterTypeView>,
}

impl HeopView {
    pub fn load_many(rows: Vec<Heop>, conn: &mut SqliteConnection) -> QueryResult<Vec<HeopView>> {
        let countries = countries_by_id(rows.iter().map(|h| h.country_id), conn)?;
        let regions = regions_by_id(rows.iter().map(|h| h.region_id), conn)?;
        let events = events_by_id(rows.iter().filter_map(|h| h.event_id), conn)?;
        let dtypes = disaster_types_by_id(rows.iter().filter_map(|h| h.dtype_id), conn)?;

        let mut views = Vec::with_capacity(rows.len());
        for h in rows {
            let country = countries
                .get(&h.country_id)
                .cloned()
                .map(CountryView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            let region = regions
                .get(&h.region_id)
                .cloned()
                .map(RegionView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            views.push(HeopView {
                id: h.id,
                start_date: h.start_date,
                end_date: h.end_date,
                person: h.person,
                role: h.role,
                comments: h.comments,
                country,
                region,
                event: h
                    .event_id
                    .and_then(|id| events.get(&id))
                    .cloned()
                    .map(RelatedEventView::from),
                dtype: h
                    .dtype_id
                    .and_then(|id| dtypes.get(&id))
                    .cloned()
                    .map(DisasterTypeView::from),
            });
        }
        Ok(views)
    }
}

/// A person on a FACT or RDRT deployment.
#[derive(Debug, Clone, Serialize)]
pub struct DeployedPersonView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub society_deployed_from: Option<String>,
}

impl From<FactPerson> for DeployedPersonView {
    fn from(p: FactPerson) -> DeployedPersonView {
        DeployedPersonView {
            id: p.id,
            start_date: p.start_date,
            end_date: p.end_date,
            name: p.name,
            role: p.role,
            society_deployed_from: p.society_deployed_from,
        }
    }
}

impl From<RdrtPerson> for DeployedPersonView {
    fn from(p: RdrtPerson) -> DeployedPersonView {
        DeployedPersonView {
            id: p.id,
            start_date: p.start_date,
            end_date: p.end_date,
            name: p.name,
            role: p.role,
            society_deployed_from: p.society_deployed_from,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FactView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub comments: Option<String>,
    pub country: CountryView,
    pub region: RegionView,
    pub event: Option<RelatedEventView>,
    pub dtype: Option<DisasterTypeView>,
    pub people: Vec<DeployedPersonView>,
}

impl FactView {
    pub fn load_many(rows: Vec<Fact>, conn: &mut SqliteConnection) -> QueryResult<Vec<FactView>> {
        let people: Vec<FactPerson> = FactPerson::belonging_to(&rows)
            .order(fact_people::id.asc())
            .load(conn)?;
        let countries = countries_by_id(rows.iter().map(|f| f.country_id), conn)?;
        let regions = regions_by_id(rows.iter().map(|f| f.region_id), conn)?;
        let events = events_by_id(rows.iter().filter_map(|f| f.event_id), conn)?;
        let dtypes = disaster_types_by_id(rows.iter().filter_map(|f| f.dtype_id), conn)?;

        let grouped = people.grouped_by(&rows);
        let mut views = Vec::with_capacity(rows.len());
        for (f, members) in rows.into_iter().zip(grouped) {
            let country = countries
                .get(&f.country_id)
                .cloned()
                .map(CountryView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            let region = regions
                .get(&f.region_id)
                .cloned()
                .map(RegionView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            views.push(FactView {
                id: f.id,
                start_date: f.start_date,
                comments: f.comments,
                country,
                region,
                event: f
                    .event_id
                    .and_then(|id| events.get(&id))
                    .cloned()
                    .map(RelatedEventView::from),
                dtype: f
                    .dtype_id
                    .and_then(|id| dtypes.get(&id))
                    .cloned()
                    .map(DisasterTypeView::from),
                people: members.into_iter().map(Into::into).collect(),
            });
        }
        Ok(views)
    }
}

#[derive(Debug, Serialize)]
pub struct RdrtView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub comments: Option<String>,
    pub country: CountryView,
    pub region: RegionView,
    pub event: Option<RelatedEventView>,
    pub dtype: Option<DisasterTypeView>,
    pub people: Vec<DeployedPersonView>,
}

impl RdrtView {
    pub fn load_many(rows: Vec<Rdrt>, conn: &mut SqliteConnection) -> QueryResult<Vec<RdrtView>> {
        let people: Vec<RdrtPerson> = RdrtPerson::belonging_to(&rows)
            .order(rdrt_people::id.asc())
            .load(conn)?;
        let countries = countries_by_id(rows.iter().map(|r| r.country_id), conn)?;
        let regions = regions_by_id(rows.iter().map(|r| r.region_id), conn)?;
        let events = events_by_id(rows.iter().filter_map(|r| r.event_id), conn)?;
        let dtypes = disaster_types_by_id(rows.iter().filter_map(|r| r.dtype_id), conn)?;

        let grouped = people.grouped_by(&rows);
        let mut views = Vec::with_capacity(rows.len());
        for (r, team) in rows.into_iter().zip(grouped) {
            let country = countries
                .get(&r.country_id)
                .cloned()
                .map(CountryView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            let region = regions
                .get(&r.region_id)
                .cloned()
                .map(RegionView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            views.push(RdrtView {
                id: r.id,
                start_date: r.start_date,
                comments: r.comments,
                country,
                region,
                event: r
                    .event_id
                    .and_then(|id| events.get(&id))
                    .cloned()
                    .map(RelatedEventView::from),
                dtype: r
                    .dtype_id
                    .and_then(|id| dtypes.get(&id))
                    .cloned()
                    .map(DisasterTypeView::from),
                people: team.into_iter().map(Into::into).collect(),
            });
        }
        Ok(views)
    }
}

/// Deployment as embedded in a person: no people list, no disaster type.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedDeploymentView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub comments: Option<String>,
    pub country: CountryView,
    pub region: RegionView,
    pub event: Option<RelatedEventView>,
}

#[derive(Debug, Serialize)]
pub struct FactPersonView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub society_deployed_from: Option<String>,
    pub fact: RelatedDeploymentView,
}

impl FactPersonView {
    pub fn load_many(
        rows: Vec<FactPerson>,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<FactPersonView>> {
        let deployments = facts_by_id(rows.iter().map(|p| p.fact_id), conn)?;
        let countries = countries_by_id(deployments.values().map(|f| f.country_id), conn)?;
        let regions = regions_by_id(deployments.values().map(|f| f.region_id), conn)?;
        let events = events_by_id(deployments.values().filter_map(|f| f.event_id), conn)?;

        let mut views = Vec::with_capacity(rows.len());
        for p in rows {
            let f = deployments
                .get(&p.fact_id)
                .ok_or(diesel::result::Error::NotFound)?;
            let country = countries
                .get(&f.country_id)
                .cloned()
                .map(CountryView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            let region = regions
                .get(&f.region_id)
                .cloned()
                .map(RegionView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            views.push(FactPersonView {
                id: p.id,
                start_date: p.start_date,
                end_date: p.end_date,
                name: p.name,
                role: p.role,
                society_deployed_from: p.society_deployed_from,
                fact: RelatedDeploymentView {
                    id: f.id,
                    start_date: f.start_date,
                    comments: f.comments.clone(),
                    country,
                    region,
                    event: f
                        .event_id
                        .and_then(|id| events.get(&id))
                        .cloned()
                        .map(RelatedEventView::from),
                },
            });
        }
        Ok(views)
    }
}

#[derive(Debug, Serialize)]
pub struct RdrtPersonView {
    pub id: i32,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub society_deployed_from: Option<String>,
    pub rdrt: RelatedDeploymentView,
}

impl RdrtPersonView {
    pub fn load_many(
        rows: Vec<RdrtPerson>,
        conn: &mut SqliteConnection,
    ) -> QueryResult<Vec<RdrtPersonView>> {
        let deployments = rdrts_by_id(rows.iter().map(|p| p.rdrt_id), conn)?;
        let countries = countries_by_id(deployments.values().map(|r| r.country_id), conn)?;
        let regions = regions_by_id(deployments.values().map(|r| r.region_id), conn)?;
        let events = events_by_id(deployments.values().filter_map(|r| r.event_id), conn)?;

        let mut views = Vec::with_capacity(rows.len());
        for p in rows {
            let r = deployments
                .get(&p.rdrt_id)
                .ok_or(diesel::result::Error::NotFound)?;
            let country = countries
                .get(&r.country_id)
                .cloned()
                .map(CountryView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            let region = regions
                .get(&r.region_id)
                .cloned()
                .map(RegionView::from)
                .ok_or(diesel::result::Error::NotFound)?;
            views.push(RdrtPersonView {
                id: p.id,
                start_date: p.start_date,
                end_date: p.end_date,
                name: p.name,
                role: p.role,
                society_deployed_from: p.society_deployed_from,
                rdrt: RelatedDeploymentView {
                    id: r.id,
                    start_date: r.start_date,
                    comments: r.comments.clone(),
                    country,
                    region,
                    event: r
                        .event_id
                        .and_then(|id| events.get(&id))
                        .cloned()
                        .map(RelatedEventView::from),
                },
            });
        }
        Ok(views)
    }
}
