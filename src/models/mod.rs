mod core;
mod deployments;

pub use self::core::{
    Appeal, Country, DisasterType, Document, Event, FieldReport, FieldReportCountry, NewAppeal,
    NewCountry, NewDisasterType, NewDocument, NewEvent, NewFieldReport, NewFieldReportCountry,
    NewRegion, NewService, Region, Service,
};
pub use self::deployments::{
    Eru, EruOwner, EruType, Fact, FactPerson, Heop, NewEru, NewEruOwner, NewFact, NewFactPerson,
    NewHeop, NewRdrt, NewRdrtPerson, Rdrt, RdrtPerson,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("event {0} has no appeal data to aggregate")]
    NoAppeals(i32),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}
