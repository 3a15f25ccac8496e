use rocket::fairing::{AdHoc, Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod resources;
pub mod schema;

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Authorization, Content-Type",
        ));
    }
}

/// Assembles the server: routes, catchers, database pool, CORS and the
/// migration fairing. Tests drive this with their own figment.
pub fn build_rocket(figment: Figment) -> Rocket<Build> {
    let api_config = config::ApiConfig::from_figment(&figment);
    rocket::custom(figment)
        .mount("/api/v1", resources::core_routes())
        .mount("/api/v1", resources::deployment_routes())
        .register("/", resources::catchers())
        .attach(db::SitrepDb::fairing())
        .attach(Cors)
        .manage(api_config)
        .attach(AdHoc::try_on_ignite("Embedded migrations", |rocket| async {
            let conn = match db::SitrepDb::get_one(&rocket).await {
                Some(conn) => conn,
                None => {
                    log::error!("no database connection available for migrations");
                    return Err(rocket);
                }
            };
            match conn.run(|c| db::run_migrations(c)).await {
                Ok(()) => Ok(rocket),
                Err(e) => {
                    log::error!("failed to run embedded migrations: {e:#}");
                    Err(rocket)
                }
            }
        }))
}
