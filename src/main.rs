use rocket::Error;

#[rocket::main]
async fn main() -> Result<(), Error> {
    let _ = sitrep::build_rocket(rocket::Config::figment()).launch().await?;
    Ok(())
}
