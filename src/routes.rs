pub mod file;

use rocket::{Build, Rocket};

pub fn register_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    file::controllers::register_routes(rocket)
}
