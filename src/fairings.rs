mod cors;

pub use cors::*;

use rocket::{Build, Rocket};

pub fn register_fairings(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.attach(Cors::new())
}
