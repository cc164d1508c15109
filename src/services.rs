mod favorite_service;
mod file_service;
mod user_service;

pub use favorite_service::*;
pub use file_service::*;
pub use user_service::*;

use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection};
use rocket::{Build, Rocket};

pub fn register_services(rocket: Rocket<Build>, db_pool: Pool<AsyncPgConnection>) -> Rocket<Build> {
    let user_service = UserService::new();
    let favorite_service = FavoriteService::new(db_pool.clone());
    let file_service = FileService::new(db_pool, user_service, favorite_service.clone());

    rocket
        .manage(favorite_service)
        .manage(file_service)
}
