use crate::db::models::{CreatingUser, User};
use diesel::{upsert::excluded, ExpressionMethods};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserServiceError {
    #[error("diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

pub struct UserService;

impl UserService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }

    /// Inserts a user with the given username, or returns the existing one.
    /// The conflicting row is touched with a no-op update so that `RETURNING` yields it.
    /// Runs on the caller's connection, which is normally an open transaction.
    pub async fn upsert_user(
        &self,
        username: &str,
        db: &mut AsyncPgConnection,
    ) -> Result<User, UserServiceError> {
        use crate::db::schema;

        let user = diesel::insert_into(schema::users::table)
            .values(CreatingUser { username })
            .on_conflict(schema::users::username)
            .do_update()
            .set(schema::users::username.eq(excluded(schema::users::username)))
            .returning((schema::users::id, schema::users::username))
            .get_result::<User>(db)
            .await?;

        Ok(user)
    }
}
