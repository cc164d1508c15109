use crate::db::models::{CreatingFavorite, FileSummary};
use diesel::{BoolExpressionMethods, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::{
    pooled_connection::deadpool::Pool, scoped_futures::ScopedFutureExt, AsyncConnection,
    AsyncPgConnection, RunQueryDsl,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FavoriteServiceError {
    #[error("database pool error: {0}")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("diesel error: {0}")]
    Diesel(#[from] diesel::result::Error),
}

#[derive(Error, Debug)]
pub enum ToggleFavoriteError {
    #[error("file with ID `{file_id}` does not exist")]
    InvalidFile { file_id: i32 },
    #[error("{0}")]
    Error(#[from] FavoriteServiceError),
}

pub struct FavoriteService {
    db_pool: Pool<AsyncPgConnection>,
}

impl FavoriteService {
    pub fn new(db_pool: Pool<AsyncPgConnection>) -> Arc<Self> {
        Arc::new(Self { db_pool })
    }

    /// Flips the favorite state of a file for the given username.
    /// Returns `true` if the file is now favorited, `false` if it was unfavorited.
    ///
    /// The delete and the insert run in one transaction; the unique `(file_id, username)`
    /// constraint makes concurrent toggles settle on at most one row.
    pub async fn toggle_favorite(
        &self,
        file_id: i32,
        username: &str,
    ) -> Result<bool, ToggleFavoriteError> {
        use crate::db::schema;

        let db = &mut self
            .db_pool
            .get()
            .await
            .map_err(FavoriteServiceError::from)?;
        let is_favorited = db
            .transaction::<bool, diesel::result::Error, _>(|db| {
                async move {
                    let removed = diesel::delete(
                        schema::favorites::dsl::favorites.filter(
                            schema::favorites::file_id
                                .eq(file_id)
                                .and(schema::favorites::username.eq(username)),
                        ),
                    )
                    .returning(schema::favorites::id)
                    .get_result::<i32>(db)
                    .await
                    .optional()?;

                    if removed.is_some() {
                        return Ok(false);
                    }

                    diesel::insert_into(schema::favorites::table)
                        .values(CreatingFavorite { file_id, username })
                        .on_conflict((schema::favorites::file_id, schema::favorites::username))
                        .do_nothing()
                        .execute(db)
                        .await?;

                    Ok(true)
                }
                .scope_boxed()
            })
            .await;

        match is_favorited {
            Ok(is_favorited) => Ok(is_favorited),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                err,
            )) if err.constraint_name() == Some("file_fk") => {
                Err(ToggleFavoriteError::InvalidFile { file_id })
            }
            Err(err) => Err(FavoriteServiceError::from(err).into()),
        }
    }

    /// Retrieves the files favorited by the given username.
    /// The result is sorted by the time the favorite was created, most recent first.
    pub async fn get_favorite_files(
        &self,
        username: &str,
    ) -> Result<Vec<FileSummary>, FavoriteServiceError> {
        use crate::db::schema;

        let db = &mut self.db_pool.get().await?;
        let files = schema::favorites::table
            .inner_join(schema::files::table.inner_join(schema::users::table))
            .filter(schema::favorites::username.eq(username))
            .select((
                schema::files::id,
                schema::files::filename,
                schema::files::file_size,
                schema::files::description,
                schema::files::uploaded_at,
                schema::users::username,
            ))
            .order((
                schema::favorites::created_at.desc(),
                schema::favorites::id.desc(),
            ))
            .load::<FileSummary>(db)
            .await?;

        Ok(files)
    }

    /// Removes every favorite that references the given file.
    /// Returns the number of favorites that were removed.
    /// Runs on the caller's connection so the removal joins its transaction.
    pub async fn remove_favorites_by_file_id(
        &self,
        file_id: i32,
        db: &mut AsyncPgConnection,
    ) -> Result<usize, FavoriteServiceError> {
        use crate::db::schema;

        let removed = diesel::delete(
            schema::favorites::dsl::favorites.filter(schema::favorites::file_id.eq(file_id)),
        )
        .execute(db)
        .await?;

        Ok(removed)
    }
}
