mod compute_file_mime;

pub use compute_file_mime::compute_file_mime;

use super::{FavoriteService, FavoriteServiceError, UserService, UserServiceError};
use crate::db::models::{CreatingFile, FileSummary, FileWithData};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::{
    pooled_connection::deadpool::Pool, scoped_futures::ScopedFutureExt, AsyncConnection,
    AsyncPgConnection, RunQueryDsl,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileServiceError {
    #[error("database pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
    #[error("{0}")]
    UserServiceError(#[from] UserServiceError),
    #[error("{0}")]
    FavoriteServiceError(#[from] FavoriteServiceError),
}

#[derive(Error, Debug)]
pub enum RemoveFileError {
    #[error("file with ID `{file_id}` does not exist")]
    InvalidFile { file_id: i32 },
    #[error("file with ID `{file_id}` is not owned by `{username}`")]
    NotOwner { file_id: i32, username: String },
    #[error("{0}")]
    Error(#[from] FileServiceError),
}

impl From<diesel::result::Error> for RemoveFileError {
    fn from(err: diesel::result::Error) -> Self {
        RemoveFileError::Error(err.into())
    }
}

pub struct FileService {
    db_pool: Pool<AsyncPgConnection>,
    user_service: Arc<UserService>,
    favorite_service: Arc<FavoriteService>,
}

impl FileService {
    pub fn new(
        db_pool: Pool<AsyncPgConnection>,
        user_service: Arc<UserService>,
        favorite_service: Arc<FavoriteService>,
    ) -> Arc<Self> {
        Arc::new(Self {
            db_pool,
            user_service,
            favorite_service,
        })
    }

    /// Stores a file on behalf of the given username and returns the new file ID.
    /// The user is created on their first upload; both writes share one transaction.
    pub async fn create_file(
        &self,
        username: &str,
        filename: &str,
        file_data: &[u8],
        description: &str,
    ) -> Result<i32, FileServiceError> {
        use crate::db::schema;

        let user_service = &self.user_service;

        let db = &mut self.db_pool.get().await?;
        let file_id = db
            .transaction::<i32, FileServiceError, _>(|db| {
                async move {
                    let user = user_service.upsert_user(username, db).await?;

                    let file_id = diesel::insert_into(schema::files::table)
                        .values(CreatingFile {
                            filename,
                            file_data,
                            file_size: file_data.len() as i64,
                            description,
                            user_id: user.id,
                        })
                        .returning(schema::files::id)
                        .get_result::<i32>(db)
                        .await?;

                    Ok(file_id)
                }
                .scope_boxed()
            })
            .await?;

        Ok(file_id)
    }

    /// Retrieves a file by its ID, including its content and the owner's username.
    pub async fn get_file_by_id(
        &self,
        file_id: i32,
    ) -> Result<Option<FileWithData>, FileServiceError> {
        use crate::db::schema;

        let db = &mut self.db_pool.get().await?;
        let file = schema::files::table
            .inner_join(schema::users::table)
            .filter(schema::files::id.eq(file_id))
            .select((
                schema::files::id,
                schema::files::filename,
                schema::files::file_data,
                schema::files::file_size,
                schema::files::description,
                schema::files::uploaded_at,
                schema::users::username,
            ))
            .first::<FileWithData>(db)
            .await
            .optional()?;

        Ok(file)
    }

    /// Retrieves the most recently uploaded files, without their content.
    /// The result is sorted by upload time, most recent first.
    pub async fn get_recent_files(&self, limit: u32) -> Result<Vec<FileSummary>, FileServiceError> {
        use crate::db::schema;

        let db = &mut self.db_pool.get().await?;
        let files = schema::files::table
            .inner_join(schema::users::table)
            .select((
                schema::files::id,
                schema::files::filename,
                schema::files::file_size,
                schema::files::description,
                schema::files::uploaded_at,
                schema::users::username,
            ))
            .order((schema::files::uploaded_at.desc(), schema::files::id.desc()))
            .limit(limit as i64)
            .load::<FileSummary>(db)
            .await?;

        Ok(files)
    }

    /// Removes a file on behalf of the given username.
    /// Only the owner may remove a file. Favorites referencing the file are removed first,
    /// in the same transaction as the file itself.
    pub async fn remove_file_by_id(
        &self,
        file_id: i32,
        username: &str,
    ) -> Result<(), RemoveFileError> {
        use crate::db::schema;

        let favorite_service = &self.favorite_service;

        let db = &mut self.db_pool.get().await.map_err(FileServiceError::from)?;
        db.transaction::<(), RemoveFileError, _>(|db| {
            async move {
                let owner = schema::files::table
                    .inner_join(schema::users::table)
                    .filter(schema::files::id.eq(file_id))
                    .select(schema::users::username)
                    .for_update()
                    .first::<String>(db)
                    .await
                    .optional()?;

                match owner {
                    Some(owner) if owner == username => {}
                    Some(_) => {
                        return Err(RemoveFileError::NotOwner {
                            file_id,
                            username: username.to_owned(),
                        });
                    }
                    None => return Err(RemoveFileError::InvalidFile { file_id }),
                }

                favorite_service
                    .remove_favorites_by_file_id(file_id, db)
                    .await
                    .map_err(FileServiceError::from)?;

                diesel::delete(schema::files::dsl::files.filter(schema::files::id.eq(file_id)))
                    .execute(db)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
    }
}
