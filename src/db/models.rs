use chrono::NaiveDateTime;
use diesel::{
    associations::Identifiable, deserialize::Queryable, prelude::Insertable, Selectable,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Selectable, Queryable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
}

#[derive(Serialize, Deserialize, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreatingUser<'a> {
    pub username: &'a str,
}

/// File metadata joined with the owner's username.
/// Loaded from `(id, filename, file_size, description, uploaded_at, username)`.
#[derive(Serialize, Deserialize, Queryable, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: i32,
    pub filename: String,
    pub file_size: i64,
    pub description: String,
    pub uploaded_at: NaiveDateTime,
    pub username: String,
}

/// A whole file, bytes included, joined with the owner's username.
/// Loaded from `(id, filename, file_data, file_size, description, uploaded_at, username)`.
#[derive(Queryable, Debug, Clone, PartialEq)]
pub struct FileWithData {
    pub id: i32,
    pub filename: String,
    pub file_data: Vec<u8>,
    pub file_size: i64,
    pub description: String,
    pub uploaded_at: NaiveDateTime,
    pub username: String,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreatingFile<'a> {
    pub filename: &'a str,
    pub file_data: &'a [u8],
    pub file_size: i64,
    pub description: &'a str,
    pub user_id: i32,
}

#[derive(Serialize, Deserialize, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreatingFavorite<'a> {
    pub file_id: i32,
    pub username: &'a str,
}
