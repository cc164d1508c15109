use crate::db::models::{FileSummary, FileWithData};
use base64::{prelude::BASE64_STANDARD, Engine};
use chrono::NaiveDateTime;
use rocket::{
    http::{ContentType, Header},
    serde::json::Json,
    Responder,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Uploader name used when the request does not carry one.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadingFile {
    pub username: Option<String>,
    pub filename: Option<String>,
    /// The file content, base64 encoded.
    pub file_data: Option<String>,
    pub description: Option<String>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadValidationError {
    #[error("Missing filename")]
    MissingFilename,
    #[error("Missing file data")]
    MissingFileData,
    #[error("Invalid file data")]
    InvalidFileData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub username: String,
    pub filename: String,
    pub file_data: Vec<u8>,
    pub description: String,
}

impl UploadingFile {
    /// Checks the required fields and decodes the payload.
    pub fn validate(self) -> Result<ValidatedUpload, UploadValidationError> {
        let filename = match self.filename {
            Some(filename) if !filename.trim().is_empty() => filename,
            _ => return Err(UploadValidationError::MissingFilename),
        };
        let file_data = self
            .file_data
            .ok_or(UploadValidationError::MissingFileData)?;
        let file_data = BASE64_STANDARD
            .decode(file_data.trim())
            .map_err(|_| UploadValidationError::InvalidFileData)?;
        let username = match self.username {
            Some(username) if !username.trim().is_empty() => username,
            _ => ANONYMOUS_USERNAME.to_owned(),
        };

        Ok(ValidatedUpload {
            username,
            filename,
            file_data,
            description: self.description.unwrap_or_default(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub success: bool,
    pub file_id: i32,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TogglingFavorite {
    pub action: Option<String>,
    /// Accepts both `1` and `"1"`.
    #[serde(default, deserialize_with = "deserialize_file_id")]
    pub file_id: Option<i32>,
    pub username: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileIdValue {
    Number(i32),
    Text(String),
}

fn deserialize_file_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FileIdValue>::deserialize(deserializer)? {
        Some(FileIdValue::Number(file_id)) => Ok(Some(file_id)),
        Some(FileIdValue::Text(file_id)) => file_id
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid file id `{}`", file_id))),
        None => Ok(None),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToggledFavorite {
    pub success: bool,
    pub is_favorited: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileList {
    pub files: Vec<FileSummary>,
}

/// A single file with its content encoded as base64.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    pub id: i32,
    pub filename: String,
    pub file_data: String,
    pub file_size: i64,
    pub description: String,
    pub uploaded_at: NaiveDateTime,
    pub username: String,
}

impl From<FileWithData> for FileDetail {
    fn from(file: FileWithData) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            file_data: BASE64_STANDARD.encode(&file.file_data),
            file_size: file.file_size,
            description: file.description,
            uploaded_at: file.uploaded_at,
            username: file.username,
        }
    }
}

/// The raw content of a file, served as an attachment.
#[derive(Responder, Debug)]
pub struct FileBytes {
    pub data: Vec<u8>,
    pub content_type: ContentType,
    pub content_disposition: Header<'static>,
}

impl FileBytes {
    pub fn new(data: Vec<u8>, mime: &str, filename: &str) -> Self {
        Self {
            data,
            content_type: ContentType::parse_flexible(mime).unwrap_or(ContentType::Binary),
            content_disposition: Header::new("Content-Disposition", content_disposition(filename)),
        }
    }
}

/// Builds an `attachment` disposition with an ASCII fallback name and the exact UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let fallback = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect::<String>();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

#[derive(Responder, Debug)]
pub enum FileResponse {
    List(Json<FileList>),
    Detail(Json<FileDetail>),
    Download(FileBytes),
}

/// Answer to a CORS preflight request. The allowed origin is added by the CORS fairing.
#[derive(Responder, Debug)]
#[response(status = 200)]
pub struct Preflight {
    pub body: (),
    pub allow_methods: Header<'static>,
    pub allow_headers: Header<'static>,
    pub max_age: Header<'static>,
}

impl Preflight {
    pub fn new() -> Self {
        Self {
            body: (),
            allow_methods: Header::new(
                "Access-Control-Allow-Methods",
                "GET, POST, PUT, DELETE, OPTIONS",
            ),
            allow_headers: Header::new("Access-Control-Allow-Headers", "Content-Type, X-Username"),
            max_age: Header::new("Access-Control-Max-Age", "86400"),
        }
    }
}
