use super::dto::{
    FileBytes, FileDetail, FileList, FileResponse, Preflight, ToggledFavorite, TogglingFavorite,
    UploadedFile, UploadingFile,
};
use crate::{
    dto::{Error, JsonRes, Success},
    services::{
        compute_file_mime, FavoriteService, FileService, RemoveFileError, ToggleFavoriteError,
    },
};
use rocket::{
    delete, get,
    http::Status,
    options, patch, post, put, routes,
    serde::json::{self, Json},
    Build, Rocket, State,
};
use std::{io, sync::Arc};

/// The number of files returned when listing without filters.
pub const RECENT_FILES_LIMIT: u32 = 50;

pub fn register_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount(
        "/",
        routes![
            preflight,
            upload_file,
            get_files,
            toggle_favorite,
            remove_file,
            method_not_allowed
        ],
    )
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn file_not_found() -> Error {
    Error::new_static(Status::NotFound, "File not found")
}

fn missing_parameters() -> Error {
    Error::new_static(Status::BadRequest, "Missing parameters")
}

/// Maps a rejected JSON body to its response.
/// Rocket reports a body over the `json` limit as an unexpected EOF.
fn rejected_body(controller: &str, err: json::Error<'_>) -> Error {
    match err {
        json::Error::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            log::warn!(target: "routes::file::controllers", controller, err:%; "Rejected oversized body.");
            Status::PayloadTooLarge.into()
        }
        err => {
            log::warn!(target: "routes::file::controllers", controller, err:%; "Rejected malformed body.");
            Error::new_static(Status::BadRequest, "Invalid JSON body")
        }
    }
}

#[options("/")]
fn preflight() -> Preflight {
    Preflight::new()
}

#[post("/", data = "<body>")]
async fn upload_file(
    file_service: &State<Arc<FileService>>,
    body: Result<Json<UploadingFile>, json::Error<'_>>,
) -> JsonRes<UploadedFile> {
    let body = match body {
        Ok(body) => body.into_inner(),
        Err(err) => return Err(rejected_body("upload_file", err)),
    };
    let upload = match body.validate() {
        Ok(upload) => upload,
        Err(err) => {
            return Err(Error::new_dynamic(Status::BadRequest, err.to_string()));
        }
    };

    let file_id = file_service
        .create_file(
            &upload.username,
            &upload.filename,
            &upload.file_data,
            &upload.description,
        )
        .await;

    let file_id = match file_id {
        Ok(file_id) => file_id,
        Err(err) => {
            let username = upload.username.as_str();
            let filename = upload.filename.as_str();
            let file_size = upload.file_data.len();
            log::error!(target: "routes::file::controllers", controller = "upload_file", service = "FileService", username, filename, file_size, err:err; "Error returned from service.");
            return Err(Status::InternalServerError.into());
        }
    };

    log::info!(target: "routes::file::controllers", controller = "upload_file", file_id, username = upload.username.as_str(); "File uploaded.");

    Ok((
        Status::Ok,
        Json(UploadedFile {
            success: true,
            file_id,
        }),
    ))
}

#[get("/?<id>&<username>&<action>")]
async fn get_files(
    file_service: &State<Arc<FileService>>,
    favorite_service: &State<Arc<FavoriteService>>,
    id: Option<i32>,
    username: Option<String>,
    action: Option<String>,
) -> Result<FileResponse, Error> {
    let action = action.as_deref();

    if action == Some("favorites") {
        if let Some(username) = non_empty(username.as_deref()) {
            let files = favorite_service.get_favorite_files(username).await;

            return match files {
                Ok(files) => Ok(FileResponse::List(Json(FileList { files }))),
                Err(err) => {
                    log::error!(target: "routes::file::controllers", controller = "get_files", service = "FavoriteService", username, err:err; "Error returned from service.");
                    Err(Status::InternalServerError.into())
                }
            };
        }
    }

    let file_id = match id {
        Some(file_id) => file_id,
        None => {
            let files = file_service.get_recent_files(RECENT_FILES_LIMIT).await;

            return match files {
                Ok(files) => Ok(FileResponse::List(Json(FileList { files }))),
                Err(err) => {
                    log::error!(target: "routes::file::controllers", controller = "get_files", service = "FileService", err:err; "Error returned from service.");
                    Err(Status::InternalServerError.into())
                }
            };
        }
    };

    let file = file_service.get_file_by_id(file_id).await;

    let file = match file {
        Ok(Some(file)) => file,
        Ok(None) => {
            return Err(file_not_found());
        }
        Err(err) => {
            log::error!(target: "routes::file::controllers", controller = "get_files", service = "FileService", file_id, err:err; "Error returned from service.");
            return Err(Status::InternalServerError.into());
        }
    };

    if action == Some("download") {
        let mime = compute_file_mime(&file.file_data, &file.filename);
        return Ok(FileResponse::Download(FileBytes::new(
            file.file_data,
            mime,
            &file.filename,
        )));
    }

    Ok(FileResponse::Detail(Json(FileDetail::from(file))))
}

#[put("/", data = "<body>")]
async fn toggle_favorite(
    favorite_service: &State<Arc<FavoriteService>>,
    body: Result<Json<TogglingFavorite>, json::Error<'_>>,
) -> JsonRes<ToggledFavorite> {
    let body = match body {
        Ok(body) => body.into_inner(),
        Err(err) => return Err(rejected_body("toggle_favorite", err)),
    };

    if body.action.as_deref() != Some("favorite") {
        return Err(Error::new_static(Status::BadRequest, "Invalid action"));
    }

    let (file_id, username) = match (body.file_id, non_empty(body.username.as_deref())) {
        (Some(file_id), Some(username)) => (file_id, username),
        _ => return Err(missing_parameters()),
    };

    let is_favorited = favorite_service.toggle_favorite(file_id, username).await;

    let is_favorited = match is_favorited {
        Ok(is_favorited) => is_favorited,
        Err(err) => match err {
            ToggleFavoriteError::InvalidFile { .. } => {
                return Err(file_not_found());
            }
            ToggleFavoriteError::Error(err) => {
                log::error!(target: "routes::file::controllers", controller = "toggle_favorite", service = "FavoriteService", file_id, username, err:err; "Error returned from service.");
                return Err(Status::InternalServerError.into());
            }
        },
    };

    Ok((
        Status::Ok,
        Json(ToggledFavorite {
            success: true,
            is_favorited,
        }),
    ))
}

#[delete("/?<id>&<username>")]
async fn remove_file(
    file_service: &State<Arc<FileService>>,
    id: Option<i32>,
    username: Option<String>,
) -> JsonRes<Success> {
    let (file_id, username) = match (id, non_empty(username.as_deref())) {
        (Some(file_id), Some(username)) => (file_id, username),
        _ => return Err(missing_parameters()),
    };

    let result = file_service.remove_file_by_id(file_id, username).await;

    match result {
        Ok(()) => {}
        Err(err) => match err {
            RemoveFileError::InvalidFile { .. } => {
                return Err(file_not_found());
            }
            RemoveFileError::NotOwner { .. } => {
                log::info!(target: "routes::file::controllers", controller = "remove_file", file_id, username; "Refused to remove a file of another user.");
                return Err(Error::new_static(Status::Forbidden, "Not authorized"));
            }
            RemoveFileError::Error(err) => {
                log::error!(target: "routes::file::controllers", controller = "remove_file", service = "FileService", file_id, username, err:err; "Error returned from service.");
                return Err(Status::InternalServerError.into());
            }
        },
    }

    log::info!(target: "routes::file::controllers", controller = "remove_file", file_id, username; "File removed.");

    Ok((Status::Ok, Json(Success::new())))
}

#[patch("/")]
fn method_not_allowed() -> Error {
    Error::new_static(Status::MethodNotAllowed, "Method not allowed")
}
