use crate::{
    config::AppConfig,
    create_rocket_instance,
    db::{self, test::DatabaseDropper},
    setup_rocket_instance,
};
use rocket::{Build, Rocket};
use std::path::PathBuf;
use uuid::Uuid;

/// Creates a new Rocket instance for testing.
/// It creates a new database next to the one in `DATABASE_URL` and runs the migrations on it.
pub async fn create_test_rocket_instance() -> (Rocket<Build>, DatabaseDropper) {
    let mut app_config = AppConfig::load(None as Option<PathBuf>).unwrap();

    let maintenance_database_url = app_config.database_url.clone();
    let id = Uuid::new_v4().simple().to_string();

    let database_name = db::test::create_test_database(&maintenance_database_url, &id).unwrap();

    app_config.database_url = db::test::replace_database_name(&maintenance_database_url, &database_name);
    app_config.database_pool_size = Some(4);

    let database_dropper = DatabaseDropper::new(&maintenance_database_url, &database_name);

    let rocket = create_rocket_instance(&app_config).unwrap();
    let rocket = setup_rocket_instance(app_config, rocket).await.unwrap();

    (rocket, database_dropper)
}

pub mod helpers {
    use crate::routes::file::dto::{ToggledFavorite, UploadedFile};
    use base64::{prelude::BASE64_STANDARD, Engine};
    use rocket::{
        http::{Accept, ContentType, Status},
        local::asynchronous::Client,
    };

    pub async fn upload_file(
        client: &Client,
        username: &str,
        filename: &str,
        file_content: impl AsRef<[u8]>,
    ) -> i32 {
        let body = serde_json::json!({
            "username": username,
            "filename": filename,
            "fileData": BASE64_STANDARD.encode(file_content.as_ref()),
            "description": format!("{} by {}", filename, username),
        });

        let response = client
            .post("/")
            .header(Accept::JSON)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);

        let uploaded_file = response.into_json::<UploadedFile>().await.unwrap();

        assert!(uploaded_file.success);

        uploaded_file.file_id
    }

    pub async fn toggle_favorite(client: &Client, file_id: i32, username: &str) -> ToggledFavorite {
        let body = serde_json::json!({
            "action": "favorite",
            "fileId": file_id,
            "username": username,
        });

        let response = client
            .put("/")
            .header(Accept::JSON)
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);

        response.into_json::<ToggledFavorite>().await.unwrap()
    }
}
