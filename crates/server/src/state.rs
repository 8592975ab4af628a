use crate::ai::AiClient;
use crate::uploads::AttachmentStore;
use sea_orm::DatabaseConnection;

/// Shared handler state: the connection pool plus the pieces of
/// configuration read once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub uploads: AttachmentStore,
    pub ai: AiClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET is not set, using an insecure development default");
            "dev-secret".to_string()
        });
        let upload_root =
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        AppState {
            db,
            jwt_secret,
            uploads: AttachmentStore::new(upload_root.into()),
            ai: AiClient::from_env(),
        }
    }
}
