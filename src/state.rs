use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::Submission;
use crate::services::delivery::BookingSink;
use crate::services::i18n::Catalogs;
use crate::services::sessions::WizardSession;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub sink: Box<dyn BookingSink>,
    pub catalogs: Catalogs,
    pub sessions: Mutex<HashMap<Uuid, WizardSession>>,
    pub submissions_tx: broadcast::Sender<Submission>,
}
