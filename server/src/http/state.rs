use crate::service::BulbService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BulbService,
}
