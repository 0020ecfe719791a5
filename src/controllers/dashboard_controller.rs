use crate::models::dashboard::DashboardSummary;
use crate::services::DashboardService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct DashboardController {
    service: DashboardService,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: DashboardService::new(state.trips.clone()),
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        self.service.build_summary().await
    }
}
