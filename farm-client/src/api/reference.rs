use crate::client::FarmClient;
use crate::error::Result;
use crate::types::*;

impl FarmClient {
    // ==================== Reference data ====================

    /// List crops
    pub async fn fetch_crops(&self) -> Result<Vec<Crop>> {
        self.get("crops", &[]).await
    }

    /// List caretakers
    pub async fn fetch_caretakers(&self) -> Result<Vec<Caretaker>> {
        self.get("caretakers", &[]).await
    }

    /// Current weather summary
    pub async fn fetch_weather(&self) -> Result<Weather> {
        self.get("weather", &[]).await
    }
}
