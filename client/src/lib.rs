use anyhow::Result;
use bulb_types::LightBulb;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Client for interacting with the bulb service
pub struct BulbClient {
    client: ReqwestClient,
    base_url: String,
}

impl BulbClient {
    /// Create a new client instance
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn bulb_url(&self, id: i64) -> String {
        format!("{}/bulbs/{}", self.base_url, id)
    }

    /// List every stored bulb
    pub async fn list_bulbs(&self) -> Result<Vec<LightBulb>> {
        let url = format!("{}/bulbs", self.base_url);
        let response = check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Fetch one bulb, or `None` when the service does not know the id
    pub async fn get_bulb(&self, id: i64) -> Result<Option<LightBulb>> {
        let response = self.client.get(self.bulb_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Bulb {} not found", id);
            return Ok(None);
        }

        let response = check(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Create a bulb and return it with the id the service assigned
    pub async fn create_bulb(&self, bulb: &LightBulb) -> Result<LightBulb> {
        let url = format!("{}/bulbs", self.base_url);
        let response = check(self.client.post(&url).json(bulb).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Replace the name, type and wattage of an existing bulb
    pub async fn update_bulb(&self, id: i64, bulb: &LightBulb) -> Result<LightBulb> {
        let response = self.client.put(self.bulb_url(id)).json(bulb).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Delete a bulb
    pub async fn delete_bulb(&self, id: i64) -> Result<()> {
        check(self.client.delete(self.bulb_url(id)).send().await?).await?;
        Ok(())
    }

    /// Check if the service is healthy
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        Ok(response.status() == StatusCode::OK)
    }

    /// Liveness probe; true when the service answers "pong"
    pub async fn ping(&self) -> Result<bool> {
        let url = format!("{}/ping", self.base_url);

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Ok(false);
        }

        Ok(response.text().await?.trim() == "pong")
    }
}

/// Turn a non-success response into an error carrying the service's message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("{} ({})", error_message(&body), status)
}

fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let mut message = value["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string());

    if let Some(errors) = value["errors"].as_object() {
        let details: Vec<String> = errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg.as_str().unwrap_or_default()))
            .collect();
        if !details.is_empty() {
            message = format!("{} [{}]", message, details.join(", "));
        }
    }

    message
}
