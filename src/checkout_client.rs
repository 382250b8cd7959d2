use bigdecimal::BigDecimal;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::schemas::CurrencyType;

/// Thin wrapper around the hosted-checkout gateway. The gateway owns the
/// card flow; this service only creates sessions and reads them back.
#[derive(Debug)]
pub struct CheckoutClient {
    http_client: Client,
    base_url: String,
    secret_key: Secret<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionCreateRequest<'a> {
    pub reference: i64,
    pub amount: &'a BigDecimal,
    pub currency: &'a CurrencyType,
    pub customer_email: &'a str,
    pub success_url: &'a str,
    pub cancel_url: &'a str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutSessionStatus {
    Open,
    Complete,
    Expired,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionData {
    pub id: String,
    pub url: String,
    pub status: CheckoutSessionStatus,
}

impl CheckoutClient {
    #[tracing::instrument(skip(secret_key))]
    pub fn new(base_url: String, secret_key: Secret<String>, timeout: std::time::Duration) -> Self {
        tracing::info!("Establishing connection to the checkout gateway.");
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the checkout HTTP client");
        Self {
            http_client,
            base_url,
            secret_key,
        }
    }

    fn get_auth_token(&self) -> String {
        format!("Bearer {}", self.secret_key.expose_secret())
    }

    #[tracing::instrument(name = "Create checkout session", skip(self))]
    pub async fn create_session<'a>(
        &self,
        request_body: CheckoutSessionCreateRequest<'a>,
    ) -> Result<CheckoutSessionData, anyhow::Error> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.get_auth_token())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Checkout session creation failed with {}: {}",
                status,
                body
            ));
        }
        let session: CheckoutSessionData = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!("Failed to parse checkout session: {}", err))?;
        Ok(session)
    }

    #[tracing::instrument(name = "Fetch checkout session", skip(self))]
    pub async fn fetch_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSessionData, anyhow::Error> {
        let url = format!("{}/v1/checkout/sessions/{}", self.base_url, session_id);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", self.get_auth_token())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Checkout session fetch failed with {}",
                status
            ));
        }
        let session: CheckoutSessionData = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!("Failed to parse checkout session: {}", err))?;
        Ok(session)
    }
}
