use async_trait::async_trait;
use reqwest::{Client, Response, header::CONTENT_TYPE};

#[cfg(test)]
use mockall::automock;

use super::model::{PolicyList, PolicySummary};
use crate::{cli::Settings, error::AmpError};

/// Source of policy listings and policy documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PolicySource: Send + Sync + 'static {
    /// List the policies visible to the API client
    async fn list_policies(&self) -> Result<Vec<PolicySummary>, AmpError>;

    /// Fetch the raw XML body of one policy
    async fn fetch_policy_xml(&self, policy: &PolicySummary) -> Result<String, AmpError>;
}

/// AMP for Endpoints API client authenticated with HTTP basic auth
pub struct AmpClient {
    http: Client,
    host: String,
    client_id: String,
    client_secret: String,
    limit: u32,
}

impl AmpClient {
    pub fn new(settings: &Settings) -> Result<Self, AmpError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            host: settings.host.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            limit: settings.limit,
        })
    }

    fn listing_url(&self) -> String {
        format!("{}policies?limit={}", self.host, self.limit)
    }
}

#[async_trait]
impl PolicySource for AmpClient {
    async fn list_policies(&self) -> Result<Vec<PolicySummary>, AmpError> {
        log::debug!("Attempting to get policy list");

        let url = self.listing_url();
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let response = check_status(response, &url)?;
        let policies: PolicyList = response.json().await?;

        log::info!("Retrieved list of {} policies", policies.data.len());
        Ok(policies.data)
    }

    async fn fetch_policy_xml(&self, policy: &PolicySummary) -> Result<String, AmpError> {
        log::debug!("Attempting to get details for \"{}\"", policy.name);

        let url = policy.xml_url();
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await?;
        let response = check_status(response, &policy.name)?;

        Ok(response.text().await?)
    }
}

/// Log the response status and reject anything outside 2xx
fn check_status(response: Response, query: &str) -> Result<Response, AmpError> {
    let status = response.status();
    if status.is_success() {
        log::debug!("Found HTTP {} for {}", status, query);
        Ok(response)
    } else {
        log::error!("Found HTTP {} for {}", status, query);
        Err(AmpError::HttpStatus {
            status,
            query: query.to_string(),
        })
    }
}
