//! NVCF client for the hosted OCDRNet function.
//!
//! Wire flow: create an asset record, upload the image bytes to the signed
//! URL from the response, invoke the OCR function with the asset attached,
//! then poll the pending-execution endpoint until the result archive is
//! ready. The API key is an opaque Bearer token; loading it from the
//! environment is the CLI's concern.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{JobStatus, OcrService, ServiceError};
use crate::config::Settings;

const USER_AGENT: &str = concat!("leadscan/", env!("CARGO_PKG_VERSION"));

/// Content type the OCR function expects for uploaded assets.
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssetRequest<'a> {
    content_type: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssetResponse {
    upload_url: String,
    asset_id: Uuid,
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    image: &'a str,
    render_label: bool,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    title: Option<String>,
    detail: Option<String>,
}

/// Client for NVIDIA's NVCF-hosted OCDRNet OCR function.
pub struct NvcfClient {
    client: Client,
    upload_client: Client,
    settings: Settings,
}

impl NvcfClient {
    /// Create a client from run settings.
    ///
    /// Two HTTP clients are held: one with the API timeout for JSON calls
    /// and one with the longer upload timeout for the binary PUT.
    pub fn new(settings: Settings) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        let upload_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.upload_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            upload_client,
            settings,
        }
    }
}

#[async_trait]
impl OcrService for NvcfClient {
    async fn upload(&self, image: &[u8], description: &str) -> Result<Uuid, ServiceError> {
        // Step 1: create the asset record, yielding a signed upload URL
        let create = CreateAssetRequest {
            content_type: IMAGE_CONTENT_TYPE,
            description,
        };
        let asset: CreateAssetResponse = self
            .client
            .post(&self.settings.assets_url)
            .bearer_auth(&self.settings.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&create)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Step 2: upload the raw bytes to the signed URL
        self.upload_client
            .put(&asset.upload_url)
            .header(header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)
            .header("x-amz-meta-nvcf-asset-description", description)
            .body(image.to_vec())
            .send()
            .await?
            .error_for_status()?;

        // Step 3: invoke the OCR function with the asset attached,
        // registering the job for processing
        let asset_ref = asset.asset_id.to_string();
        let invoke = InvokeRequest {
            image: &asset_ref,
            render_label: false,
        };
        self.client
            .post(&self.settings.invoke_url)
            .bearer_auth(&self.settings.api_key)
            .header(header::ACCEPT, "application/json")
            .header("NVCF-INPUT-ASSET-REFERENCES", &asset_ref)
            .header("NVCF-FUNCTION-ASSET-IDS", &asset_ref)
            .json(&invoke)
            .send()
            .await?
            .error_for_status()?;

        Ok(asset.asset_id)
    }

    async fn get_status(&self, asset_id: Uuid) -> Result<JobStatus, ServiceError> {
        let url = format!("{}/{}", self.settings.status_url, asset_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.settings.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::ACCEPTED => Ok(JobStatus::Pending),
            status if status.is_success() => Ok(JobStatus::Done),
            status => {
                // A failure reported by the service is a job status, not a
                // transport error
                let detail = response
                    .json::<RemoteErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.detail.or(body.title))
                    .unwrap_or_else(|| format!("HTTP {status}"));
                Ok(JobStatus::Error {
                    detail: Some(detail),
                })
            }
        }
    }

    async fn fetch_result(&self, asset_id: Uuid) -> Result<Vec<u8>, ServiceError> {
        let url = format!("{}/{}", self.settings.result_url, asset_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.settings.api_key)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }
}
