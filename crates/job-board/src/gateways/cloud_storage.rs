//! Resume uploads to a Google Cloud Storage bucket through the JSON API.
//!
//! Requests carry OAuth access tokens minted from a service account key.
//! The authenticator caches tokens and refreshes them before they expire.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, error, warn};
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::ServiceAccountAuthenticator;

use crate::config::CloudStorageConfig;
use crate::workflows::applications::{BlobAddress, BlobStore, ResumeKey, UploadError};

const STORAGE_SCOPES: &[&str] = &["https://www.googleapis.com/auth/devstorage.read_write"];

#[derive(Debug, thiserror::Error)]
pub enum StorageCredentialsError {
    #[error("GCP_KEY_JSON is not a usable service account key: {0}")]
    InvalidKey(std::io::Error),
    #[error("service account authenticator could not be built: {0}")]
    Authenticator(std::io::Error),
}

#[derive(Clone)]
enum Credentials {
    /// Local emulators accept unsigned requests.
    Unsigned,
    ServiceAccount(Arc<DefaultAuthenticator>),
}

/// Google Cloud Storage bucket accessed through the JSON API media upload.
#[derive(Clone)]
pub struct CloudStorageBucket {
    http: Client,
    bucket: String,
    credentials: Credentials,
    upload_endpoint: String,
    public_base_url: String,
}

impl CloudStorageBucket {
    /// Parses the service account key, if any, and prepares the token cache.
    /// No request is made until the first upload.
    pub async fn connect(
        http: Client,
        config: &CloudStorageConfig,
    ) -> Result<Self, StorageCredentialsError> {
        let credentials = match &config.service_account_key {
            Some(json) => {
                let key = yup_oauth2::parse_service_account_key(json)
                    .map_err(StorageCredentialsError::InvalidKey)?;
                debug!(client_email = %key.client_email, "loaded service account key");
                let authenticator = ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(StorageCredentialsError::Authenticator)?;
                Credentials::ServiceAccount(Arc::new(authenticator))
            }
            None => {
                warn!(bucket = %config.bucket, "no service account key; uploads are unsigned");
                Credentials::Unsigned
            }
        };

        Ok(Self {
            http,
            bucket: config.bucket.clone(),
            credentials,
            upload_endpoint: config.upload_endpoint.trim_end_matches('/').to_string(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public URL of an object, following the `{base}/{bucket}/{name}` convention.
    pub fn public_address(&self, key: &ResumeKey) -> BlobAddress {
        BlobAddress(format!("{}/{}/{}", self.public_base_url, self.bucket, key))
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.upload_endpoint, self.bucket)
    }

    async fn access_token(&self) -> Result<Option<String>, UploadError> {
        let authenticator = match &self.credentials {
            Credentials::Unsigned => return Ok(None),
            Credentials::ServiceAccount(authenticator) => authenticator,
        };

        let token = authenticator.token(STORAGE_SCOPES).await.map_err(|err| {
            error!(error = %err, bucket = %self.bucket, "service account token exchange failed");
            UploadError::Unavailable(format!("service account token: {err}"))
        })?;

        token.token().map(|value| Some(value.to_string())).ok_or_else(|| {
            UploadError::Unavailable("token endpoint returned no access token".to_string())
        })
    }
}

impl std::fmt::Debug for CloudStorageBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let signing = match self.credentials {
            Credentials::Unsigned => "unsigned",
            Credentials::ServiceAccount(_) => "service_account",
        };
        f.debug_struct("CloudStorageBucket")
            .field("bucket", &self.bucket)
            .field("upload_endpoint", &self.upload_endpoint)
            .field("credentials", &signing)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BlobStore for CloudStorageBucket {
    async fn put(
        &self,
        key: &ResumeKey,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<BlobAddress, UploadError> {
        let mut request = self
            .http
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", key.as_str())])
            .header(CONTENT_TYPE, content_type)
            .body(bytes);

        if let Some(token) = self.access_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| UploadError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            error!(status, bucket = %self.bucket, storage_key = %key, "cloud storage upload rejected");
            return Err(UploadError::Rejected { status, detail });
        }

        Ok(self.public_address(key))
    }
}
