//! PostgREST access to the Supabase `jobs` and `applicants` tables.
//!
//! Credentials are split by scope. `SupabaseClient<Anonymous>` carries the
//! public anon key and only implements the read-side [`JobCatalog`];
//! `SupabaseClient<ServiceRole>` carries the service-role key, bypasses
//! row-level security, and is the only client that can insert applicants.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, error};

use crate::workflows::applications::{
    ApplicantDirectory, ApplicantRecord, ApplicantRepository, PersistenceError,
};
use crate::workflows::jobs::{CatalogError, JobCatalog, JobId, JobPosting, JobStatus};

const JOBS_TABLE: &str = "jobs";
const APPLICANTS_TABLE: &str = "applicants";

/// Credential scope marker.
pub trait CredentialScope: Send + Sync + 'static {
    const LABEL: &'static str;
}

/// End-user scope, subject to row-level policies.
#[derive(Debug, Clone, Copy)]
pub struct Anonymous;

/// Trusted-server scope, exempt from row-level policies.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRole;

impl CredentialScope for Anonymous {
    const LABEL: &'static str = "anon";
}

impl CredentialScope for ServiceRole {
    const LABEL: &'static str = "service_role";
}

#[derive(Clone)]
pub struct SupabaseClient<S: CredentialScope> {
    http: Client,
    project_url: String,
    api_key: String,
    scope: PhantomData<S>,
}

impl<S: CredentialScope> SupabaseClient<S> {
    fn with_key(http: Client, project_url: &str, api_key: String) -> Self {
        Self {
            http,
            project_url: project_url.trim_end_matches('/').to_string(),
            api_key,
            scope: PhantomData,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.project_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

impl SupabaseClient<Anonymous> {
    pub fn anonymous(http: Client, project_url: &str, anon_key: impl Into<String>) -> Self {
        Self::with_key(http, project_url, anon_key.into())
    }
}

impl SupabaseClient<ServiceRole> {
    pub fn service_role(
        http: Client,
        project_url: &str,
        service_role_key: impl Into<String>,
    ) -> Self {
        Self::with_key(http, project_url, service_role_key.into())
    }
}

impl<S: CredentialScope> fmt::Debug for SupabaseClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("project_url", &self.project_url)
            .field("scope", &S::LABEL)
            .finish_non_exhaustive()
    }
}

fn active_filter() -> String {
    format!("eq.{}", JobStatus::Active.label())
}

async fn error_detail(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let detail = response.text().await.unwrap_or_default();
    (status, detail)
}

#[async_trait]
impl JobCatalog for SupabaseClient<Anonymous> {
    async fn active_jobs(&self) -> Result<Vec<JobPosting>, CatalogError> {
        let status = active_filter();
        let request = self
            .http
            .get(self.table_url(JOBS_TABLE))
            .query(&[
                ("select", "*"),
                ("status", status.as_str()),
                ("order", "posted_date.desc"),
            ]);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            error!(status, %detail, "supabase job listing failed");
            return Err(CatalogError::Unavailable(format!("HTTP {status}")));
        }

        response
            .json::<Vec<JobPosting>>()
            .await
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn active_job(&self, id: &JobId) -> Result<JobPosting, CatalogError> {
        let id_filter = format!("eq.{id}");
        let status = active_filter();
        let request = self
            .http
            .get(self.table_url(JOBS_TABLE))
            .query(&[
                ("select", "*"),
                ("id", id_filter.as_str()),
                ("status", status.as_str()),
                ("limit", "1"),
            ]);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| CatalogError::Unavailable(err.to_string()))?;

        match response.status() {
            // PostgREST answers 400 when `id` is a uuid column and the filter is not a uuid.
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                debug!(%id, "job lookup rejected by supabase");
                return Err(CatalogError::NotFound);
            }
            status if !status.is_success() => {
                let (status, detail) = error_detail(response).await;
                error!(status, %detail, %id, "supabase job lookup failed");
                return Err(CatalogError::Unavailable(format!("HTTP {status}")));
            }
            _ => {}
        }

        let rows = response
            .json::<Vec<JobPosting>>()
            .await
            .map_err(|err| CatalogError::Decode(err.to_string()))?;

        rows.into_iter().next().ok_or(CatalogError::NotFound)
    }
}

#[async_trait]
impl ApplicantRepository for SupabaseClient<ServiceRole> {
    async fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, PersistenceError> {
        let request = self
            .http
            .post(self.table_url(APPLICANTS_TABLE))
            .header("Prefer", "return=representation")
            .json(&record);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| PersistenceError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            return Err(PersistenceError::Rejected { status, detail });
        }

        let rows = response
            .json::<Vec<ApplicantRecord>>()
            .await
            .map_err(|err| PersistenceError::Decode(err.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| PersistenceError::Decode("insert returned no rows".to_string()))
    }
}

#[async_trait]
impl ApplicantDirectory for SupabaseClient<ServiceRole> {
    async fn applicants_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicantRecord>, PersistenceError> {
        let job_filter = format!("eq.{job_id}");
        let request = self
            .http
            .get(self.table_url(APPLICANTS_TABLE))
            .query(&[
                ("select", "*"),
                ("job_id", job_filter.as_str()),
                ("order", "created_at.desc"),
            ]);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|err| PersistenceError::Unavailable(err.to_string()))?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            error!(status, %detail, %job_id, "supabase applicant listing failed");
            return Err(PersistenceError::Rejected { status, detail });
        }

        response
            .json::<Vec<ApplicantRecord>>()
            .await
            .map_err(|err| PersistenceError::Decode(err.to_string()))
    }
}
