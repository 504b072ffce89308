//! Outbound adapters for the blob store and the structured store.

pub mod cloud_storage;
pub mod memory;
pub mod supabase;

pub use cloud_storage::{CloudStorageBucket, StorageCredentialsError};
pub use memory::{MemoryApplicantRepository, MemoryBlobStore, MemoryJobCatalog, StoredBlob};
pub use supabase::{Anonymous, CredentialScope, ServiceRole, SupabaseClient};

/// Shared HTTP client for every gateway. Timeouts are left to the
/// transport defaults.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("job-board/", env!("CARGO_PKG_VERSION")))
        .build()
}
