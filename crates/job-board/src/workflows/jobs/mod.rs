//! Read side of the job board: open postings queried by the intake surfaces.

pub mod catalog;
pub mod domain;

pub use catalog::{CatalogError, JobCatalog};
pub use domain::{JobId, JobPosting, JobStatus};
