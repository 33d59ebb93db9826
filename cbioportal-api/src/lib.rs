//! Async client for the [cBioPortal](https://www.cbioportal.org) REST API.
//!
//! The client covers the read-only endpoints used to browse cancer studies,
//! their samples and patients, molecular profiles, and clinical data.

pub const CBIOPORTAL_BASE_URL: &str = "https://www.cbioportal.org/api";

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::CbioPortalClient;
pub use config::PortalConfig;
pub use error::{PortalError, Result};
