// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Leeway Fetch
//!
//! Everything between Leeway and the outside world on the read path:
//!
//! - [`credentials`] - Reads the Claude CLI OAuth credentials file
//! - [`parser`] - Tolerant parsing of the usage endpoint response
//! - [`client`] - The HTTP client for the usage endpoint
//! - [`traits`] - [`CredentialProvider`] and [`UsageFetcher`], the seams the
//!   refresh engine is written against
//!
//! ## Example
//!
//! ```ignore
//! use leeway_fetch::{CredentialProvider, FileCredentialProvider, UsageClient, UsageFetcher};
//! use tokio_util::sync::CancellationToken;
//!
//! let creds = FileCredentialProvider::with_default_path()?.read().await?;
//! let client = UsageClient::connect()?;
//! let usage = client.fetch(&creds.access_token, &CancellationToken::new()).await?;
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod parser;
pub mod traits;

// Errors
pub use error::{CredentialError, FetchError, ParseError};

// Credentials
pub use credentials::{FileCredentialProvider, default_credentials_path, parse_credentials};

// Parsing
pub use parser::{parse_response_body, parse_usage_response};

// HTTP
pub use client::{UsageClient, build_request_headers};

// Traits
pub use traits::{CredentialProvider, UsageFetcher};
