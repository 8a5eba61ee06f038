//! # Altmetric Client
//!
//! A Rust client library for the Altmetric v1 API, which reports online
//! attention metrics (news, blog, social and policy mentions) for scholarly
//! works.
//!
//! ## Features
//!
//! - **One object per call**: look up a work by Altmetric id, DOI, PMID,
//!   arXiv id, ISBN or URI
//! - **Identifier normalization**: `doi:10.1038/x` and `10.1038/x` resolve to
//!   the same request
//! - **Flattened results**: nested JSON becomes `counts.cited_by_posts_count`
//!   style key paths
//! - **Tables**: project results into rows and export them as CSV
//!
//! ## Quick Start
//!
//! ```no_run
//! use altmetric_client::{AltmetricClient, Identifier, to_table};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AltmetricClient::new();
//!
//!     let result = client
//!         .fetch_metrics(&Identifier::doi("10.1038/480426a")?)
//!         .await?;
//!
//!     println!("Title: {:?}", result.title());
//!     println!("Score: {:?}", result.score());
//!
//!     let table = to_table(&result);
//!     print!("{}", table.to_csv()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Several objects
//!
//! The API is queried one object at a time. Fetch each identifier separately
//! and stack the tables:
//!
//! ```no_run
//! use altmetric_client::{AltmetricClient, Identifier, MetricsTable};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AltmetricClient::new();
//!     let mut table = MetricsTable::default();
//!
//!     for doi in ["10.1038/480426a", "10.1038/nature09210"] {
//!         let result = client.fetch_metrics(&Identifier::doi(doi)?).await?;
//!         table.append(result.to_table());
//!     }
//!
//!     println!("{}", table);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod flatten;
pub mod identifier;
pub mod models;
pub mod table;

// Re-export main types for convenience
pub use client::{AltmetricClient, RequestOptions};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEMO_API_KEY};
pub use error::{AltmetricError, Result};
pub use identifier::{Identifier, IdentifierKind, IdentifierQuery, compact, normalize_identifier};
pub use models::{MetricValue, MetricsResult};
pub use table::{MetricsTable, to_table};

/// Fetch metrics for one object with a default client
///
/// The API key is read from `ALTMETRIC_KEY`, falling back to the shared demo
/// key.
///
/// # Example
///
/// ```no_run
/// use altmetric_client::{fetch_metrics, Identifier};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = fetch_metrics(&Identifier::pmid("21761193")?).await?;
///     println!("{} fields", result.len());
///     Ok(())
/// }
/// ```
pub async fn fetch_metrics(identifier: &Identifier) -> Result<MetricsResult> {
    AltmetricClient::new().fetch_metrics(identifier).await
}
