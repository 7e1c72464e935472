//! link_resolver library: resolves opaque links to their final destination
//!
//! This library follows redirect chains (including JS and meta-refresh
//! interstitials) and decodes Google News article links, whose destination is
//! hidden inside a base64 article id or behind Google's batch-RPC endpoint.
//!
//! # Example
//!
//! ```no_run
//! use link_resolver::{Config, Resolver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::from_config(&Config::default())?;
//! let result = resolver
//!     .resolve("https://news.google.com/rss/articles/CBMiJmh0dHBzOi8vZXhhbXBsZS5jb20vMjAyNC8wNS9zdG9yeS5odG1s0gEA?oc=5")
//!     .await?;
//! println!("{} -> {} ({})", result.original_url, result.final_url, result.method);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod google_news;
pub mod initialization;
pub mod resolver;
pub mod scrape;
pub mod server;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{InputError, ResolveError};
pub use resolver::{ResolutionMethod, ResolutionResult, Resolver};
pub use server::{create_router, start_server, ServerState};
