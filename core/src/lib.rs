//! Synchronous client core for the toolchain API and the example resource API.
//!
//! # Overview
//! Each operation is split into `build_*` (produces a plain-data request) and
//! `parse_*` (consumes a plain-data response); the operation-named method runs
//! both around a single [`Transport`] call. Cursor-paginated collections are
//! consumed through [`Pager`].
//!
//! ```no_run
//! use toolchain_core::{ListToolchainsOptions, ToolchainService};
//!
//! # fn main() -> Result<(), toolchain_core::ApiError> {
//! let service = ToolchainService::from_env()?;
//! let mut pager = service.toolchains_pager(ListToolchainsOptions::new("rg-1").limit(50))?;
//! while pager.has_next() {
//!     for toolchain in pager.get_next()? {
//!         println!("{} {}", toolchain.id, toolchain.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Services hold only configuration and a transport; the pager is the only
//!   stateful type.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - The library logs through `tracing` and never installs a subscriber.

mod client;
pub mod config;
pub mod error;
pub mod example;
pub mod http;
pub mod pager;
pub mod toolchain;
pub mod transport;
pub mod types;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use example::ExampleService;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pager::{PageSource, PagedCollection, PagedOptions, Pager};
pub use toolchain::{
    ListToolchainsOptions, ListToolsOptions, ToolchainService, ToolchainsPager, ToolsPager,
};
pub use transport::{Transport, UreqTransport};
pub use types::{
    CreateResource, CreateToolOptions, CreateToolchainOptions, FirstPageLink, PageLink, Resource,
    Resources, Tool, ToolCollection, ToolPatch, ToolReferent, Toolchain, ToolchainCollection,
    ToolchainPatch,
};
