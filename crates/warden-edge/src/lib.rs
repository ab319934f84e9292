//! Edge listener: the single externally exposed HTTP surface.
//!
//! Serves prebuilt static assets, proxies matching paths to the backend
//! process and exposes a health view of the supervisor's process table.
mod config;
pub use config::EdgeConfig;

mod error;
pub use error::EdgeError;

mod proxy;

mod route;
pub use route::RouteTable;

mod serve;
pub use serve::{EdgeListener, EdgePhase};
