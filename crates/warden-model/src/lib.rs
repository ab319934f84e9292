mod domain;
pub use domain::{AllowList, Env, Flag, KeyValue};
pub use domain::{ProcName, TimeoutMs};

mod error;
pub use error::ModelError;

mod route;
pub use route::{RouteRule, RouteTarget};

mod spec;
pub use spec::ProcessSpec;

mod strategy;
pub use strategy::{BackoffStrategy, JitterStrategy, RestartBudget, RestartStrategy};
