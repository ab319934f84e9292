mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod flag;
pub use flag::Flag;

mod allow;
pub use allow::AllowList;

/// Logical name of a supervised process.
///
/// Every managed process is addressed by its name; the supervisor
/// never runs two live instances of the same name concurrently.
pub type ProcName = String;

/// Timeout value in milliseconds.
///
/// Used wherever configuration expresses an explicit time bound
/// (proxy deadline, drain grace, termination grace).
pub type TimeoutMs = u64;
