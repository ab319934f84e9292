mod backoff;
pub use backoff::BackoffStrategy;

mod budget;
pub use budget::RestartBudget;

mod jitter;
pub use jitter::JitterStrategy;

mod restart;
pub use restart::RestartStrategy;
