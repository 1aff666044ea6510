pub mod retry;

pub use retry::{retry_on_transient, RetryConfig, RetryResult};
