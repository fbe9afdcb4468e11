pub mod config;
pub mod harness;
pub mod kernels;
pub mod parallel;
pub mod report;

pub use config::Config;
pub use harness::{bench, run_all, Outcome};
pub use report::{expected_sum, Report, SystemInfo};
