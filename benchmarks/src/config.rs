use std::path::PathBuf;

pub const USERS_VAR: &str = "NUM_USERS";
pub const DEFAULT_USERS: usize = 1_000_000;
pub const RESULTS_FILE: &str = "blazing_results_rust.txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub users: usize,
    pub workers: usize,
    pub results_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A missing or unparseable user count falls back to `DEFAULT_USERS`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let users = lookup(USERS_VAR)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_USERS);

        Self {
            users,
            workers: available_workers(),
            results_path: PathBuf::from(RESULTS_FILE),
        }
    }
}

pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .max(1)
}
