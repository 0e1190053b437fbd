//! Config for the evaluator behaviors
//!
//! This module provides configuration options for controlling local evaluation. Configuration
//! can be created programmatically using [`Configuration::new()`] or by reading environment
//! variables using [`Configuration::from_env()`]. Remote polling has its own
//! [`PollConfig`](crate::remote::PollConfig).
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional. Flags are case-insensitive, set the value to `"true"` to enable one.
//!
//! - `HANGMAN_VERBOSE` — Print progress to stdout (default: `true`)
//! - `HANGMAN_LOG` — Enable logging to a file (default: `false`)
//! - `HANGMAN_MAX_LIVES` — Lives per game (default: `6`)
//! - `HANGMAN_WORKERS` — Number of worker threads (default: number of CPUs)
//! - `HANGMAN_PROGRESS_INTERVAL` — Report progress every N games (default: `50`)
//! - `HANGMAN_SEED` — Seed for corpus sampling (default: random)

use std::env;
use std::str::FromStr;

use crate::game::DEFAULT_MAX_LIVES;

/// Configuration for evaluator behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) max_lives: u32,
    pub(crate) workers: usize,
    pub(crate) progress_interval: usize,
    pub(crate) seed: Option<u64>,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - The evaluator will print progress to stdout.
    /// - Logging to file is disabled.
    /// - Each game starts with 6 lives.
    /// - One worker thread per CPU.
    /// - Progress is reported every 50 games.
    /// - Sampling uses a random seed.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            max_lives: DEFAULT_MAX_LIVES,
            workers: num_cpus::get(),
            progress_interval: 50,
            seed: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Unset or unparsable
    /// values fall back to the defaults of [`Configuration::new()`].
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_value<T: FromStr>(var: &str) -> Option<T> {
            env::var(var).ok()?.trim().parse().ok()
        }

        let default = Self::new();
        Self {
            verbose: get_env_flag("HANGMAN_VERBOSE", default.verbose),
            log: get_env_flag("HANGMAN_LOG", default.log),
            max_lives: get_env_value("HANGMAN_MAX_LIVES").unwrap_or(default.max_lives),
            workers: get_env_value("HANGMAN_WORKERS")
                .unwrap_or(default.workers)
                .max(1),
            progress_interval: get_env_value("HANGMAN_PROGRESS_INTERVAL")
                .unwrap_or(default.progress_interval),
            seed: get_env_value("HANGMAN_SEED"),
        }
    }

    /// Enable or disable progress output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Set the number of lives of each game.
    pub fn with_max_lives(mut self, value: u32) -> Self {
        self.max_lives = value;
        self
    }

    /// Set the number of worker threads (at least one).
    pub fn with_workers(mut self, value: usize) -> Self {
        self.workers = value.max(1);
        self
    }

    /// Report progress every `value` games. `0` disables intermediate reports.
    pub fn with_progress_interval(mut self, value: usize) -> Self {
        self.progress_interval = value;
        self
    }

    /// Seed the corpus sampling, making sampled evaluations reproducible.
    pub fn with_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Lives per game.
    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
