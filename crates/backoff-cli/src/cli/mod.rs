use anyhow::Context;
use backoff_core::config::{
    BackoffConfig, DEFAULT_COUNTER, default_config_path, retained_path_in, validate_counter_name,
};
use backoff_core::cycle::{ConnectOutcome, RetryPlan, SleepPlan};
use backoff_core::retained::RetainedFile;
use backoff_core::{BackoffState, BackoffTable, PersistentBackoffRecord};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

mod app;
mod args;
mod config_cmd;
mod counter_cmd;
mod simulate_cmd;

use args::*;

use config_cmd::handle_config;
use counter_cmd::{handle_fail, handle_inspect, handle_success, handle_tries};
use self_test::handle_self_test;
use simulate_cmd::handle_simulate;

pub fn run() -> anyhow::Result<()> {
    app::run()
}
