//! Command line arguments for `rpsq`
//!
//! Global options may appear before or after the subcommand. Anything given
//! here overrides the configuration file.

use crate::app::config::{Config, StoreBackend};
use crate::queue::ConsumeOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "rpsq")]
#[command(about = "Namespaced fan-out publish/subscribe queue over redis")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Key namespace shared by all queues of one bus
    #[arg(short = 'n', long = "namespace", value_name = "NAME", global = true)]
    pub namespace: Option<String>,

    /// Redis connection URL
    #[arg(long = "redis-url", value_name = "URL", global = true)]
    pub redis_url: Option<String>,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", global = true,
          value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", global = true,
          value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<String>,

    /// Force colored output (overrides TTY detection and NO_COLOR)
    #[arg(long = "color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color", global = true)]
    pub no_color: bool,
}

impl GlobalArgs {
    /// Overlay command line values on a loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(namespace) = &self.namespace {
            config.queue.namespace = Some(namespace.clone());
        }
        if let Some(url) = &self.redis_url {
            config.store.backend = StoreBackend::Redis;
            config.store.url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.log.level = Some(level.clone());
        }
        if let Some(format) = &self.log_format {
            config.log.format = Some(format.clone());
        }
        match self.log_file.as_deref() {
            Some("none") => config.log.file = None,
            Some(file) => config.log.file = Some(file.to_string()),
            None => {}
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Publish a message to every current subscriber of a queue
    Publish {
        queue: String,
        payload: String,
        /// Seconds the payload stays readable (defaults to [queue] default_ttl)
        #[arg(long, value_name = "SECONDS")]
        ttl: Option<u64>,
    },

    /// Register a consumer on a queue
    Subscribe { queue: String, consumer: String },

    /// Remove a consumer and discard its pending deliveries
    Unsubscribe { queue: String, consumer: String },

    /// Receive messages addressed to a consumer
    Consume(ConsumeArgs),

    /// List the consumers subscribed to a queue
    Subscribers { queue: String },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConsumeArgs {
    pub queue: String,
    pub consumer: String,

    /// Wait for messages to arrive
    #[arg(long)]
    pub block: bool,

    /// Return immediately when nothing is queued
    #[arg(long = "no-block", conflicts_with = "block")]
    pub no_block: bool,

    /// Seconds to wait in total when blocking (0 waits forever)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Maximum number of messages to receive
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub count: usize,
}

impl ConsumeArgs {
    /// Options for each consume call, starting from the configured defaults
    pub fn options(&self, defaults: ConsumeOptions) -> ConsumeOptions {
        let block = if self.block {
            true
        } else if self.no_block {
            false
        } else {
            defaults.block
        };
        let timeout = self
            .timeout
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        ConsumeOptions { block, timeout }
    }
}
