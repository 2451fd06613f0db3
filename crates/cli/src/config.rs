//! Command-line configuration.

use anyhow::{Context, Result};
use clap::{Args, Parser};
use hashring::{BuiltinHasher, Config, HashRing};
use tracing::{debug, info};

use crate::commands::Command;

/// Explore consistent hashing with bounded loads.
#[derive(Debug, Parser)]
#[command(name = "hashring", version, about, long_about = None)]
pub struct CliConfig {
    #[command(flatten)]
    pub ring: RingArgs,

    /// Log level when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Shape of the ring the commands run against.
#[derive(Debug, Clone, Args)]
pub struct RingArgs {
    /// Number of partitions (a prime spreads keys best).
    #[arg(short, long, global = true, default_value_t = 23)]
    pub partitions: usize,

    /// Virtual nodes per bucket.
    #[arg(short, long, global = true, default_value_t = 20)]
    pub replication: usize,

    /// Hash function: fnv1, fnv1a, xxh64, xxh3 or sip13.
    #[arg(long, global = true, default_value_t = BuiltinHasher::Fnv1)]
    pub hasher: BuiltinHasher,

    /// Number of buckets to create.
    #[arg(short, long, global = true, default_value_t = 8)]
    pub buckets: usize,

    /// Bucket names are `<prefix>0`, `<prefix>1`, ...
    #[arg(long, global = true, default_value = "node")]
    pub prefix: String,
}

impl RingArgs {
    pub fn bucket_names(&self) -> Vec<String> {
        (0..self.buckets)
            .map(|i| format!("{}{}", self.prefix, i))
            .collect()
    }

    pub fn build(&self) -> Result<HashRing<String>> {
        let config = Config::new(self.hasher.hash_fn())
            .with_partition_count(self.partitions)
            .with_replication_factor(self.replication);
        debug!(?config, hasher = %self.hasher, buckets = self.buckets, "building ring");

        HashRing::new(config, self.bucket_names()).with_context(|| {
            format!(
                "failed to build a ring of {} buckets over {} partitions",
                self.buckets, self.partitions
            )
        })
    }
}

impl CliConfig {
    pub fn run(self) -> Result<()> {
        let ring = self.ring.build()?;
        info!(
            buckets = ring.bucket_count(),
            vnodes = ring.vnode_count(),
            avg_load = ring.avg_load(),
            "ring ready"
        );

        let result = self.command.execute(&ring);
        println!("{}", result.render()?);
        Ok(())
    }
}
