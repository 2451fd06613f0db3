//! Subcommands and their results.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Subcommand;
use hashring::{HashRing, RingSnapshot};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the partition and bucket a key routes to.
    Locate {
        /// Key to route.
        key: String,
    },
    /// Show the load cap and the partitions each bucket owns.
    Loads,
    /// Print the whole ring state as JSON.
    Dump {
        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },
}

/// Output of a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Located {
        key: String,
        partition: usize,
        bucket: Option<String>,
    },
    Loads {
        avg_load: usize,
        loads: BTreeMap<String, usize>,
        /// Partition ids per bucket, ascending.
        owned: BTreeMap<String, Vec<usize>>,
    },
    Dump {
        snapshot: RingSnapshot,
        pretty: bool,
    },
}

impl Command {
    pub fn execute(&self, ring: &HashRing<String>) -> CommandResult {
        match self {
            Command::Locate { key } => CommandResult::Located {
                key: key.clone(),
                partition: ring.partition_id(key),
                bucket: ring.get(key),
            },
            Command::Loads => {
                // One snapshot, so the cap, loads and owners agree.
                let snapshot = ring.snapshot();
                let owned = snapshot
                    .buckets
                    .iter()
                    .map(|bucket| (bucket.clone(), snapshot.partitions_of(bucket)))
                    .collect();
                CommandResult::Loads {
                    avg_load: snapshot.avg_load,
                    loads: snapshot.loads,
                    owned,
                }
            }
            Command::Dump { pretty } => CommandResult::Dump {
                snapshot: ring.snapshot(),
                pretty: *pretty,
            },
        }
    }
}

impl CommandResult {
    pub fn render(&self) -> Result<String> {
        let out = match self {
            CommandResult::Located {
                key,
                partition,
                bucket,
            } => format!(
                "{key} -> partition {partition} -> {}",
                bucket.as_deref().unwrap_or("<unassigned>")
            ),
            CommandResult::Loads {
                avg_load,
                loads,
                owned,
            } => {
                let mut out = format!("Average load: {avg_load}");
                for (bucket, load) in loads {
                    let ids: Vec<String> = owned
                        .get(bucket)
                        .map(|ids| ids.iter().map(usize::to_string).collect())
                        .unwrap_or_default();
                    out.push_str(&format!("\n{bucket}\t{load}\t[{}]", ids.join(",")));
                }
                out
            }
            CommandResult::Dump { snapshot, pretty } => {
                if *pretty {
                    serde_json::to_string_pretty(snapshot)?
                } else {
                    serde_json::to_string(snapshot)?
                }
            }
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashring::hash::fnv1_64;
    use hashring::Config;

    fn demo_ring() -> HashRing<String> {
        HashRing::new(
            Config::new(fnv1_64)
                .with_partition_count(23)
                .with_replication_factor(20),
            (0..8).map(|i| format!("node{i}")),
        )
        .unwrap()
    }

    #[test]
    fn test_locate_demo_key() {
        let result = Command::Locate {
            key: "test-key".into(),
        }
        .execute(&demo_ring());

        assert_eq!(
            result,
            CommandResult::Located {
                key: "test-key".into(),
                partition: 0,
                bucket: Some("node7".into()),
            }
        );
        assert_eq!(result.render().unwrap(), "test-key -> partition 0 -> node7");
    }

    #[test]
    fn test_loads_sum_to_partitions() {
        let result = Command::Loads.execute(&demo_ring());
        let CommandResult::Loads {
            avg_load,
            loads,
            owned,
        } = &result
        else {
            panic!("unexpected result {result:?}");
        };
        assert_eq!(*avg_load, 4);
        assert_eq!(loads.values().sum::<usize>(), 23);

        // Each bucket's listed partitions match its load, and "test-key"
        // lands in partition 0, owned by node7.
        for (bucket, load) in loads {
            assert_eq!(owned[bucket].len(), *load);
        }
        assert!(owned["node7"].contains(&0));

        let rendered = result.render().unwrap();
        assert!(rendered.starts_with("Average load: 4"));
        assert_eq!(rendered.lines().count(), 9);
    }

    #[test]
    fn test_dump_is_json() {
        let result = Command::Dump { pretty: false }.execute(&demo_ring());
        let value: serde_json::Value = serde_json::from_str(&result.render().unwrap()).unwrap();
        assert_eq!(value["partition_count"], 23);
        assert_eq!(value["buckets"].as_array().unwrap().len(), 8);
    }
}
