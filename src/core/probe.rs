//! Environment presence probe.
//!
//! Caches, per machine, whether the daemon's own environment defines a set
//! of variables. Each request gets a generation number; a response is only
//! accepted while its generation is still the latest one for that machine,
//! so a slow answer for an earlier request can't overwrite a newer one.
//!
//! A failed check finishes loading with every requested name unknown, which
//! reads as "not present". While a request is in flight the snapshot reports
//! `is_loading` and callers must not treat absence as a verdict.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::constants;
use crate::core::resolver::PresenceMap;
use crate::core::types::MachineId;
use crate::error::{ProbeError, Result};

/// Something that can answer "is this variable set on that machine?"
pub trait PresenceSource {
    /// Check `names` on `machine`.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unavailable` if the machine can't be queried.
    fn check(&self, machine: &str, names: &[String]) -> Result<PresenceMap>;
}

/// Probes the environment of the current process.
///
/// Only answers for the local machine id it was created with.
#[derive(Debug, Clone)]
pub struct LocalPresence {
    machine: MachineId,
}

impl LocalPresence {
    pub fn new(machine: impl Into<MachineId>) -> Self {
        Self {
            machine: machine.into(),
        }
    }

    pub fn machine(&self) -> &str {
        &self.machine
    }
}

impl PresenceSource for LocalPresence {
    fn check(&self, machine: &str, names: &[String]) -> Result<PresenceMap> {
        if machine != self.machine {
            return Err(ProbeError::Unavailable {
                machine: machine.to_string(),
                reason: "only the local machine can be probed".to_string(),
            }
            .into());
        }

        Ok(names
            .iter()
            .map(|name| {
                let set = std::env::var_os(name).is_some_and(|v| !v.is_empty());
                (name.clone(), set)
            })
            .collect())
    }
}

/// Id of the machine this process runs on (its hostname).
pub fn local_machine_id() -> MachineId {
    whoami::fallible::hostname().unwrap_or_else(|_| constants::LOCAL_MACHINE.to_string())
}

/// Handle for an in-flight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTicket {
    pub machine: MachineId,
    pub generation: u64,
    pub names: Vec<String>,
}

/// View of the cache for one machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub presence: PresenceMap,
    pub is_loading: bool,
    /// Missing, expired, failed, or not covering every requested name
    pub needs_refresh: bool,
}

#[derive(Debug)]
struct Entry {
    generation: u64,
    loading: bool,
    presence: PresenceMap,
    fetched_at: Option<Instant>,
    last_error: Option<String>,
}

/// TTL cache of presence results keyed by machine id
#[derive(Debug)]
pub struct PresenceCache {
    ttl: Duration,
    next_generation: u64,
    entries: HashMap<MachineId, Entry>,
}

impl PresenceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_generation: 0,
            entries: HashMap::new(),
        }
    }

    /// Start a check; supersedes any earlier in-flight check for the machine
    pub fn begin(&mut self, machine: &str, names: &[String]) -> ProbeTicket {
        self.next_generation += 1;
        let generation = self.next_generation;

        let entry = self
            .entries
            .entry(machine.to_string())
            .or_insert_with(|| Entry {
                generation,
                loading: true,
                presence: PresenceMap::new(),
                fetched_at: None,
                last_error: None,
            });
        entry.generation = generation;
        entry.loading = true;

        debug!(machine = %machine, generation, names = names.len(), "presence check started");

        ProbeTicket {
            machine: machine.to_string(),
            generation,
            names: names.to_vec(),
        }
    }

    /// Record the outcome of a check.
    ///
    /// Returns `false` when the ticket is stale and the outcome was dropped.
    pub fn complete(&mut self, ticket: &ProbeTicket, outcome: Result<PresenceMap>) -> bool {
        self.complete_at(ticket, outcome, Instant::now())
    }

    pub(crate) fn complete_at(
        &mut self,
        ticket: &ProbeTicket,
        outcome: Result<PresenceMap>,
        now: Instant,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.machine) else {
            debug!(machine = %ticket.machine, "presence result for unknown machine dropped");
            return false;
        };

        if entry.generation != ticket.generation {
            debug!(
                machine = %ticket.machine,
                stale = ticket.generation,
                current = entry.generation,
                "stale presence result dropped"
            );
            return false;
        }

        entry.loading = false;
        match outcome {
            Ok(presence) => {
                entry.presence = presence;
                entry.fetched_at = Some(now);
                entry.last_error = None;
            }
            Err(e) => {
                warn!(machine = %ticket.machine, error = %e, "presence check failed");
                for name in &ticket.names {
                    entry.presence.remove(name);
                }
                entry.fetched_at = None;
                entry.last_error = Some(e.to_string());
            }
        }

        true
    }

    /// Current knowledge about `names` on `machine`
    pub fn snapshot(&self, machine: &str, names: &[String]) -> PresenceSnapshot {
        self.snapshot_at(machine, names, Instant::now())
    }

    pub(crate) fn snapshot_at(&self, machine: &str, names: &[String], now: Instant) -> PresenceSnapshot {
        let Some(entry) = self.entries.get(machine) else {
            return PresenceSnapshot {
                needs_refresh: true,
                ..PresenceSnapshot::default()
            };
        };

        let expired = entry
            .fetched_at
            .map_or(true, |at| now.saturating_duration_since(at) >= self.ttl);
        let covered = names.iter().all(|n| entry.presence.contains_key(n));

        PresenceSnapshot {
            presence: names
                .iter()
                .filter_map(|n| entry.presence.get(n).map(|v| (n.clone(), *v)))
                .collect(),
            is_loading: entry.loading,
            needs_refresh: !entry.loading && (expired || !covered),
        }
    }

    /// Error from the last completed check, if it failed
    pub fn last_error(&self, machine: &str) -> Option<&str> {
        self.entries
            .get(machine)
            .and_then(|e| e.last_error.as_deref())
    }

    /// Forget everything known about a machine
    pub fn invalidate(&mut self, machine: &str) {
        self.entries.remove(machine);
    }

    /// Check synchronously through `source` when the cached answer is stale.
    pub fn refresh(
        &mut self,
        source: &dyn PresenceSource,
        machine: &str,
        names: &[String],
    ) -> PresenceSnapshot {
        let current = self.snapshot(machine, names);
        if !current.needs_refresh {
            return current;
        }

        let ticket = self.begin(machine, names);
        let outcome = source.check(machine, names);
        self.complete(&ticket, outcome);
        self.snapshot(machine, names)
    }
}

impl Default for PresenceCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(constants::DEFAULT_PROBE_TTL_SECS))
    }
}
