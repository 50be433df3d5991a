//! # Static signal taxonomy table.
//!
//! [`SignalTable`] is the bidirectional mapping between the per-job signal
//! catalogue ([`JobSignalKind`]) and the canonical process-wide catalogue
//! ([`EventKind`]). It is a fixed table built once; the mapper consults it
//! for every translated signal, and consumers can walk it back to the
//! per-job kind a canonical event originated from.
//!
//! [`EventKind::StatsChanged`] has no per-job lifecycle counterpart: it is
//! derived from the job's statistics collector, one indirection level
//! deeper than the job's own emitter.

use crate::engine::JobSignalKind;
use crate::events::EventKind;

/// Fixed pairing of per-job signal kinds with canonical event kinds.
const PAIRS: [(JobSignalKind, EventKind); 15] = [
    (JobSignalKind::EngineStarted, EventKind::EngineStarted),
    (JobSignalKind::EngineStopped, EventKind::EngineStopped),
    (JobSignalKind::EnginePaused, EventKind::EnginePaused),
    (JobSignalKind::EngineResumed, EventKind::EngineResumed),
    (JobSignalKind::SpiderOpened, EventKind::SpiderOpened),
    (JobSignalKind::SpiderIdle, EventKind::SpiderIdle),
    (JobSignalKind::SpiderClosing, EventKind::SpiderClosing),
    (JobSignalKind::SpiderClosed, EventKind::SpiderClosed),
    (JobSignalKind::SpiderError, EventKind::SpiderError),
    (JobSignalKind::ItemScraped, EventKind::ItemScraped),
    (JobSignalKind::ItemDropped, EventKind::ItemDropped),
    (JobSignalKind::RequestScheduled, EventKind::RequestScheduled),
    (JobSignalKind::RequestDropped, EventKind::RequestDropped),
    (JobSignalKind::ResponseReceived, EventKind::ResponseReceived),
    (JobSignalKind::ResponseDownloaded, EventKind::ResponseDownloaded),
];

/// Bidirectional lookup over the fixed signal taxonomy.
pub struct SignalTable;

impl SignalTable {
    /// Returns the canonical event kind for a per-job signal kind.
    ///
    /// Total: every per-job kind has exactly one canonical counterpart.
    pub fn canonical(kind: JobSignalKind) -> EventKind {
        // PAIRS is ordered to match the enum, but a scan keeps the table
        // the single source of truth.
        PAIRS
            .iter()
            .find(|(jk, _)| *jk == kind)
            .map(|(_, ek)| *ek)
            .unwrap_or_else(|| unreachable!("signal kind missing from table"))
    }

    /// Returns the per-job signal kind a canonical event kind maps back to.
    ///
    /// `None` for kinds with no per-job lifecycle source (`StatsChanged`).
    pub fn source(kind: EventKind) -> Option<JobSignalKind> {
        PAIRS.iter().find(|(_, ek)| *ek == kind).map(|(jk, _)| *jk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_job_kind_round_trips() {
        for (jk, _) in PAIRS {
            let canonical = SignalTable::canonical(jk);
            assert_eq!(SignalTable::source(canonical), Some(jk));
        }
    }

    #[test]
    fn test_stats_changed_has_no_job_source() {
        assert_eq!(SignalTable::source(EventKind::StatsChanged), None);
    }

    #[test]
    fn test_custom_signals_map_one_for_one() {
        assert_eq!(
            SignalTable::canonical(JobSignalKind::EnginePaused),
            EventKind::EnginePaused
        );
        assert_eq!(
            SignalTable::canonical(JobSignalKind::SpiderClosing),
            EventKind::SpiderClosing
        );
    }
}
