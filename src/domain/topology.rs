use crate::collectors::storcli::TopologyRow;
use crate::domain::device::TopologyEntry;
use crate::domain::health::Finding;
use log::debug;
use serde::Serialize;

const STATE_REBUILDING: &str = "Rbld";
const STATE_MISSING: &str = "Msng";

#[derive(Clone, Debug, Default, Serialize)]
pub struct TopologySummary {
    /// Drive-level rows that survived aggregate filtering
    pub entries: Vec<TopologyEntry>,
    /// Rows in rebuild; non-zero means rebuild status must be queried
    pub rebuilding: usize,
    /// One fault per drive slot the controller reports as missing
    pub missing: Vec<Finding>,
}

pub struct TopologyReconciler;

impl TopologyReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Walk the controller topology.
    ///
    /// Array-level aggregate rows are dropped first: their state lags behind
    /// the member drives during a rebuild and would raise false faults. A
    /// missing drive has no entry in the drive list, so this is the only
    /// place it can be detected.
    pub fn reconcile(&self, controller: u32, rows: &[TopologyRow]) -> TopologySummary {
        let mut summary = TopologySummary::default();

        for row in rows {
            let entry = TopologyEntry {
                controller,
                drive_group: row.dg.clone(),
                array: row.arr.clone(),
                row: row.row.clone(),
                state: row.state.trim().to_string(),
            };

            if entry.is_array_aggregate() {
                debug!(
                    "c{}: skipping array row DG {} Arr {} ({})",
                    controller, entry.drive_group, entry.array, entry.state
                );
                continue;
            }

            match entry.state.as_str() {
                STATE_REBUILDING => summary.rebuilding += 1,
                STATE_MISSING => summary.missing.push(Finding::fault(format!(
                    "Drive in DG {} Array {} Row {} is Missing",
                    entry.drive_group, entry.array, entry.row
                ))),
                _ => {}
            }

            summary.entries.push(entry);
        }

        debug!(
            "c{}: topology {} rows, {} rebuilding, {} missing",
            controller,
            summary.entries.len(),
            summary.rebuilding,
            summary.missing.len()
        );

        summary
    }
}

impl Default for TopologyReconciler {
    fn default() -> Self {
        Self::new()
    }
}
