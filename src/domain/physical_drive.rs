use crate::collectors::storcli::{DriveCounters, PdRow, RebuildRow};
use crate::domain::device::{Cell, PhysicalDrive, SlotAddress};
use log::debug;
use std::collections::BTreeMap;

/// Builds one record per drive in the controller's drive list, then layers
/// rebuild progress and detailed counters on top. Missing drives never
/// appear in the drive list and therefore never get a record here.
pub struct PhysicalDriveReconciler {
    controller: u32,
    drives: BTreeMap<SlotAddress, PhysicalDrive>,
}

impl PhysicalDriveReconciler {
    pub fn new(controller: u32, pd_list: &[PdRow]) -> Self {
        let mut drives = BTreeMap::new();

        for pd in pd_list {
            let Some(address) = SlotAddress::from_eid_slot(controller, &pd.eid_slot) else {
                debug!("c{}: unparseable drive slot '{}'", controller, pd.eid_slot);
                continue;
            };

            drives.insert(
                address.clone(),
                PhysicalDrive {
                    address,
                    state: pd.state.trim().to_string(),
                    model: pd.model.trim().to_string(),
                    size: pd.size.trim().to_string(),
                    rebuild_progress: None,
                    smart_alert: None,
                    predictive_failures: None,
                    media_errors: None,
                    other_errors: None,
                    temperature: None,
                },
            );
        }

        Self { controller, drives }
    }

    pub fn add_rebuild_status(&mut self, rows: &[RebuildRow]) {
        for row in rows {
            let Some(address) = SlotAddress::from_drive_path(&row.drive_id) else {
                debug!("c{}: unparseable rebuild drive id '{}'", self.controller, row.drive_id);
                continue;
            };

            match self.drives.get_mut(&address) {
                Some(drive) => drive.rebuild_progress = row.progress.as_u64(),
                None => debug!("{}: rebuild status for a drive not in the drive list", address),
            }
        }
    }

    pub fn add_counters(&mut self, counters: BTreeMap<SlotAddress, DriveCounters>) {
        for (address, counters) in counters {
            let Some(drive) = self.drives.get_mut(&address) else {
                debug!("{}: counters for a drive not in the drive list", address);
                continue;
            };

            drive.smart_alert = counters.smart_alert.map(|s| s.trim().to_string());
            drive.predictive_failures = counters.predictive_failures.as_ref().and_then(Cell::as_u64);
            drive.media_errors = counters.media_errors.as_ref().and_then(Cell::as_u64);
            drive.other_errors = counters.other_errors.as_ref().and_then(Cell::as_u64);
            drive.temperature = counters.temperature.map(|t| t.trim().to_string());
        }
    }

    pub fn finish(self) -> BTreeMap<SlotAddress, PhysicalDrive> {
        self.drives
    }
}
