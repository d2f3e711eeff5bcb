use crate::collectors::storcli::{BgiRow, PdRow, VdProperties, VdRow, VirtualDriveDetail};
use crate::domain::device::{BackgroundInit, SlotAddress, VdKey, VirtualDrive};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Default)]
struct PartialVirtualDrive {
    info: Option<VdRow>,
    properties: Option<VdProperties>,
    members: Vec<PdRow>,
    background_init: Option<BgiRow>,
}

/// Merges the four per-VD sources into one record per virtual drive.
///
/// Only the info row is required. Properties, membership and background
/// init status are optional; a VD without them is still a valid VD.
pub struct VirtualDriveReconciler {
    controller: u32,
    partial: BTreeMap<u32, PartialVirtualDrive>,
}

impl VirtualDriveReconciler {
    pub fn new(controller: u32) -> Self {
        Self {
            controller,
            partial: BTreeMap::new(),
        }
    }

    /// Convenience wrapper over the builder for one controller
    pub fn reconcile(
        controller: u32,
        detail: VirtualDriveDetail,
        bgi: Vec<BgiRow>,
    ) -> BTreeMap<VdKey, VirtualDrive> {
        let mut builder = Self::new(controller);

        for (key, row) in detail.info {
            builder.add_info(key, row);
        }
        for (index, properties) in detail.properties {
            builder.add_properties(index, properties);
        }
        for (index, members) in detail.members {
            builder.add_members(index, members);
        }
        for row in bgi {
            builder.add_background_init(row);
        }

        builder.finish()
    }

    pub fn add_info(&mut self, key: VdKey, row: VdRow) {
        if key.controller != self.controller {
            debug!("c{}: ignoring VD row for {}", self.controller, key);
            return;
        }
        self.partial.entry(key.index).or_default().info = Some(row);
    }

    pub fn add_properties(&mut self, index: u32, properties: VdProperties) {
        self.partial.entry(index).or_default().properties = Some(properties);
    }

    pub fn add_members(&mut self, index: u32, members: Vec<PdRow>) {
        self.partial.entry(index).or_default().members.extend(members);
    }

    pub fn add_background_init(&mut self, row: BgiRow) {
        match row.vd.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(index) => self.partial.entry(index).or_default().background_init = Some(row),
            None => debug!("c{}: background init row without VD index: {:?}", self.controller, row.vd),
        }
    }

    /// Records come out sorted by VD index
    pub fn finish(self) -> BTreeMap<VdKey, VirtualDrive> {
        let controller = self.controller;
        let mut drives = BTreeMap::new();

        for (index, partial) in self.partial {
            let key = VdKey { controller, index };
            let Some(info) = partial.info else {
                debug!("{}: properties or status without a VD row, dropped", key);
                continue;
            };

            let members: BTreeSet<SlotAddress> = partial
                .members
                .iter()
                .filter_map(|pd| SlotAddress::from_eid_slot(controller, &pd.eid_slot))
                .collect();

            let background_init = partial.background_init.map(|row| BackgroundInit {
                status: row.status.trim().to_string(),
                progress: row.progress.as_u64(),
                eta: row.eta.map(|eta| eta.trim().to_string()).filter(|eta| !eta.is_empty() && eta != "-"),
            });

            drives.insert(
                key,
                VirtualDrive {
                    key,
                    name: info.name,
                    raid_type: info.raid_type,
                    size: info.size,
                    state: info.state,
                    access: info.access,
                    active_operations: partial.properties.and_then(|p| p.active_operations),
                    consistent: info.consist,
                    background_init,
                    members,
                },
            );
        }

        drives
    }
}
