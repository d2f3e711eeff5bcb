use crate::collectors::runner::CommandRunner;
use crate::collectors::storcli::{OverviewRow, StorcliCollector};
use crate::config::Config;
use crate::domain::device::{Controller, PhysicalDrive, SlotAddress, VdKey, VirtualDrive};
use crate::domain::enclosure::EnclosureReconciler;
use crate::domain::health::{ControllerModel, Findings, HealthEvaluator};
use crate::domain::physical_drive::PhysicalDriveReconciler;
use crate::domain::topology::TopologyReconciler;
use crate::domain::virtual_drive::VirtualDriveReconciler;
use crate::error::Result;
use crate::ui::debug::write_model;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Evaluation result for one controller of one utility flavor
#[derive(Clone, Debug)]
pub struct ControllerReport {
    pub utility: String,
    pub controller: Controller,
    pub findings: Findings,
}

#[derive(Clone, Debug, Default)]
pub struct Outcome {
    pub reports: Vec<ControllerReport>,
}

impl Outcome {
    pub fn problems_found(&self) -> bool {
        self.reports.iter().any(|r| !r.findings.is_empty())
    }
}

/// Evaluate every controller of every utility flavor that responds.
///
/// Only a schema error is returned; controllers whose detail commands fail
/// are reported on the log and left out of the outcome.
pub fn run(config: &Config, runner: &dyn CommandRunner) -> Result<Outcome> {
    let evaluator = HealthEvaluator::new(config.thresholds);
    let mut outcome = Outcome::default();
    let mut seen = BTreeSet::new();

    for utility in &config.utility_search_order {
        // storcli is commonly a symlink to storcli64
        let identity = runner.resolve(utility).unwrap_or_else(|| utility.into());
        if !seen.insert(identity.clone()) {
            debug!("{}: resolves to {}, already queried", utility, identity.display());
            continue;
        }

        let collector = StorcliCollector::new(runner, utility.as_str());

        let overview = match collector.overview() {
            Ok(overview) => overview,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!("{}: not usable, skipping ({})", utility, e);
                continue;
            }
        };

        if overview.controller_count.as_u64() != Some(overview.controllers.len() as u64) {
            debug!(
                "{}: {} controllers reported, {} with RAID overview",
                utility,
                overview.controller_count,
                overview.controllers.len()
            );
        }

        for row in &overview.controllers {
            let controller = controller_from_overview(row);
            let index = controller.index;

            let model = match collect_controller(&collector, controller) {
                Ok(model) => model,
                Err(e) => {
                    warn!("{} controller {}: {}, skipping its checks", utility, index, e);
                    continue;
                }
            };

            if config.debug_output {
                if let Err(e) = write_model(&mut std::io::stderr(), utility, &model) {
                    warn!("Failed to write debug dump: {}", e);
                }
            }

            let findings = evaluator.evaluate(&model);
            debug!("{} controller {}: {} findings", utility, index, findings.len());

            outcome.reports.push(ControllerReport {
                utility: utility.clone(),
                controller: model.controller,
                findings,
            });
        }
    }

    Ok(outcome)
}

fn controller_from_overview(row: &OverviewRow) -> Controller {
    Controller {
        index: row.ctl,
        model: row.model.trim().to_string(),
        health: row.health.trim().to_string(),
        drive_groups: row.dgs.as_u64().unwrap_or(0),
        drive_groups_not_optimal: row.dnopt.as_u64().unwrap_or(0),
        virtual_drives: row.vds.as_u64().unwrap_or(0),
        virtual_drives_not_optimal: row.vnopt.as_u64().unwrap_or(0),
        physical_drives: row.pds.as_u64().unwrap_or(0),
        bbu: row.bbu.trim().to_string(),
    }
}

/// Issue the detail commands for one controller, in dependency order
fn collect_controller(collector: &StorcliCollector<'_>, controller: Controller) -> Result<ControllerModel> {
    let ctrl = controller.index;

    let detail = collector.controller_detail(ctrl)?;
    let topology = TopologyReconciler::new().reconcile(ctrl, &detail.topology);

    let virtual_drives = if detail.vd_list.is_empty() {
        BTreeMap::new()
    } else {
        let vds = collector.virtual_drives(ctrl)?;
        let bgi = collector.background_init(ctrl)?;
        VirtualDriveReconciler::reconcile(ctrl, vds, bgi)
    };

    let mut drives = PhysicalDriveReconciler::new(ctrl, &detail.pd_list);
    // Only ask for rebuild progress when something is rebuilding
    if topology.rebuilding > 0 {
        drives.add_rebuild_status(&collector.rebuild_status(ctrl)?);
    }
    if !detail.pd_list.is_empty() {
        drives.add_counters(collector.drive_detail(ctrl)?);
    }
    let physical_drives = drives.finish();

    let enclosures = EnclosureReconciler::new().reconcile(collector.enclosures(ctrl)?);

    cross_check_counts(&controller, &virtual_drives, &physical_drives);

    Ok(ControllerModel {
        controller,
        topology,
        virtual_drives,
        physical_drives,
        enclosures,
    })
}

fn cross_check_counts(
    controller: &Controller,
    virtual_drives: &BTreeMap<VdKey, VirtualDrive>,
    physical_drives: &BTreeMap<SlotAddress, PhysicalDrive>,
) {
    if virtual_drives.len() as u64 != controller.virtual_drives {
        debug!(
            "c{}: overview reports {} VDs, reconciled {}",
            controller.index,
            controller.virtual_drives,
            virtual_drives.len()
        );
    }
    if physical_drives.len() as u64 != controller.physical_drives {
        debug!(
            "c{}: overview reports {} PDs, reconciled {}",
            controller.index,
            controller.physical_drives,
            physical_drives.len()
        );
    }
}
