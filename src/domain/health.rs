use crate::config::Thresholds;
use crate::domain::acronym::translate;
use crate::domain::device::{Controller, Enclosure, PhysicalDrive, SlotAddress, VdKey, VirtualDrive};
use crate::domain::topology::TopologySummary;
use crate::error::CheckError;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FindingKind {
    Summary,
    Fault,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    pub fn summary(message: impl Into<String>) -> Self {
        Self { kind: FindingKind::Summary, message: message.into() }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self { kind: FindingKind::Fault, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { kind: FindingKind::Warning, message: message.into() }
    }
}

/// Findings for one controller, kept in production order within each kind
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Findings {
    pub summary: Vec<Finding>,
    pub faults: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl Findings {
    pub fn push(&mut self, finding: Finding) {
        match finding.kind {
            FindingKind::Summary => self.summary.push(finding),
            FindingKind::Fault => self.faults.push(finding),
            FindingKind::Warning => self.warnings.push(finding),
        }
    }

    /// Summary first, then faults, then warnings
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.summary.iter().chain(&self.faults).chain(&self.warnings)
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.faults.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.summary.len() + self.faults.len() + self.warnings.len()
    }
}

/// Everything known about one controller after reconciliation
#[derive(Clone, Debug)]
pub struct ControllerModel {
    pub controller: Controller,
    pub topology: TopologySummary,
    pub virtual_drives: BTreeMap<VdKey, VirtualDrive>,
    pub physical_drives: BTreeMap<SlotAddress, PhysicalDrive>,
    pub enclosures: Vec<Enclosure>,
}

const VD_OPTIMAL: &str = "Optl";
const VD_READ_WRITE: &str = "RW";
const CONSISTENT: &str = "Yes";
const BGI_OPERATION: &str = "background initialization";

const PD_HEALTHY: &[&str] = &["Onln", "JBOD", "GHS", "DHS"];
const PD_UNCONFIGURED_GOOD: &str = "UGood";
const PD_REBUILDING: &str = "Rbld";

const BBU_ACCEPTED: &[&str] = &["Optimal", "Missing", "N/A"];
const ENCLOSURE_OK: &str = "OK";

#[derive(Default)]
struct DriveTally {
    unused: usize,
    rebuilding: usize,
    not_ok: usize,
}

pub struct HealthEvaluator {
    thresholds: Thresholds,
}

impl HealthEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn evaluate(&self, model: &ControllerModel) -> Findings {
        let mut findings = Findings::default();

        self.check_controller(&model.controller, &mut findings);

        // A missing drive only ever shows up in the topology
        for fault in &model.topology.missing {
            findings.push(fault.clone());
        }

        for vd in model.virtual_drives.values() {
            self.check_virtual_drive(vd, &mut findings);
        }

        let tally = self.check_physical_drives(model.physical_drives.values(), &mut findings);
        let total = model.controller.physical_drives;
        if tally.unused > 0 {
            findings.push(Finding::summary(format!("{} of {} drives unused", tally.unused, total)));
        }
        if tally.rebuilding > 0 {
            findings.push(Finding::summary(format!("{} of {} drives rebuilding", tally.rebuilding, total)));
        }
        if tally.not_ok > 0 {
            findings.push(Finding::summary(format!("{} of {} drives NOT OK", tally.not_ok, total)));
        }

        if let Err(e) = self.check_enclosures(&model.enclosures, &mut findings) {
            warn!("Controller {}: {}, skipping remaining enclosure checks", model.controller.index, e);
        }

        findings
    }

    /// Overview counters are the source of truth for totals
    fn check_controller(&self, controller: &Controller, findings: &mut Findings) {
        if controller.drive_groups_not_optimal > 0 {
            findings.push(Finding::summary(format!(
                "{} of {} Drive groups NOT OK",
                controller.drive_groups_not_optimal, controller.drive_groups
            )));
        }
        if controller.virtual_drives_not_optimal > 0 {
            findings.push(Finding::summary(format!(
                "{} of {} Virtual drives NOT OK",
                controller.virtual_drives_not_optimal, controller.virtual_drives
            )));
        }

        if controller.bbu.trim().is_empty() {
            debug!("Controller {}: no BBU status reported", controller.index);
        } else {
            let bbu = translate(&controller.bbu);
            if !BBU_ACCEPTED.contains(&bbu) {
                findings.push(Finding::summary(format!("BBU status {}", bbu)));
            }
        }
    }

    fn check_virtual_drive(&self, vd: &VirtualDrive, findings: &mut Findings) {
        let label = vd_label(vd);

        if vd.state.trim() != VD_OPTIMAL {
            findings.push(Finding::fault(format!("VD {} state is {}", label, translate(&vd.state))));
        }

        if vd.access.trim() != VD_READ_WRITE {
            findings.push(Finding::fault(format!("VD {} access is {}", label, translate(&vd.access))));
        }

        if let Some(ops) = vd.active_operations.as_deref() {
            if has_unexpected_operation(ops) {
                findings.push(Finding::fault(format!("VD {} active operation: {}", label, ops.trim())));
            }
        }

        // Inconsistency is expected while background init runs
        match vd.background_init.as_ref().filter(|bgi| bgi.in_progress()) {
            Some(bgi) => {
                let mut message = format!("VD {} background initialization in progress", label);
                if let Some(progress) = bgi.progress {
                    message.push_str(&format!(", {}% done", progress));
                }
                if let Some(eta) = bgi.eta.as_deref() {
                    message.push_str(&format!(", ETA {}", eta));
                }
                findings.push(Finding::fault(message));
            }
            None => {
                if vd.consistent.trim() != CONSISTENT {
                    findings.push(Finding::fault(format!("VD {} NOT Consistent", label)));
                }
            }
        }
    }

    fn check_physical_drives<'a>(
        &self,
        drives: impl Iterator<Item = &'a PhysicalDrive>,
        findings: &mut Findings,
    ) -> DriveTally {
        let mut tally = DriveTally::default();

        for drive in drives {
            let state = drive.state.trim();

            if PD_HEALTHY.contains(&state) {
                // fall through to the counters
            } else if state == PD_UNCONFIGURED_GOOD {
                findings.push(Finding::warning(format!("Drive {} Unused", drive.address)));
                tally.unused += 1;
            } else {
                findings.push(Finding::fault(drive_state_message(drive)));
                if state == PD_REBUILDING {
                    tally.rebuilding += 1;
                } else {
                    tally.not_ok += 1;
                }
                // Counters of a failed or rebuilding drive are not actionable
                continue;
            }

            self.check_drive_counters(drive, findings);
        }

        tally
    }

    fn check_drive_counters(&self, drive: &PhysicalDrive, findings: &mut Findings) {
        if let Some(alert) = drive.smart_alert.as_deref() {
            if alert.trim() != "No" {
                findings.push(Finding::fault(format!("Drive {} S.M.A.R.T alert flagged ({})", drive.address, alert.trim())));
            }
        }

        if let Some(count) = drive.predictive_failures {
            if count > self.thresholds.predictive_failures {
                findings.push(Finding::fault(format!("Drive {} Predictive Failures {}", drive.address, count)));
            }
        }

        if let Some(count) = drive.media_errors {
            if count > self.thresholds.media_errors {
                findings.push(Finding::fault(format!("Drive {} Media Errors {}", drive.address, count)));
            }
        }
    }

    fn check_enclosures(&self, enclosures: &[Enclosure], findings: &mut Findings) -> Result<(), CheckError> {
        for enclosure in enclosures {
            let status = enclosure.status.as_deref().ok_or_else(|| CheckError::MissingField {
                context: format!("Enclosure {}", enclosure.label),
                field: "Status".to_string(),
            })?;

            if status.trim() != ENCLOSURE_OK {
                findings.push(Finding::fault(format!("Enclosure {} status {}", enclosure.label, status.trim())));
            }
        }

        Ok(())
    }
}

fn vd_label(vd: &VirtualDrive) -> String {
    let name = vd.name.trim();
    let kind = vd.raid_type.trim();
    match (name.is_empty(), kind.is_empty()) {
        (true, true) => vd.key.to_string(),
        (true, false) => format!("{} ({})", vd.key, kind),
        (false, true) => format!("{} ({})", vd.key, name),
        (false, false) => format!("{} ({}, {})", vd.key, name, kind),
    }
}

/// Background initialization is tolerated, any other running operation is not
fn has_unexpected_operation(ops: &str) -> bool {
    ops.split(',')
        .map(str::trim)
        .filter(|op| !op.is_empty())
        .any(|op| !op.eq_ignore_ascii_case("None") && !op.to_ascii_lowercase().contains(BGI_OPERATION))
}

fn drive_state_message(drive: &PhysicalDrive) -> String {
    let mut message = format!("Drive {} is {}", drive.address, translate(&drive.state));
    if let Some(progress) = drive.rebuild_progress {
        message.push_str(&format!(" ({}% done)", progress));
    }
    message
}
