pub mod acronym;
pub mod device;
pub mod enclosure;
pub mod health;
pub mod physical_drive;
pub mod topology;
pub mod virtual_drive;

pub use device::{Cell, Controller, Enclosure, PhysicalDrive, SlotAddress, TopologyEntry, VdKey, VirtualDrive};
pub use health::{ControllerModel, Finding, FindingKind, Findings, HealthEvaluator};
pub use topology::{TopologyReconciler, TopologySummary};
