//! storcli / perccli collector
//!
//! Issues the fixed command catalogue for one utility flavor and turns each
//! validated payload into typed rows. Reference: storcli `J` (JSON) output.

use crate::collectors::response::CommandResponse;
use crate::collectors::runner::CommandRunner;
use crate::domain::device::{Cell, SlotAddress, VdKey};
use crate::error::{CheckError, Result};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Overview {
    #[serde(rename = "Number of Controllers")]
    pub controller_count: Cell,
    #[serde(rename = "System Overview", default)]
    pub controllers: Vec<OverviewRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverviewRow {
    #[serde(rename = "Ctl")]
    pub ctl: u32,
    #[serde(rename = "Model", default)]
    pub model: String,
    #[serde(rename = "PDs", default)]
    pub pds: Cell,
    #[serde(rename = "DGs", default)]
    pub dgs: Cell,
    #[serde(rename = "DNOpt", default)]
    pub dnopt: Cell,
    #[serde(rename = "VDs", default)]
    pub vds: Cell,
    #[serde(rename = "VNOpt", default)]
    pub vnopt: Cell,
    #[serde(rename = "BBU", default)]
    pub bbu: String,
    #[serde(rename = "Hlth", default)]
    pub health: String,
}

/// `/cN show all`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerDetail {
    #[serde(rename = "TOPOLOGY", default)]
    pub topology: Vec<TopologyRow>,
    #[serde(rename = "VD LIST", default)]
    pub vd_list: Vec<VdRow>,
    #[serde(rename = "PD LIST", default)]
    pub pd_list: Vec<PdRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopologyRow {
    #[serde(rename = "DG", default)]
    pub dg: Cell,
    #[serde(rename = "Arr", default)]
    pub arr: Cell,
    #[serde(rename = "Row", default)]
    pub row: Cell,
    #[serde(rename = "State", default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VdRow {
    #[serde(rename = "TYPE", default)]
    pub raid_type: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Access", default)]
    pub access: String,
    #[serde(rename = "Consist", default)]
    pub consist: String,
    #[serde(rename = "Size", default)]
    pub size: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdRow {
    #[serde(rename = "EID:Slt")]
    pub eid_slot: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Size", default)]
    pub size: String,
    #[serde(rename = "Model", default)]
    pub model: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VdProperties {
    #[serde(rename = "Active Operations", default)]
    pub active_operations: Option<String>,
}

/// `/cN/vall show all`, split by key kind
#[derive(Debug, Clone, Default)]
pub struct VirtualDriveDetail {
    pub info: BTreeMap<VdKey, VdRow>,
    pub properties: BTreeMap<u32, VdProperties>,
    pub members: BTreeMap<u32, Vec<PdRow>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BgiResponse {
    #[serde(rename = "VD Operation Status", default)]
    pub operations: Vec<BgiRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BgiRow {
    #[serde(rename = "VD")]
    pub vd: Cell,
    #[serde(rename = "Progress%", default)]
    pub progress: Cell,
    #[serde(rename = "Status", default)]
    pub status: String,
    // storcli spells it this way
    #[serde(rename = "Estimited Time Left", alias = "Estimated Time Left", default)]
    pub eta: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RebuildRow {
    #[serde(rename = "Drive-ID")]
    pub drive_id: String,
    #[serde(rename = "Progress%", default)]
    pub progress: Cell,
}

/// The "Drive ... State" block of `/cN/eall/sall show all`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DriveCounters {
    #[serde(rename = "Media Error Count", default)]
    pub media_errors: Option<Cell>,
    #[serde(rename = "Other Error Count", default)]
    pub other_errors: Option<Cell>,
    #[serde(rename = "Predictive Failure Count", default)]
    pub predictive_failures: Option<Cell>,
    #[serde(rename = "S.M.A.R.T alert flagged by drive", default)]
    pub smart_alert: Option<String>,
    #[serde(rename = "Drive Temperature", default)]
    pub temperature: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnclosureSection {
    #[serde(rename = "Information", default)]
    information: Option<EnclosureInformation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnclosureInformation {
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

/// Enclosure as reported, before label normalisation
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosureRow {
    pub raw_label: String,
    pub status: Option<String>,
}

pub struct StorcliCollector<'a> {
    runner: &'a dyn CommandRunner,
    binary: String,
}

impl<'a> StorcliCollector<'a> {
    pub fn new(runner: &'a dyn CommandRunner, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    fn invoke(&self, args: &[&str]) -> Result<(String, Vec<u8>)> {
        let command = format!("{} {}", self.binary, args.join(" "));
        let mut argv: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        argv.push("J".to_string());

        let raw = self
            .runner
            .run(&self.binary, &argv)
            .map_err(|e| CheckError::unavailable(&command, format!("{:#}", e)))?;

        Ok((command, raw))
    }

    fn query(&self, args: &[&str]) -> Result<CommandResponse> {
        let (command, raw) = self.invoke(args)?;
        CommandResponse::decode(&command, &raw)
    }

    /// Enumerate controllers. `Unavailable` means this flavor is not
    /// installed; `Schema` means its output can no longer be trusted.
    pub fn overview(&self) -> Result<Overview> {
        let (command, raw) = self.invoke(&["show"])?;
        let response = CommandResponse::decode_enumeration(&command, &raw)?;

        response.parse::<Overview>().map_err(|e| CheckError::Schema {
            command: command.clone(),
            path: format!("System Overview ({})", e),
        })
    }

    pub fn controller_detail(&self, ctrl: u32) -> Result<ControllerDetail> {
        self.query(&[format!("/c{}", ctrl).as_str(), "show", "all"])?.parse()
    }

    pub fn virtual_drives(&self, ctrl: u32) -> Result<VirtualDriveDetail> {
        let response = self.query(&[format!("/c{}/vall", ctrl).as_str(), "show", "all"])?;
        let sections = object(&response)?;
        let mut detail = VirtualDriveDetail::default();

        for (key, value) in sections {
            if let Some(vd) = VdKey::from_path(key) {
                let rows: Vec<VdRow> = response.parse_value(value)?;
                if let Some(row) = rows.into_iter().next() {
                    detail.info.insert(vd, row);
                }
            } else if let Some(index) = properties_index(key) {
                detail.properties.insert(index, response.parse_value(value)?);
            } else if let Some(index) = members_index(key) {
                detail.members.insert(index, response.parse_value(value)?);
            } else {
                debug!("{}: ignoring section '{}'", response.command(), key);
            }
        }

        Ok(detail)
    }

    pub fn background_init(&self, ctrl: u32) -> Result<Vec<BgiRow>> {
        let response = self.query(&[format!("/c{}/vall", ctrl).as_str(), "show", "bgi"])?;
        Ok(response.parse::<BgiResponse>()?.operations)
    }

    pub fn rebuild_status(&self, ctrl: u32) -> Result<Vec<RebuildRow>> {
        let response = self.query(&[format!("/c{}/eall/sall", ctrl).as_str(), "show", "rebuild"])?;

        match response.data() {
            Value::Array(_) => response.parse(),
            Value::Object(map) => {
                let mut rows = Vec::new();
                for value in map.values().filter(|v| v.is_array()) {
                    rows.extend(response.parse_value::<Vec<RebuildRow>>(value)?);
                }
                Ok(rows)
            }
            _ => Err(CheckError::unavailable(response.command(), "unexpected payload")),
        }
    }

    pub fn drive_detail(&self, ctrl: u32) -> Result<BTreeMap<SlotAddress, DriveCounters>> {
        let response = self.query(&[format!("/c{}/eall/sall", ctrl).as_str(), "show", "all"])?;
        let mut counters = BTreeMap::new();

        for (key, value) in object(&response)? {
            let Some(drive) = key
                .strip_prefix("Drive ")
                .and_then(|rest| rest.strip_suffix(" - Detailed Information"))
            else {
                continue;
            };
            let Some(address) = SlotAddress::from_drive_path(drive) else {
                debug!("{}: unparseable drive id '{}'", response.command(), drive);
                continue;
            };

            let state_key = format!("Drive {} State", drive);
            match value.get(&state_key) {
                Some(state) => {
                    counters.insert(address, response.parse_value(state)?);
                }
                None => debug!("{}: no '{}' block", response.command(), state_key),
            }
        }

        Ok(counters)
    }

    pub fn enclosures(&self, ctrl: u32) -> Result<Vec<EnclosureRow>> {
        let response = self.query(&[format!("/c{}/eall", ctrl).as_str(), "show", "all"])?;
        let mut enclosures = Vec::new();

        for (key, value) in object(&response)? {
            if !key.starts_with("Enclosure ") {
                continue;
            }
            let section: EnclosureSection = response.parse_value(value)?;
            enclosures.push(EnclosureRow {
                raw_label: key.clone(),
                status: section.information.and_then(|info| info.status),
            });
        }

        Ok(enclosures)
    }
}

fn object(response: &CommandResponse) -> Result<&serde_json::Map<String, Value>> {
    response
        .data()
        .as_object()
        .ok_or_else(|| CheckError::unavailable(response.command(), "payload is not an object"))
}

/// "VD3 Properties" -> 3
fn properties_index(key: &str) -> Option<u32> {
    key.strip_prefix("VD")?.strip_suffix(" Properties")?.parse().ok()
}

/// "PDs for VD 3" -> 3
fn members_index(key: &str) -> Option<u32> {
    key.strip_prefix("PDs for VD ")?.trim().parse().ok()
}
