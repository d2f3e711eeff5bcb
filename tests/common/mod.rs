//! Common test fixtures: a healthy storcli system that tests mutate

#![allow(dead_code)]

use raidcheck::collectors::CommandRunner;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const UTILITY: &str = "storcli64";

/// Canned storcli output keyed by command line (without the trailing "J")
pub struct Fixture {
    docs: BTreeMap<String, Value>,
    aliases: BTreeMap<String, String>,
    calls: RefCell<Vec<String>>,
}

fn wrap(data: Value) -> Value {
    json!({
        "Controllers": [{
            "Command Status": {"CLI Version": "007.1017.0000.0000", "Status": "Success", "Description": "None"},
            "Response Data": data
        }]
    })
}

fn drive_detail(ctrl: u32, slot: u32) -> (String, Value) {
    let drive = format!("/c{}/e252/s{}", ctrl, slot);
    (
        format!("Drive {} - Detailed Information", drive),
        json!({
            format!("Drive {} State", drive): {
                "Shield Counter": 0,
                "Media Error Count": 0,
                "Other Error Count": 0,
                "Drive Temperature": "  31C (87.80 F)",
                "Predictive Failure Count": 0,
                "S.M.A.R.T alert flagged by drive": "No"
            },
            format!("Drive {} Device attributes", drive): {"SN": "ZC1234", "Model Number": "ST1000NM0001"}
        }),
    )
}

impl Fixture {
    /// All-healthy controllers: one RAID1 VD over slots 0 and 1, slot 2 a
    /// global hotspare, one enclosure
    pub fn healthy(controllers: &[u32]) -> Self {
        let mut docs = BTreeMap::new();

        let overview: Vec<Value> = controllers
            .iter()
            .map(|c| {
                json!({
                    "Ctl": c, "Model": "PERC H730P Mini", "Ports": 8, "PDs": 3, "DGs": 1, "DNOpt": 0,
                    "VDs": 1, "VNOpt": 0, "BBU": "Opt", "sPR": "On", "DS": "1&2", "EHS": "Y",
                    "ASOs": 3, "Hlth": "Opt"
                })
            })
            .collect();
        docs.insert(
            "show".to_string(),
            wrap(json!({
                "Number of Controllers": controllers.len(),
                "Host Name": "storage01",
                "Operating System ": "Linux 6.1.0",
                "System Overview": overview
            })),
        );

        for &c in controllers {
            docs.insert(
                format!("/c{} show all", c),
                wrap(json!({
                    "Basics": {"Controller": c, "Model": "PERC H730P Mini"},
                    "Virtual Drives": 1,
                    "VD LIST": [
                        {"DG/VD": "0/0", "TYPE": "RAID1", "State": "Optl", "Access": "RW", "Consist": "Yes",
                         "Cache": "RWBD", "Cac": "-", "sCC": "ON", "Size": "931.0 GB", "Name": "root"}
                    ],
                    "Physical Drives": 3,
                    "PD LIST": [
                        {"EID:Slt": "252:0", "DID": 0, "State": "Onln", "DG": 0, "Size": "931.0 GB", "Intf": "SAS", "Med": "HDD", "Model": "ST1000NM0001"},
                        {"EID:Slt": "252:1", "DID": 1, "State": "Onln", "DG": 0, "Size": "931.0 GB", "Intf": "SAS", "Med": "HDD", "Model": "ST1000NM0001"},
                        {"EID:Slt": "252:2", "DID": 2, "State": "GHS", "DG": "-", "Size": "931.0 GB", "Intf": "SAS", "Med": "HDD", "Model": "ST1000NM0001"}
                    ],
                    "TOPOLOGY": [
                        {"DG": 0, "Arr": "-", "Row": "-", "EID:Slot": "-", "DID": "-", "Type": "RAID1", "State": "Optl", "Size": "931.0 GB"},
                        {"DG": 0, "Arr": 0, "Row": "-", "EID:Slot": "-", "DID": "-", "Type": "RAID1", "State": "Optl", "Size": "931.0 GB"},
                        {"DG": 0, "Arr": 0, "Row": 0, "EID:Slot": "252:0", "DID": 0, "Type": "DRIVE", "State": "Onln", "Size": "931.0 GB"},
                        {"DG": 0, "Arr": 0, "Row": 1, "EID:Slot": "252:1", "DID": 1, "Type": "DRIVE", "State": "Onln", "Size": "931.0 GB"}
                    ]
                })),
            );

            docs.insert(
                format!("/c{}/vall show all", c),
                wrap(json!({
                    format!("/c{}/v0", c): [
                        {"DG/VD": "0/0", "TYPE": "RAID1", "State": "Optl", "Access": "RW", "Consist": "Yes",
                         "Cache": "RWBD", "Cac": "-", "sCC": "ON", "Size": "931.0 GB", "Name": "root"}
                    ],
                    "PDs for VD 0": [
                        {"EID:Slt": "252:0", "DID": 0, "State": "Onln", "DG": 0, "Size": "931.0 GB"},
                        {"EID:Slt": "252:1", "DID": 1, "State": "Onln", "DG": 0, "Size": "931.0 GB"}
                    ],
                    "VD0 Properties": {
                        "Strip Size": "64 KB",
                        "Number of Drives Per Span": 2,
                        "Active Operations": "None",
                        "Exposed to OS": "Yes"
                    }
                })),
            );

            docs.insert(
                format!("/c{}/vall show bgi", c),
                wrap(json!({
                    "VD Operation Status": [
                        {"VD": 0, "Operation": "BGI", "Progress%": "-", "Status": "Not in progress", "Estimited Time Left": "-"}
                    ]
                })),
            );

            let mut drives = serde_json::Map::new();
            for slot in 0..3 {
                let (key, value) = drive_detail(c, slot);
                drives.insert(key, value);
            }
            docs.insert(format!("/c{}/eall/sall show all", c), wrap(Value::Object(drives)));

            docs.insert(
                format!("/c{}/eall show all", c),
                wrap(json!({
                    format!("Enclosure /c{}/e252  :", c): {
                        "Information": {"Device ID": 252, "Position": 1, "Enclosure Type": "SGPIO", "Status": "OK"},
                        "Properties": [{"EID": 252, "State": "OK", "Slots": 8, "PD": 3}]
                    }
                })),
            );
        }

        Self {
            docs,
            aliases: BTreeMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Mutable access to the "Response Data" of a command
    pub fn data(&mut self, command: &str) -> &mut Value {
        self.docs
            .get_mut(command)
            .unwrap_or_else(|| panic!("no fixture for '{}'", command))
            .pointer_mut("/Controllers/0/Response Data")
            .unwrap()
    }

    pub fn set(&mut self, command: &str, data: Value) {
        self.docs.insert(command.to_string(), wrap(data));
    }

    pub fn set_raw(&mut self, command: &str, document: Value) {
        self.docs.insert(command.to_string(), document);
    }

    pub fn remove(&mut self, command: &str) {
        self.docs.remove(command);
    }

    /// Make `name` run the same executable as `target`, like a symlink
    pub fn alias(&mut self, name: &str, target: &str) {
        self.aliases.insert(name.to_string(), target.to_string());
    }

    fn target<'a>(&'a self, binary: &'a str) -> &'a str {
        self.aliases.get(binary).map(String::as_str).unwrap_or(binary)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for Fixture {
    fn run(&self, binary: &str, args: &[String]) -> anyhow::Result<Vec<u8>> {
        assert_eq!(args.last().map(String::as_str), Some("J"));
        let command = args[..args.len() - 1].join(" ");
        self.calls.borrow_mut().push(command.clone());

        if self.target(binary) != UTILITY {
            anyhow::bail!("{}: command not found", binary);
        }

        match self.docs.get(&command) {
            Some(doc) => Ok(serde_json::to_vec(doc)?),
            None => anyhow::bail!("no output for '{}'", command),
        }
    }

    fn resolve(&self, binary: &str) -> Option<PathBuf> {
        Some(PathBuf::from(format!("/opt/MegaRAID/{}", self.target(binary))))
    }
}
