use crate::domain::device::{Controller, Enclosure, PhysicalDrive, VirtualDrive};
use crate::domain::health::ControllerModel;
use crate::domain::topology::TopologySummary;
use serde::Serialize;
use std::io::{self, Write};

/// Reconciled state in dump form. Drives are listed in key order since the
/// typed keys cannot be JSON object keys.
#[derive(Serialize)]
struct ModelDump<'a> {
    utility: &'a str,
    controller: &'a Controller,
    topology: &'a TopologySummary,
    virtual_drives: Vec<&'a VirtualDrive>,
    physical_drives: Vec<&'a PhysicalDrive>,
    enclosures: &'a [Enclosure],
}

/// Write the reconciled model of one controller as pretty JSON
pub fn write_model(out: &mut dyn Write, utility: &str, model: &ControllerModel) -> io::Result<()> {
    let dump = ModelDump {
        utility,
        controller: &model.controller,
        topology: &model.topology,
        virtual_drives: model.virtual_drives.values().collect(),
        physical_drives: model.physical_drives.values().collect(),
        enclosures: &model.enclosures,
    };

    let json = serde_json::to_string_pretty(&dump).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(out, "{}", json)
}
