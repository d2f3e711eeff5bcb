use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A storcli table cell that is either a number or a text placeholder such as "-"
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(u64),
    Text(String),
}

impl Cell {
    pub const PLACEHOLDER: &'static str = "-";

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().trim_end_matches('%').parse().ok(),
        }
    }

    /// True for numbers and for text made only of ASCII digits
    pub fn is_numeric(&self) -> bool {
        match self {
            Cell::Number(_) => true,
            Cell::Text(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Cell::Text(s) if s.trim() == Self::PLACEHOLDER)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Text(Self::PLACEHOLDER.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

/// Physical drive location: controller, enclosure (absent for direct-attached
/// drives) and slot
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotAddress {
    pub controller: u32,
    pub enclosure: Option<u32>,
    pub slot: u32,
}

impl SlotAddress {
    /// Parse the "EID:Slt" form used in drive lists and topology rows
    pub fn from_eid_slot(controller: u32, eid_slot: &str) -> Option<Self> {
        let (enclosure, slot) = eid_slot.split_once(':')?;
        let enclosure = enclosure.trim();
        let enclosure = if enclosure.is_empty() {
            None
        } else {
            Some(enclosure.parse().ok()?)
        };

        Some(Self {
            controller,
            enclosure,
            slot: slot.trim().parse().ok()?,
        })
    }

    /// Parse a drive path such as "/c0/e252/s4" or "/c1/s2"
    pub fn from_drive_path(path: &str) -> Option<Self> {
        let mut parts = path.trim().trim_start_matches('/').split('/');

        let controller = parts.next()?.strip_prefix('c')?.parse().ok()?;
        let mut next = parts.next()?;
        let enclosure = match next.strip_prefix('e') {
            Some(eid) => {
                let eid = eid.parse().ok()?;
                next = parts.next()?;
                Some(eid)
            }
            None => None,
        };
        let slot = next.strip_prefix('s')?.parse().ok()?;

        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            controller,
            enclosure,
            slot,
        })
    }
}

impl fmt::Display for SlotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.enclosure {
            Some(eid) => write!(f, "/c{}/e{}/s{}", self.controller, eid, self.slot),
            None => write!(f, "/c{}/s{}", self.controller, self.slot),
        }
    }
}

/// Virtual drive identity: controller index plus VD index
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VdKey {
    pub controller: u32,
    pub index: u32,
}

impl VdKey {
    /// Parse "/c<ctrl>/v<index>". Anything else is not a virtual drive key.
    pub fn from_path(path: &str) -> Option<Self> {
        let rest = path.strip_prefix("/c")?;
        let (controller, index) = rest.split_once("/v")?;
        if controller.is_empty() || index.is_empty() {
            return None;
        }
        if !controller.chars().all(|c| c.is_ascii_digit()) || !index.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            controller: controller.parse().ok()?,
            index: index.parse().ok()?,
        })
    }
}

impl fmt::Display for VdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/c{}/v{}", self.controller, self.index)
    }
}

/// One row of the controller overview
#[derive(Clone, Debug, Default, Serialize)]
pub struct Controller {
    pub index: u32,
    pub model: String,
    pub health: String,          // Hlth acronym, e.g. "Opt"
    pub drive_groups: u64,
    pub drive_groups_not_optimal: u64,
    pub virtual_drives: u64,
    pub virtual_drives_not_optimal: u64,
    pub physical_drives: u64,
    pub bbu: String,             // BBU acronym, e.g. "Opt", "Msng", "N/A"
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopologyEntry {
    pub controller: u32,
    pub drive_group: Cell,
    pub array: Cell,
    pub row: Cell,
    pub state: String,
}

impl TopologyEntry {
    /// Array-level aggregate rows lag behind drive state during rebuilds
    pub fn is_array_aggregate(&self) -> bool {
        self.drive_group.is_numeric() && self.array.is_numeric() && self.row.is_placeholder()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BackgroundInit {
    pub status: String,
    pub progress: Option<u64>,
    pub eta: Option<String>,
}

impl BackgroundInit {
    pub fn in_progress(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("In progress")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VirtualDrive {
    pub key: VdKey,
    pub name: String,
    pub raid_type: String,
    pub size: String,
    pub state: String,
    pub access: String,
    pub active_operations: Option<String>,
    pub consistent: String,
    pub background_init: Option<BackgroundInit>,
    /// Member slots; the drive records themselves live in the drive table
    pub members: BTreeSet<SlotAddress>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhysicalDrive {
    pub address: SlotAddress,
    pub state: String,
    pub model: String,
    pub size: String,
    pub rebuild_progress: Option<u64>,
    pub smart_alert: Option<String>,
    pub predictive_failures: Option<u64>,
    pub media_errors: Option<u64>,
    pub other_errors: Option<u64>,
    pub temperature: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Enclosure {
    pub label: String,
    pub status: Option<String>,
}
