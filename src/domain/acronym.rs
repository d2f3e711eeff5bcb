/// Human-readable labels for the status codes the vendor utility prints.
///
/// Unknown codes are returned unchanged so a new firmware state still shows
/// up in the report, just untranslated.
const ACRONYMS: &[(&str, &str)] = &[
    // Virtual drive states
    ("Optl", "Optimal"),
    ("OfLn", "OffLine"),
    ("Pdgd", "Partially Degraded"),
    ("Dgrd", "Degraded"),
    ("Rec", "Recovery"),
    ("Cac", "CacheCade"),
    ("Cbshld", "Cache shielded"),
    // Physical drive states
    ("Onln", "Online"),
    ("Offln", "Offline"),
    ("UGood", "Unconfigured Good"),
    ("UGUnsp", "Unconfigured Good Unsupported"),
    ("UGShld", "Unconfigured Good shielded"),
    ("UBad", "Unconfigured Bad"),
    ("UBUnsp", "Unconfigured Bad Unsupported"),
    ("GHS", "Global Hotspare"),
    ("DHS", "Dedicated Hotspare"),
    ("HSPShld", "Hotspare shielded"),
    ("CFShld", "Configured shielded"),
    ("Rbld", "Rebuild"),
    ("Cpybck", "Copyback"),
    ("Msng", "Missing"),
    ("Frgn", "Foreign"),
    ("Sntze", "Sanitize"),
    ("JBOD", "Just a Bunch Of Drives"),
    // Access modes
    ("RW", "Read Write"),
    ("R", "Read Only"),
    ("RO", "Read Only"),
    ("B", "Blocked"),
    ("HD", "Hidden"),
    ("TRANS", "Transport Ready"),
    // Controller health / battery backup
    ("Opt", "Optimal"),
    ("Dgd", "Degraded"),
    ("NdAtn", "Needs Attention"),
    ("Unkn", "Unknown"),
    ("Fld", "Failed"),
    ("Lrn", "Learning"),
];

pub fn translate(code: &str) -> &str {
    let code = code.trim();
    ACRONYMS
        .iter()
        .find(|(acronym, _)| *acronym == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}
