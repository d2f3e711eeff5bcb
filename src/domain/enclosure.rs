use crate::collectors::storcli::EnclosureRow;
use crate::domain::device::Enclosure;

const LABEL_PREFIX: &str = "Enclosure ";

/// "Enclosure /c0/e252  :" -> "/c0/e252"
pub fn normalize_label(raw: &str) -> String {
    raw.strip_prefix(LABEL_PREFIX)
        .unwrap_or(raw)
        .trim_end_matches(|c: char| c.is_whitespace() || c == ':')
        .trim_start()
        .to_string()
}

/// "/c0/e252" -> (0, 252)
fn enclosure_id(label: &str) -> Option<(u32, u32)> {
    let (controller, enclosure) = label.strip_prefix("/c")?.split_once("/e")?;
    Some((controller.parse().ok()?, enclosure.parse().ok()?))
}

pub struct EnclosureReconciler;

impl EnclosureReconciler {
    pub fn new() -> Self {
        Self
    }

    pub fn reconcile(&self, rows: Vec<EnclosureRow>) -> Vec<Enclosure> {
        let mut enclosures: Vec<Enclosure> = rows
            .into_iter()
            .map(|row| Enclosure {
                label: normalize_label(&row.raw_label),
                status: row.status.map(|s| s.trim().to_string()),
            })
            .collect();

        // Numeric ids so that e9 sorts before e10
        enclosures.sort_by(|a, b| {
            (enclosure_id(&a.label), &a.label).cmp(&(enclosure_id(&b.label), &b.label))
        });
        enclosures
    }
}

impl Default for EnclosureReconciler {
    fn default() -> Self {
        Self::new()
    }
}
