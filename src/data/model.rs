use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column header of the rendered table, in field order.
pub const HEADER: [&str; 8] = ["Depth", "ROP", "TG", "C1", "C2", "C3", "C4", "Gamma"];

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

// ---------------------------------------------------------------------------
// Measurement – one row of the export at a single depth
// ---------------------------------------------------------------------------

/// All the channels we use from a single row of the Bloodhound export, or a
/// single depth on a mudlog. Depth is the only identity a row has.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    pub depth: i64,
    /// Rate of penetration.
    pub rop: f64,
    /// Total gas.
    pub tg: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub gamma: f64,
}

impl Measurement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        depth: i64,
        rop: f64,
        tg: f64,
        c1: f64,
        c2: f64,
        c3: f64,
        c4: f64,
        gamma: f64,
    ) -> Self {
        Measurement {
            depth,
            rop,
            tg,
            c1,
            c2,
            c3,
            c4,
            gamma,
        }
    }

    /// Ascending order by depth. Channel values never take part.
    pub fn depth_order(a: &Measurement, b: &Measurement) -> Ordering {
        a.depth.cmp(&b.depth)
    }

    /// Copy of this row with every channel carried over and a new depth.
    pub fn at_depth(&self, depth: i64) -> Self {
        Measurement { depth, ..*self }
    }

    /// The seven channels in field order.
    pub fn channels(&self) -> [f64; 7] {
        [
            self.rop, self.tg, self.c1, self.c2, self.c3, self.c4, self.gamma,
        ]
    }
}

impl fmt::Display for Measurement {
    /// Tab-joined fields: depth, rop, tg, c1, c2, c3, c4, gamma.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.depth)?;
        for value in self.channels() {
            write!(f, "\t{value}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WorkingSet – the ordered sequence being cleaned
// ---------------------------------------------------------------------------

/// An ordered list of measurements, built once from the export and then
/// cleaned in place (see `data::clean`). No ordering or uniqueness is
/// enforced by the type itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    pub(crate) data: Vec<Measurement>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one measurement; no validation, no ordering.
    pub fn add(&mut self, measurement: Measurement) {
        self.data.push(measurement);
    }

    /// Append every measurement from `measurements`, in order.
    pub fn add_all<I>(&mut self, measurements: I)
    where
        I: IntoIterator<Item = Measurement>,
    {
        self.data.extend(measurements);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[Measurement] {
        &self.data
    }

    /// Depth column, in current order.
    pub fn depths(&self) -> Vec<i64> {
        self.data.iter().map(|m| m.depth).collect()
    }

    /// Header line followed by one line per measurement, each terminated by
    /// the platform line break.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WorkingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{LINE_ENDING}", HEADER.join("\t"))?;
        for m in &self.data {
            write!(f, "{m}{LINE_ENDING}")?;
        }
        Ok(())
    }
}

impl FromIterator<Measurement> for WorkingSet {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        WorkingSet {
            data: iter.into_iter().collect(),
        }
    }
}

impl Extend<Measurement> for WorkingSet {
    fn extend<I: IntoIterator<Item = Measurement>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl IntoIterator for WorkingSet {
    type Item = Measurement;
    type IntoIter = std::vec::IntoIter<Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
