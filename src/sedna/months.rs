//! Month abbreviations as printed on Sedna planning pages.
//!
//! The portal prints three-letter French abbreviations. The table is exact
//! and case-sensitive; June and July share a prefix, so the portal uses
//! `Jui` for juin and `Jul` for juillet.

use chrono::Month;

/// A month resolved from a planning-page abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalMonth {
    pub abbreviation: &'static str,
    /// Full French month name.
    pub name: &'static str,
    pub month: Month,
}

impl PortalMonth {
    /// Calendar month number, 1-based.
    pub fn number(&self) -> u32 {
        self.month.number_from_month()
    }
}

const fn entry(abbreviation: &'static str, name: &'static str, month: Month) -> PortalMonth {
    PortalMonth {
        abbreviation,
        name,
        month,
    }
}

pub const MONTHS: [PortalMonth; 12] = [
    entry("Jan", "janvier", Month::January),
    entry("Fév", "février", Month::February),
    entry("Mar", "mars", Month::March),
    entry("Avr", "avril", Month::April),
    entry("Mai", "mai", Month::May),
    entry("Jui", "juin", Month::June),
    entry("Jul", "juillet", Month::July),
    entry("Aoû", "août", Month::August),
    entry("Sep", "septembre", Month::September),
    entry("Oct", "octobre", Month::October),
    entry("Nov", "novembre", Month::November),
    entry("Déc", "décembre", Month::December),
];

/// Look up an abbreviation; anything outside the table is `None`.
pub fn resolve(abbreviation: &str) -> Option<PortalMonth> {
    MONTHS
        .iter()
        .find(|month| month.abbreviation == abbreviation)
        .copied()
}
