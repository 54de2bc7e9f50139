//! Inverter loading, load presets and the operator advisory.

use std::fmt;

use super::sources::PowerSourceAvailability;

/// Load as a percentage of the inverter rating.
///
/// Not capped at 100; callers clamp for display. A non-positive rating
/// yields 0.
///
/// # Examples
///
/// ```
/// use backup_estimator::estimate::load::{format_load_percentage, load_percentage};
///
/// let pct = load_percentage(500.0, 4200.0);
/// assert_eq!(format_load_percentage(pct), "11.9%");
/// ```
pub fn load_percentage(load_w: f64, inverter_capacity_w: f64) -> f64 {
    if inverter_capacity_w <= 0.0 {
        return 0.0;
    }
    load_w / inverter_capacity_w * 100.0
}

/// One decimal with ties rounded up: `12.25` reads `12.3%`.
pub fn format_load_percentage(pct: f64) -> String {
    format!("{:.1}%", (pct * 10.0).round() / 10.0)
}

/// Load percentage above which the inverter is overloaded.
pub const OVERLOAD_PCT: f64 = 90.0;
/// Load percentage above which the load counts as high.
pub const HIGH_LOAD_PCT: f64 = 70.0;

/// One-line operator message, most urgent condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAdvisory {
    NoInput,
    Overload,
    HighLoad,
    ChargingWell,
    Normal,
}

impl LoadAdvisory {
    pub fn evaluate(
        sources: &PowerSourceAvailability,
        load_pct: f64,
        charging: bool,
        battery_pct: f64,
    ) -> Self {
        if !sources.has_input() {
            Self::NoInput
        } else if load_pct > OVERLOAD_PCT {
            Self::Overload
        } else if load_pct > HIGH_LOAD_PCT {
            Self::HighLoad
        } else if charging && battery_pct > 80.0 {
            Self::ChargingWell
        } else {
            Self::Normal
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NoInput => "No power input! Running on battery only.",
            Self::Overload => "Load exceeds 90%! Reduce immediately.",
            Self::HighLoad => "High load detected.",
            Self::ChargingWell => "Battery charging well!",
            Self::Normal => "System operating normally.",
        }
    }
}

impl fmt::Display for LoadAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Quick-pick appliance load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadPreset {
    pub name: &'static str,
    pub watts: f64,
    pub description: &'static str,
}

pub const LOAD_PRESETS: [LoadPreset; 6] = [
    LoadPreset {
        name: "Lights",
        watts: 100.0,
        description: "LED lights",
    },
    LoadPreset {
        name: "TV",
        watts: 500.0,
        description: "Television",
    },
    LoadPreset {
        name: "Fridge",
        watts: 1500.0,
        description: "Refrigerator",
    },
    LoadPreset {
        name: "AC",
        watts: 2000.0,
        description: "Air conditioning",
    },
    LoadPreset {
        name: "Heavy",
        watts: 3000.0,
        description: "Heavy appliances",
    },
    LoadPreset {
        name: "Off",
        watts: 0.0,
        description: "No load",
    },
];

/// Looks up a preset by name, ignoring ASCII case.
pub fn find_preset(name: &str) -> Option<&'static LoadPreset> {
    LOAD_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::sources::evaluate_sources;

    #[test]
    fn load_percentage_of_rating() {
        let pct = load_percentage(500.0, 4200.0);
        assert!((pct - 11.904_761_904_761_905).abs() < 1e-12);
        assert_eq!(format_load_percentage(pct), "11.9%");
    }

    #[test]
    fn load_percentage_ties_round_up() {
        assert_eq!(format_load_percentage(12.25), "12.3%");
        assert_eq!(format_load_percentage(load_percentage(514.5, 4200.0)), "12.3%");
        assert_eq!(format_load_percentage(0.0), "0.0%");
    }

    #[test]
    fn load_percentage_is_not_capped() {
        assert_eq!(load_percentage(8400.0, 4200.0), 200.0);
        assert_eq!(load_percentage(100.0, 0.0), 0.0);
    }

    #[test]
    fn advisory_precedence() {
        let grid = evaluate_sources(true, 190.0, false, 0.0);
        let none = evaluate_sources(false, 0.0, false, 0.0);

        assert_eq!(LoadAdvisory::evaluate(&none, 95.0, true, 90.0), LoadAdvisory::NoInput);
        assert_eq!(LoadAdvisory::evaluate(&grid, 95.0, true, 90.0), LoadAdvisory::Overload);
        assert_eq!(LoadAdvisory::evaluate(&grid, 75.0, true, 90.0), LoadAdvisory::HighLoad);
        assert_eq!(
            LoadAdvisory::evaluate(&grid, 10.0, true, 90.0),
            LoadAdvisory::ChargingWell
        );
        assert_eq!(LoadAdvisory::evaluate(&grid, 10.0, false, 90.0), LoadAdvisory::Normal);
    }

    #[test]
    fn presets_lookup() {
        assert_eq!(find_preset("fridge").map(|p| p.watts), Some(1500.0));
        assert_eq!(find_preset("Off").map(|p| p.watts), Some(0.0));
        assert!(find_preset("kettle").is_none());
    }
}
