//! Time until the bank reaches full charge.

use super::duration::DurationEstimate;
use super::percentage::battery_percentage;

/// Share of the inverter rating its built-in charger delivers from the grid.
pub const GRID_CHARGER_DERATE: f64 = 0.8;

/// Everything the ETA depends on, gathered from configuration and reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeEtaInputs {
    pub voltage: f64,
    pub system_voltage: f64,
    pub battery_capacity_ah: f64,
    pub num_batteries: u32,
    pub grid_available: bool,
    pub solar_available: bool,
    pub solar_power_w: f64,
    pub inverter_capacity_w: f64,
}

/// Charging power (W) the available sources can put into the bank.
pub fn charging_power_watts(
    grid_available: bool,
    solar_available: bool,
    solar_power_w: f64,
    inverter_capacity_w: f64,
) -> f64 {
    let mut power = 0.0;
    if grid_available {
        power += inverter_capacity_w * GRID_CHARGER_DERATE;
    }
    if solar_available {
        power += solar_power_w;
    }
    power
}

/// Estimates the time to full.
///
/// The percentage is read as if charge current were flowing. A full bank
/// reports [`DurationEstimate::FullyCharged`] whatever the sources, and no
/// charging power reports [`DurationEstimate::NoCharging`].
pub fn charge_eta(inputs: &ChargeEtaInputs) -> DurationEstimate {
    let percentage = battery_percentage(inputs.voltage, true, inputs.system_voltage);
    if percentage >= 100.0 {
        return DurationEstimate::FullyCharged;
    }

    let total_wh =
        inputs.battery_capacity_ah * inputs.system_voltage * f64::from(inputs.num_batteries);
    let remaining_wh = total_wh * (100.0 - percentage) / 100.0;

    let power = charging_power_watts(
        inputs.grid_available,
        inputs.solar_available,
        inputs.solar_power_w,
        inputs.inverter_capacity_w,
    );
    if power <= 0.0 {
        return DurationEstimate::NoCharging;
    }

    let hours = remaining_wh / power;
    if hours < 0.1 {
        return DurationEstimate::UnderSixMinutes;
    }
    DurationEstimate::from_hours(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(voltage: f64) -> ChargeEtaInputs {
        ChargeEtaInputs {
            voltage,
            system_voltage: 24.0,
            battery_capacity_ah: 220.0,
            num_batteries: 2,
            grid_available: true,
            solar_available: true,
            solar_power_w: 967.0,
            inverter_capacity_w: 4200.0,
        }
    }

    #[test]
    fn full_battery_ignores_power() {
        assert_eq!(charge_eta(&inputs(31.0)), DurationEstimate::FullyCharged);
        let none = ChargeEtaInputs {
            grid_available: false,
            solar_available: false,
            ..inputs(31.0)
        };
        assert_eq!(charge_eta(&none), DurationEstimate::FullyCharged);
    }

    #[test]
    fn no_sources_is_no_charging() {
        let none = ChargeEtaInputs {
            grid_available: false,
            solar_available: false,
            ..inputs(25.8)
        };
        assert_eq!(charge_eta(&none), DurationEstimate::NoCharging);
        assert_eq!(charge_eta(&none).to_string(), "No Charging");
    }

    #[test]
    fn grid_charger_is_derated() {
        assert_eq!(charging_power_watts(true, false, 500.0, 4200.0), 3360.0);
        assert_eq!(charging_power_watts(true, true, 500.0, 4200.0), 3860.0);
        assert_eq!(charging_power_watts(false, true, 500.0, 4200.0), 500.0);
    }

    #[test]
    fn grid_only_from_80_percent() {
        // 220Ah * 24V * 2 = 10560Wh, 20% left = 2112Wh at 3360W = 0.628h
        let grid_only = ChargeEtaInputs {
            solar_available: false,
            ..inputs(25.8)
        };
        assert_eq!(charge_eta(&grid_only), DurationEstimate::Minutes(38));
    }

    #[test]
    fn solar_only_from_empty() {
        // 10560Wh at 967W = 10.92h
        let solar_only = ChargeEtaInputs {
            grid_available: false,
            ..inputs(22.0)
        };
        assert_eq!(charge_eta(&solar_only).to_string(), "10.9 hrs");
    }

    #[test]
    fn nearly_full_is_under_six_minutes() {
        // 29.2V charging reads 92.5%: 792Wh at 4327W = 0.18h, so use a
        // smaller bank to cross below 0.1h.
        let small = ChargeEtaInputs {
            battery_capacity_ah: 100.0,
            num_batteries: 1,
            ..inputs(29.2)
        };
        assert_eq!(charge_eta(&small), DurationEstimate::UnderSixMinutes);
    }

    #[test]
    fn weak_solar_spans_days() {
        // 10560Wh at 200W = 52.8h
        let weak = ChargeEtaInputs {
            grid_available: false,
            solar_power_w: 200.0,
            ..inputs(22.0)
        };
        assert_eq!(charge_eta(&weak).to_string(), "2d 5h");
    }
}
