//! Data models for molding process inputs and computed results

use crate::error::{MoldingError, Result};

/// Slider-style bounds for a single process parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterLimit {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl ParameterLimit {
    /// Reject values outside `[min, max]` (NaN included)
    pub fn check(&self, value: f64) -> Result<f64> {
        if (self.min..=self.max).contains(&value) {
            Ok(value)
        } else {
            Err(MoldingError::InvalidInput {
                parameter: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const STEAM_PRESSURE: ParameterLimit = ParameterLimit {
    name: "steam_pressure",
    label: "Steam pressure",
    unit: "bar",
    min: 0.5,
    max: 2.0,
    default: 1.5,
    step: 0.1,
};

pub const STEAM_TIME: ParameterLimit = ParameterLimit {
    name: "steam_time",
    label: "Steam time",
    unit: "s",
    min: 1.0,
    max: 10.0,
    default: 5.0,
    step: 1.0,
};

pub const FIXED_SIDE_TEMP: ParameterLimit = ParameterLimit {
    name: "fixed_side_temp",
    label: "Fixed side temperature",
    unit: "°C",
    min: 30.0,
    max: 100.0,
    default: 61.0,
    step: 1.0,
};

pub const MOBILE_SIDE_TEMP: ParameterLimit = ParameterLimit {
    name: "mobile_side_temp",
    label: "Mobile side temperature",
    unit: "°C",
    min: 30.0,
    max: 100.0,
    default: 45.0,
    step: 1.0,
};

pub const BEAD_DENSITY: ParameterLimit = ParameterLimit {
    name: "bead_density",
    label: "Bead density",
    unit: "g/L",
    min: 15.0,
    max: 35.0,
    default: 25.0,
    step: 1.0,
};

/// All input limits, in record column order
pub const PARAMETER_LIMITS: [ParameterLimit; 5] = [
    STEAM_PRESSURE,
    STEAM_TIME,
    FIXED_SIDE_TEMP,
    MOBILE_SIDE_TEMP,
    BEAD_DENSITY,
];

/// One set of process settings. A fresh value is built for every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputParameters {
    pub steam_pressure: f64,   // bar
    pub steam_time: f64,       // s
    pub fixed_side_temp: f64,  // °C
    pub mobile_side_temp: f64, // °C
    pub bead_density: f64,     // g/L
}

impl InputParameters {
    /// Build a parameter set, rejecting any value outside its slider domain
    pub fn new(
        steam_pressure: f64,
        steam_time: f64,
        fixed_side_temp: f64,
        mobile_side_temp: f64,
        bead_density: f64,
    ) -> Result<Self> {
        Ok(Self {
            steam_pressure: STEAM_PRESSURE.check(steam_pressure)?,
            steam_time: STEAM_TIME.check(steam_time)?,
            fixed_side_temp: FIXED_SIDE_TEMP.check(fixed_side_temp)?,
            mobile_side_temp: MOBILE_SIDE_TEMP.check(mobile_side_temp)?,
            bead_density: BEAD_DENSITY.check(bead_density)?,
        })
    }

    /// Absolute temperature difference between the two mold halves
    pub fn thermal_delta(&self) -> f64 {
        (self.fixed_side_temp - self.mobile_side_temp).abs()
    }

    /// Values in `PARAMETER_LIMITS` order
    pub fn values(&self) -> [f64; 5] {
        [
            self.steam_pressure,
            self.steam_time,
            self.fixed_side_temp,
            self.mobile_side_temp,
            self.bead_density,
        ]
    }
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            steam_pressure: STEAM_PRESSURE.default,
            steam_time: STEAM_TIME.default,
            fixed_side_temp: FIXED_SIDE_TEMP.default,
            mobile_side_temp: MOBILE_SIDE_TEMP.default,
            bead_density: BEAD_DENSITY.default,
        }
    }
}

/// Reason a collapse penalty was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseReason {
    HighSteamPressure,
    FixedSideOverheat,
    MobileSideOverheat,
    ExcessiveSteamTime,
}

impl CollapseReason {
    pub fn description(self) -> &'static str {
        match self {
            CollapseReason::HighSteamPressure => "high steam pressure",
            CollapseReason::FixedSideOverheat => "elevated fixed-side temperature",
            CollapseReason::MobileSideOverheat => "elevated mobile-side temperature",
            CollapseReason::ExcessiveSteamTime => "excessive steam time",
        }
    }
}

impl std::fmt::Display for CollapseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Intermediate adjustment factors of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFactors {
    pub collapse: f64,
    pub collapse_reasons: Vec<CollapseReason>,
    pub expansion: f64,
    pub contraction: f64,
    pub ideal_conditions: bool,
    pub thermal_warning: bool,
}

impl Default for DerivedFactors {
    fn default() -> Self {
        Self {
            collapse: 0.0,
            collapse_reasons: Vec::new(),
            expansion: 1.0,
            contraction: 0.0,
            ideal_conditions: false,
            thermal_warning: false,
        }
    }
}

/// Final piece metrics, rounded to two decimals and floored at zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputResult {
    pub weight_g: f64,
    pub length_mm: f64,
    pub width_mm: f64,
}
