//! Defines the `AqiLevel` enum, mapping numeric AQI values to the US-EPA
//! health-concern categories used by both providers.

use serde::Serialize;
use std::fmt;

/// Health-concern category for an AQI value.
///
/// The breakpoints follow the US-EPA scale, which both WAQI and MOENV report
/// against. See the [AirNow guide](https://www.airnow.gov/aqi/aqi-basics/)
/// for the official definitions.
///
/// Convert a value with [`AqiLevel::from_aqi`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize)]
pub enum AqiLevel {
    /// 0-50: air quality is satisfactory.
    Good,
    /// 51-100: acceptable, with some risk for unusually sensitive people.
    Moderate,
    /// 101-150: sensitive groups may experience health effects.
    UnhealthyForSensitiveGroups,
    /// 151-200: the general public may experience health effects.
    Unhealthy,
    /// 201-300: health alert, everyone may experience more serious effects.
    VeryUnhealthy,
    /// 301 and above: emergency conditions.
    Hazardous,
}

impl AqiLevel {
    /// Classifies an AQI value.
    ///
    /// Returns `None` for negative or non-finite values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use airquality::AqiLevel;
    ///
    /// assert_eq!(AqiLevel::from_aqi(42.0), Some(AqiLevel::Good));
    /// assert_eq!(AqiLevel::from_aqi(101.0), Some(AqiLevel::UnhealthyForSensitiveGroups));
    /// assert_eq!(AqiLevel::from_aqi(-1.0), None);
    /// ```
    pub fn from_aqi(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let level = match value.round() as u32 {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitiveGroups,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        };
        Some(level)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(AqiLevel::from_aqi(0.0), Some(AqiLevel::Good));
        assert_eq!(AqiLevel::from_aqi(50.0), Some(AqiLevel::Good));
        assert_eq!(AqiLevel::from_aqi(50.4), Some(AqiLevel::Good));
        assert_eq!(AqiLevel::from_aqi(51.0), Some(AqiLevel::Moderate));
        assert_eq!(AqiLevel::from_aqi(150.0), Some(AqiLevel::UnhealthyForSensitiveGroups));
        assert_eq!(AqiLevel::from_aqi(200.0), Some(AqiLevel::Unhealthy));
        assert_eq!(AqiLevel::from_aqi(300.0), Some(AqiLevel::VeryUnhealthy));
        assert_eq!(AqiLevel::from_aqi(301.0), Some(AqiLevel::Hazardous));
        assert_eq!(AqiLevel::from_aqi(999.0), Some(AqiLevel::Hazardous));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert_eq!(AqiLevel::from_aqi(-0.5), None);
        assert_eq!(AqiLevel::from_aqi(f64::NAN), None);
        assert_eq!(AqiLevel::from_aqi(f64::INFINITY), None);
    }
}
