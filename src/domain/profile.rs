// Plant profile domain model
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive `[min, max]` band considered ideal for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub unit: String,
}

impl OptimalRange {
    pub fn new(min: f64, max: f64, unit: impl Into<String>) -> Self {
        Self {
            min,
            max,
            unit: unit.into(),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantProfile {
    #[serde(default)]
    pub optimal_ranges: IndexMap<String, OptimalRange>,
    /// Parameter name to data-source identifier.
    #[serde(default)]
    pub sensor_mapping: IndexMap<String, String>,
}

impl PlantProfile {
    pub fn optimal_range(&self, parameter: &str) -> Option<&OptimalRange> {
        self.optimal_ranges.get(parameter)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("profile '{profile}': optimal range for '{parameter}' must be finite with min <= max (got {min}..{max})")]
    InvalidRange {
        profile: String,
        parameter: String,
        min: f64,
        max: f64,
    },
}

/// Every configured plant profile, keyed by name. Loaded once at startup and
/// shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCatalog {
    #[serde(default)]
    profiles: IndexMap<String, PlantProfile>,
}

impl ProfileCatalog {
    pub fn new(profiles: IndexMap<String, PlantProfile>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, name: &str) -> Option<&PlantProfile> {
        self.profiles.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PlantProfile)> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for (profile, plant) in &self.profiles {
            for (parameter, range) in &plant.optimal_ranges {
                let valid = range.min.is_finite() && range.max.is_finite() && range.min <= range.max;
                if !valid {
                    return Err(ProfileError::InvalidRange {
                        profile: profile.clone(),
                        parameter: parameter.clone(),
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_range(min: f64, max: f64) -> ProfileCatalog {
        let mut plant = PlantProfile::default();
        plant
            .optimal_ranges
            .insert("temperature".to_string(), OptimalRange::new(min, max, "°C"));
        let mut profiles = IndexMap::new();
        profiles.insert("tomato".to_string(), plant);
        ProfileCatalog::new(profiles)
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = OptimalRange::new(18.0, 26.0, "°C");
        assert!(range.contains(18.0));
        assert!(range.contains(26.0));
        assert!(!range.contains(17.99));
        assert!(!range.contains(26.01));
    }

    #[test]
    fn test_validate_accepts_well_formed_ranges() {
        assert_eq!(catalog_with_range(18.0, 26.0).validate(), Ok(()));
        assert_eq!(catalog_with_range(20.0, 20.0).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let err = catalog_with_range(30.0, 10.0).validate().unwrap_err();
        assert!(matches!(err, ProfileError::InvalidRange { ref parameter, .. } if parameter == "temperature"));
    }

    #[test]
    fn test_validate_rejects_non_finite_range() {
        assert!(catalog_with_range(f64::NAN, 10.0).validate().is_err());
    }
}
