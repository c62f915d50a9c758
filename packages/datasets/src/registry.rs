//! Embedded dataset source definitions.

use parkside_dataset_models::DatasetConfig;

/// Embedded TOML source definition for Chicago.
const CHICAGO_TOML: &str = include_str!("../sources/chicago.toml");

/// Returns the Chicago dataset source configuration.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. Since it is a
/// compile-time constant, a parse failure indicates a development
/// error and is caught during CI.
#[must_use]
pub fn chicago() -> DatasetConfig {
    toml::de::from_str(CHICAGO_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse Chicago dataset sources: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_embedded_sources() {
        let config = chicago();
        assert!(config.community_areas.url.ends_with(".geojson"));
        assert!(config.parks.url.ends_with(".geojson"));
        assert!(config.waterways.url.ends_with(".geojson"));
        assert_eq!(config.community_areas.code_field, "area_numbe");
        assert!(config.parks.limit.is_none());
    }
}
