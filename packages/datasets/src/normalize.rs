//! Normalizes raw `GeoJSON` features into typed dataset records.
//!
//! Uses the source configuration's field mappings so the dataset layer
//! stays independent of any one portal's property naming. Records with
//! a missing identity are skipped; records with missing or malformed
//! geometry are kept with `geometry: None`.

use parkside_dataset_models::{
    AreaSourceConfig, CommunityArea, ParkFeature, ParkSourceConfig, PropertyRecord,
    PropertySourceConfig, Waterway, WaterwaySourceConfig,
};
use parkside_geometry::parse;

/// Normalizes community area features.
#[must_use]
pub fn community_areas(
    features: &[serde_json::Value],
    config: &AreaSourceConfig,
) -> Vec<CommunityArea> {
    features
        .iter()
        .filter_map(|feature| {
            let props = feature.get("properties")?;
            Some(CommunityArea {
                area_code: prop_string(props, &config.code_field)?,
                name: prop_string(props, &config.name_field)?,
                geometry: feature_geometry(feature),
            })
        })
        .collect()
}

/// Normalizes park features.
#[must_use]
pub fn parks(features: &[serde_json::Value], config: &ParkSourceConfig) -> Vec<ParkFeature> {
    features
        .iter()
        .filter_map(|feature| {
            let props = feature.get("properties")?;
            Some(ParkFeature {
                id: prop_i64(props, &config.id_field)?,
                name: prop_string(props, &config.name_field).unwrap_or_else(|| "Unknown Park".to_string()),
                acreage: prop_f64(props, &config.acreage_field).unwrap_or(0.0),
                geometry: feature_geometry(feature),
            })
        })
        .collect()
}

/// Normalizes waterway features.
#[must_use]
pub fn waterways(features: &[serde_json::Value], config: &WaterwaySourceConfig) -> Vec<Waterway> {
    features
        .iter()
        .filter_map(|feature| {
            let props = feature.get("properties")?;
            Some(Waterway {
                id: prop_i64(props, &config.id_field)?,
                name: prop_string(props, &config.name_field)
                    .unwrap_or_else(|| "Unknown Waterway".to_string()),
                geometry: feature_geometry(feature),
            })
        })
        .collect()
}

/// Extracts a property record from a raw Socrata JSON row.
#[must_use]
pub fn property_record(
    row: &serde_json::Value,
    config: &PropertySourceConfig,
) -> Option<PropertyRecord> {
    Some(PropertyRecord {
        pin: prop_string(row, &config.pin_field)?,
        address: prop_string(row, &config.address_field)?,
    })
}

fn feature_geometry(feature: &serde_json::Value) -> Option<geo::MultiPolygon<f64>> {
    feature
        .get("geometry")
        .and_then(parse::multipolygon_from_value)
}

/// Reads a field as a trimmed, non-empty string, tolerating numeric
/// source columns (Socrata exports are inconsistent about this).
fn prop_string(props: &serde_json::Value, field: &str) -> Option<String> {
    let value = props.get(field)?;
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn prop_i64(props: &serde_json::Value, field: &str) -> Option<i64> {
    let value = props.get(field)?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn prop_f64(props: &serde_json::Value, field: &str) -> Option<f64> {
    let value = props.get(field)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn park_config() -> ParkSourceConfig {
        ParkSourceConfig {
            url: String::new(),
            limit: None,
            id_field: "park_no".to_string(),
            name_field: "park".to_string(),
            acreage_field: "acres".to_string(),
        }
    }

    #[test]
    fn normalizes_a_park_with_geometry() {
        let features = vec![serde_json::json!({
            "properties": {"park_no": "100", "park": "HUMBOLDT", "acres": "219.5"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-87.7, 41.9], [-87.69, 41.9], [-87.69, 41.91], [-87.7, 41.9]]],
            },
        })];

        let parks = parks(&features, &park_config());
        assert_eq!(parks.len(), 1);
        assert_eq!(parks[0].id, 100);
        assert_eq!(parks[0].name, "HUMBOLDT");
        assert!((parks[0].acreage - 219.5).abs() < f64::EPSILON);
        assert!(parks[0].geometry.is_some());
    }

    #[test]
    fn keeps_a_park_with_null_geometry() {
        let features = vec![serde_json::json!({
            "properties": {"park_no": 7, "park": "OZ"},
            "geometry": null,
        })];

        let parks = parks(&features, &park_config());
        assert_eq!(parks.len(), 1);
        assert!(parks[0].geometry.is_none());
        assert!((parks[0].acreage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_a_park_without_an_id() {
        let features = vec![serde_json::json!({
            "properties": {"park": "NAMELESS"},
            "geometry": null,
        })];

        assert!(parks(&features, &park_config()).is_empty());
    }

    #[test]
    fn normalizes_community_areas() {
        let config = AreaSourceConfig {
            url: String::new(),
            limit: None,
            code_field: "area_numbe".to_string(),
            name_field: "community".to_string(),
        };
        let features = vec![serde_json::json!({
            "properties": {"area_numbe": "22", "community": "LOGAN SQUARE"},
            "geometry": null,
        })];

        let areas = community_areas(&features, &config);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area_code, "22");
        assert_eq!(areas[0].name, "LOGAN SQUARE");
    }

    #[test]
    fn extracts_a_property_record() {
        let config = PropertySourceConfig {
            url: String::new(),
            pin_field: "pin".to_string(),
            address_field: "property_address".to_string(),
            location_field: "location".to_string(),
        };
        let row = serde_json::json!({"pin": "14-28-100-001", "property_address": "1 N MAIN ST"});

        let record = property_record(&row, &config).unwrap();
        assert_eq!(record.pin, "14-28-100-001");
        assert_eq!(record.address, "1 N MAIN ST");
    }
}
