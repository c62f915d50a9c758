//! Cache write-through dataset loading.
//!
//! Raw feature arrays are cached under their dataset namespace so a
//! session only hits the network once per TTL window; normalization is
//! cheap and re-runs on every load.

use geo::Point;
use parkside_cache::{CacheStore, Namespace};
use parkside_dataset_models::{
    CommunityArea, DatasetConfig, ParkFeature, PropertyRecord, Waterway,
};

use crate::{DatasetError, fetchers, normalize};

/// Cache identifier for whole-dataset feature arrays.
const ALL: &str = "all";

/// Search radius in meters for point-to-parcel resolution.
const PROPERTY_RADIUS_METERS: u32 = 30;

/// Loads community areas, via cache when possible.
///
/// # Errors
///
/// Returns [`DatasetError`] if the dataset must be fetched and the
/// request or parsing fails.
pub async fn load_community_areas(
    client: &reqwest::Client,
    cache: &CacheStore,
    config: &DatasetConfig,
) -> Result<Vec<CommunityArea>, DatasetError> {
    let features = cached_features(
        client,
        cache,
        Namespace::CommunityAreas,
        &config.community_areas.url,
        config.community_areas.limit,
    )
    .await?;
    let areas = normalize::community_areas(&features, &config.community_areas);
    log::info!(
        "Loaded {} community areas from {} features",
        areas.len(),
        features.len()
    );
    Ok(areas)
}

/// Loads park features, via cache when possible.
///
/// # Errors
///
/// Returns [`DatasetError`] if the dataset must be fetched and the
/// request or parsing fails.
pub async fn load_parks(
    client: &reqwest::Client,
    cache: &CacheStore,
    config: &DatasetConfig,
) -> Result<Vec<ParkFeature>, DatasetError> {
    let features = cached_features(
        client,
        cache,
        Namespace::Parks,
        &config.parks.url,
        config.parks.limit,
    )
    .await?;
    let parks = normalize::parks(&features, &config.parks);
    log::info!("Loaded {} parks from {} features", parks.len(), features.len());
    Ok(parks)
}

/// Loads waterways, via cache when possible.
///
/// # Errors
///
/// Returns [`DatasetError`] if the dataset must be fetched and the
/// request or parsing fails.
pub async fn load_waterways(
    client: &reqwest::Client,
    cache: &CacheStore,
    config: &DatasetConfig,
) -> Result<Vec<Waterway>, DatasetError> {
    let features = cached_features(
        client,
        cache,
        Namespace::Waterways,
        &config.waterways.url,
        config.waterways.limit,
    )
    .await?;
    let waterways = normalize::waterways(&features, &config.waterways);
    log::info!(
        "Loaded {} waterways from {} features",
        waterways.len(),
        features.len()
    );
    Ok(waterways)
}

/// Resolves the property record at a point, via cache when possible.
///
/// Returns `Ok(None)` when no parcel exists at the point; the parcel
/// flow reports "not found" for that, it is not an error. The negative
/// result is cached too.
///
/// # Errors
///
/// Returns [`DatasetError`] if the lookup must be fetched and the
/// request or parsing fails.
pub async fn lookup_property(
    client: &reqwest::Client,
    cache: &CacheStore,
    config: &DatasetConfig,
    point: Point<f64>,
) -> Result<Option<PropertyRecord>, DatasetError> {
    let id = format!("{:.5},{:.5}", point.x(), point.y());

    if let Some(cached) = cache.get::<Option<PropertyRecord>>(Namespace::PropertyData, &id) {
        return Ok(cached);
    }

    let sep = if config.property.url.contains('?') { '&' } else { '?' };
    let url = format!(
        "{}{sep}$where=within_circle({},{},{},{})&$limit=1",
        config.property.url,
        config.property.location_field,
        point.y(),
        point.x(),
        PROPERTY_RADIUS_METERS,
    );

    let resp = client.get(&url).send().await?;
    if !resp.status().is_success() {
        return Err(DatasetError::Conversion {
            message: format!("Property lookup failed with status {}", resp.status()),
        });
    }
    let body = resp.text().await?;

    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&body).map_err(|e| DatasetError::Conversion {
            message: format!("Failed to parse property lookup response: {e}"),
        })?;

    let record = rows
        .first()
        .and_then(|row| normalize::property_record(row, &config.property));

    cache.set(Namespace::PropertyData, &id, &record);
    Ok(record)
}

/// Returns the cached raw feature array for a namespace, fetching and
/// caching it on a miss.
async fn cached_features(
    client: &reqwest::Client,
    cache: &CacheStore,
    namespace: Namespace,
    url: &str,
    limit: Option<u32>,
) -> Result<Vec<serde_json::Value>, DatasetError> {
    if let Some(features) = cache.get::<Vec<serde_json::Value>>(namespace, ALL) {
        log::debug!(
            "Using {} cached features for {}",
            features.len(),
            namespace.as_str()
        );
        return Ok(features);
    }

    let features = fetchers::socrata_geo::fetch(client, url, limit).await?;
    cache.set(namespace, ALL, &features);
    Ok(features)
}
