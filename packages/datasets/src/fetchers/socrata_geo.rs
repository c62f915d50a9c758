//! Socrata `GeoJSON` export fetcher.
//!
//! Fetches features from a Socrata open data portal using the
//! `resource.geojson` endpoint, paginating with `$limit`/`$offset`
//! until a short page signals the end of the dataset.

use crate::DatasetError;

/// Default page size for paginated Socrata requests.
const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Fetches all features from a Socrata `GeoJSON` endpoint.
///
/// # Errors
///
/// Returns [`DatasetError`] if any page request fails or a response
/// cannot be parsed.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    limit: Option<u32>,
) -> Result<Vec<serde_json::Value>, DatasetError> {
    let page_size = limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let mut all_features: Vec<serde_json::Value> = Vec::new();
    let mut offset = 0u32;

    loop {
        let sep = if url.contains('?') { '&' } else { '?' };
        let page_url = format!("{url}{sep}$limit={page_size}&$offset={offset}");

        let resp = client.get(&page_url).send().await?;
        if !resp.status().is_success() {
            return Err(DatasetError::Conversion {
                message: format!("Socrata request failed with status {}", resp.status()),
            });
        }
        let body = resp.text().await?;

        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| DatasetError::Conversion {
                message: format!("Failed to parse Socrata GeoJSON response: {e}"),
            })?;

        let features = json["features"]
            .as_array()
            .ok_or_else(|| DatasetError::Conversion {
                message: format!("No features array in Socrata GeoJSON response (offset={offset})"),
            })?;

        #[allow(clippy::cast_possible_truncation)]
        let page_len = features.len() as u32;

        all_features.extend(features.iter().cloned());

        if page_len < page_size {
            break;
        }

        offset += page_len;
        log::info!(
            "Fetched {page_len} features (total so far: {}), fetching next page...",
            all_features.len()
        );
    }

    Ok(all_features)
}
