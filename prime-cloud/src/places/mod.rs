//! Place search and details (competitor / vendor lookup) via the Places API

use serde::{Deserialize, Serialize};

use crate::outbound::OutboundError;

const SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
const DETAILS_FIELDS: &str = "place_id,name,formatted_address,formatted_phone_number,website,\
rating,user_ratings_total,price_level,opening_hours,url,geometry";
const SERVICE: &str = "Places";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    #[serde(default, alias = "formatted_address")]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "user_ratings_total")]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(flatten)]
    pub summary: PlaceSummary,
    #[serde(default, alias = "formatted_phone_number")]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Maps URL
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub weekday_hours: Vec<String>,
}

/// Raw result shape shared by search and details
#[derive(Deserialize)]
struct RawPlace {
    place_id: String,
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
}

#[derive(Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

impl RawPlace {
    fn summary(&self) -> PlaceSummary {
        PlaceSummary {
            place_id: self.place_id.clone(),
            name: self.name.clone(),
            address: self.formatted_address.clone(),
            rating: self.rating,
            review_count: self.user_ratings_total,
            price_level: self.price_level,
            location: self.geometry.as_ref().map(|g| g.location),
        }
    }

    fn into_details(self) -> PlaceDetails {
        PlaceDetails {
            summary: self.summary(),
            phone: self.formatted_phone_number,
            website: self.website,
            url: self.url,
            weekday_hours: self.opening_hours.map(|h| h.weekday_text).unwrap_or_default(),
        }
    }
}

/// `OK` and `ZERO_RESULTS` are successes; anything else carries `error_message`
fn check_status(resp: &serde_json::Value) -> Result<(), OutboundError> {
    match resp["status"].as_str() {
        Some("OK") | Some("ZERO_RESULTS") => Ok(()),
        Some(status) => {
            let message = resp["error_message"].as_str().unwrap_or(status);
            Err(OutboundError::provider(SERVICE, message))
        }
        None => Err(OutboundError::unexpected(SERVICE, "missing status")),
    }
}

pub fn parse_search(resp: serde_json::Value) -> Result<Vec<PlaceSummary>, OutboundError> {
    check_status(&resp)?;
    let results = resp.get("results").cloned().unwrap_or_default();
    if results.is_null() {
        return Ok(Vec::new());
    }
    let raw: Vec<RawPlace> = serde_json::from_value(results)
        .map_err(|e| OutboundError::unexpected(SERVICE, e.to_string()))?;
    Ok(raw.iter().map(RawPlace::summary).collect())
}

/// `None` when the place does not exist
pub fn parse_details(resp: serde_json::Value) -> Result<Option<PlaceDetails>, OutboundError> {
    if resp["status"].as_str() == Some("NOT_FOUND") {
        return Ok(None);
    }
    check_status(&resp)?;
    let Some(result) = resp.get("result").cloned() else {
        return Ok(None);
    };
    let raw: RawPlace = serde_json::from_value(result)
        .map_err(|e| OutboundError::unexpected(SERVICE, e.to_string()))?;
    Ok(Some(raw.into_details()))
}

async fn get_json(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<serde_json::Value, OutboundError> {
    client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(OutboundError::http(SERVICE))?
        .json()
        .await
        .map_err(OutboundError::http(SERVICE))
}

pub async fn search(
    client: &reqwest::Client,
    api_key: &str,
    query: &str,
) -> Result<Vec<PlaceSummary>, OutboundError> {
    let resp = get_json(client, SEARCH_URL, &[("query", query), ("key", api_key)]).await?;
    parse_search(resp)
}

pub async fn details(
    client: &reqwest::Client,
    api_key: &str,
    place_id: &str,
) -> Result<Option<PlaceDetails>, OutboundError> {
    let resp = get_json(
        client,
        DETAILS_URL,
        &[
            ("place_id", place_id),
            ("fields", DETAILS_FIELDS),
            ("key", api_key),
        ],
    )
    .await?;
    parse_details(resp)
}
