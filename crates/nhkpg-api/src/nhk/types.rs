//! NHK Program Guide API response types.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{NhkError, Result};

/// Deserializes `null` as `T::default()` (missing keys are covered by `#[serde(default)]`).
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Deserializes a keyed map whose values may be `null`, replacing them with
/// `V::default()`. A `null` map becomes empty.
fn deserialize_null_map_values<'de, D, V>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Default + Deserialize<'de>,
{
    let map: Option<BTreeMap<String, Option<V>>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Decodes a success response body, tagging failures with the response kind.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &[u8], context: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| NhkError::Decode {
        context: String::from(context),
        source,
    })
}

// --- Lists ---

/// Response of the `pg/list` and `pg/genre` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramList {
    /// Programs keyed by service or genre code.
    #[serde(default, deserialize_with = "deserialize_null_map_values")]
    pub list: BTreeMap<String, Vec<Program>>,
}

impl ProgramList {
    /// Iterates all programs across keys.
    pub fn programs(&self) -> impl Iterator<Item = &Program> {
        self.list.values().flatten()
    }
}

/// Response of the `pg/info` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionList {
    /// Descriptions keyed by service code.
    #[serde(default, deserialize_with = "deserialize_null_map_values")]
    pub list: BTreeMap<String, Vec<Description>>,
}

impl DescriptionList {
    /// Iterates all descriptions across keys.
    pub fn descriptions(&self) -> impl Iterator<Item = &Description> {
        self.list.values().flatten()
    }
}

/// Response of the `pg/now` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowOnAirList {
    /// Now-on-air triples keyed by service code.
    #[serde(
        rename = "nowonair_list",
        default,
        deserialize_with = "deserialize_null_map_values"
    )]
    pub now_on_air_list: BTreeMap<String, NowOnAir>,
}

/// Programs around the current time on one service.
///
/// A slot is `None` when the API omits it or sends `null`, e.g. no
/// following program at the end of the broadcast day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowOnAir {
    /// Program that aired before the present one.
    #[serde(default)]
    pub previous: Option<Program>,
    /// Program on air now.
    #[serde(default)]
    pub present: Option<Program>,
    /// Next scheduled program.
    #[serde(default)]
    pub following: Option<Program>,
}

// --- Programs ---

/// A scheduled broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program ID.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub id: String,
    /// Broadcast event ID.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub event_id: String,
    /// Start time with its UTC offset.
    pub start_time: DateTime<FixedOffset>,
    /// End time with its UTC offset.
    pub end_time: DateTime<FixedOffset>,
    /// Broadcast area.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub area: Area,
    /// Broadcast service (channel).
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub service: Service,
    /// Title.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub title: String,
    /// Subtitle.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub subtitle: String,
    /// Genre codes.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub genres: Vec<String>,
}

impl Program {
    /// Scheduled length of the broadcast.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end_time.signed_duration_since(self.start_time)
    }
}

/// Detailed program information from `pg/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Fields shared with [`Program`].
    #[serde(flatten)]
    pub program: Program,
    /// Program logo.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub program_logo: Logo,
    /// Program website.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub program_url: String,
    /// Episode website.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub episode_url: String,
    /// Hashtags.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub hashtags: Vec<String>,
    /// On-demand links.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub extras: Extras,
}

// --- Attribute bags ---

/// Broadcast area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Area code.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub id: String,
    /// Area name.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub name: String,
}

/// Broadcast service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service code.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub id: String,
    /// Service name.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub name: String,
    /// Small logo.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub logo_s: Logo,
    /// Medium logo.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub logo_m: Logo,
    /// Large logo.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub logo_l: Logo,
}

/// Logo image. Dimensions are strings as sent by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    /// Image URL.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub url: String,
    /// Width in pixels.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub width: String,
    /// Height in pixels.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub height: String,
}

/// NHK On Demand links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    /// Program page.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub ondemand_program: Link,
    /// Episode page.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub ondemand_episode: Link,
}

/// External link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link URL.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub url: String,
    /// Link title.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub title: String,
    /// Link ID.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub id: String,
}
