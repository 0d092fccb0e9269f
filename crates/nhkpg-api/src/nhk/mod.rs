//! NHK Program Guide API client module.
//!
//! Builds endpoint URLs for the `pg/list`, `pg/genre`, `pg/info` and `pg/now`
//! endpoints, fetches them over HTTP and decodes the JSON responses.

mod api;
mod client;
mod endpoint;
mod error;
mod transport;
mod types;

pub use api::NhkApi;
#[allow(clippy::module_name_repetitions)]
pub use client::{NhkClient, NhkClientBuilder};
pub use endpoint::{DEFAULT_BASE_URL, Endpoint};
#[allow(clippy::module_name_repetitions)]
pub use error::{ApiError, NhkError, Result, map_api_error};
pub use transport::{RawResponse, fetch};
pub use types::{
    Area, Description, DescriptionList, Extras, Link, Logo, NowOnAir, NowOnAirList, Program,
    ProgramList, Service,
};

/// Attribution text required when displaying data obtained from the API.
pub const CREDIT: &str = "情報提供:ＮＨＫ";
