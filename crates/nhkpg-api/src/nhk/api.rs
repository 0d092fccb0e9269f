//! `NhkApi` trait definition.

use super::error::Result;
use super::types::{DescriptionList, NowOnAirList, ProgramList};

/// NHK Program Guide API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Every method performs one blocking request.
pub trait NhkApi {
    /// Fetches the programs of a service on a date (`pg/list`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the API answers with a
    /// non-200 status, or JSON decoding fails.
    fn program_list(
        &self,
        version: &str,
        area: &str,
        service: &str,
        date: &str,
    ) -> Result<ProgramList>;

    /// Fetches the programs of a genre on a date (`pg/genre`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the API answers with a
    /// non-200 status, or JSON decoding fails.
    fn program_genre(
        &self,
        version: &str,
        area: &str,
        service: &str,
        genre: &str,
        date: &str,
    ) -> Result<ProgramList>;

    /// Fetches the description of a single program (`pg/info`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the API answers with a
    /// non-200 status, or JSON decoding fails.
    fn program_info(
        &self,
        version: &str,
        area: &str,
        service: &str,
        id: &str,
    ) -> Result<DescriptionList>;

    /// Fetches the previous, present and following programs (`pg/now`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the API answers with a
    /// non-200 status, or JSON decoding fails.
    fn now_on_air(&self, version: &str, area: &str, service: &str) -> Result<NowOnAirList>;
}
