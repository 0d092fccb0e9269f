//! Endpoint URL construction.

use url::form_urlencoded;

/// Default base URL of the NHK API.
pub const DEFAULT_BASE_URL: &str = "http://api.nhk.or.jp/";

/// One of the four Program Guide API endpoints with its path parameters.
///
/// Codes are passed through verbatim; the API is the only validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `pg/list`: programs of a service on a date.
    List {
        /// Area code (e.g. `130`).
        area: &'a str,
        /// Service code (e.g. `g1`).
        service: &'a str,
        /// Date (`YYYY-MM-DD`).
        date: &'a str,
    },
    /// `pg/genre`: programs of a genre on a date.
    Genre {
        /// Area code.
        area: &'a str,
        /// Service code.
        service: &'a str,
        /// Genre code (e.g. `0000`).
        genre: &'a str,
        /// Date (`YYYY-MM-DD`).
        date: &'a str,
    },
    /// `pg/info`: description of a single program.
    Info {
        /// Area code.
        area: &'a str,
        /// Service code.
        service: &'a str,
        /// Program ID.
        id: &'a str,
    },
    /// `pg/now`: previous, present and following programs.
    Now {
        /// Area code.
        area: &'a str,
        /// Service code.
        service: &'a str,
    },
}

impl Endpoint<'_> {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Genre { .. } => "genre",
            Self::Info { .. } => "info",
            Self::Now { .. } => "now",
        }
    }

    /// Path below the base URL, e.g. `v1/pg/now/130/g1.json`.
    #[must_use]
    pub fn path(&self, version: &str) -> String {
        match *self {
            Self::List {
                area,
                service,
                date,
            } => format!("{version}/pg/list/{area}/{service}/{date}.json"),
            Self::Genre {
                area,
                service,
                genre,
                date,
            } => format!("{version}/pg/genre/{area}/{service}/{genre}/{date}.json"),
            Self::Info { area, service, id } => {
                format!("{version}/pg/info/{area}/{service}/{id}.json")
            }
            Self::Now { area, service } => format!("{version}/pg/now/{area}/{service}.json"),
        }
    }

    /// Full request URL with the API key in the `key` query parameter.
    #[must_use]
    pub fn url(&self, base: &str, version: &str, key: &str) -> String {
        let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        format!(
            "{}/{}?key={key}",
            base.trim_end_matches('/'),
            self.path(version)
        )
    }

    /// Same as [`Self::url`] with the key masked, for logging.
    #[must_use]
    pub fn redacted_url(&self, base: &str, version: &str) -> String {
        format!(
            "{}/{}?key=***",
            base.trim_end_matches('/'),
            self.path(version)
        )
    }
}
