//! HTTP date parsing, formatting and a cached "now" value.
//!
//! Parsing accepts the three forms HTTP/1.1 recipients must understand (IMF-fixdate,
//! obsolete RFC 850 and asctime); formatting only ever produces IMF-fixdate.
//!
//! Formatting the current time for every reply is wasted work under load, since the
//! value only changes once per second. [`DateCache`] keeps the last formatted second
//! and only reformats when the second changes.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use bytes::Bytes;
use once_cell::sync::Lazy;
use tracing::trace;

/// Parses an HTTP date in any of the three accepted forms.
pub fn parse_http_date(value: &[u8]) -> Option<SystemTime> {
    let value = std::str::from_utf8(value).ok()?;
    httpdate::parse_http_date(value.trim()).ok()
}

/// Formats `time` as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn fmt_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

#[derive(Debug)]
struct CachedDate {
    secs: u64,
    value: Bytes,
}

impl CachedDate {
    fn format(secs: u64) -> Self {
        let time = UNIX_EPOCH + std::time::Duration::from_secs(secs);
        Self { secs, value: Bytes::from(fmt_http_date(time)) }
    }
}

static GLOBAL_DATE_CACHE: Lazy<DateCache> = Lazy::new(DateCache::new);

/// The current time formatted as an HTTP date, reformatted at most once per second.
///
/// Reads are lock-free and the cell is swapped atomically, so one cache can be shared
/// by every worker; separate instances per worker work just as well.
#[derive(Debug)]
pub struct DateCache {
    current: ArcSwap<CachedDate>,
}

impl DateCache {
    pub fn new() -> Self {
        Self { current: ArcSwap::from_pointee(CachedDate::format(unix_secs(SystemTime::now()))) }
    }

    /// Returns the process-wide instance.
    pub fn global() -> &'static DateCache {
        &GLOBAL_DATE_CACHE
    }

    /// The formatted current time.
    pub fn now(&self) -> Bytes {
        self.at(SystemTime::now())
    }

    /// The formatted value for `time`, reusing the cached string while the second
    /// is unchanged.
    pub fn at(&self, time: SystemTime) -> Bytes {
        let secs = unix_secs(time);

        let current = self.current.load();
        if current.secs == secs {
            return current.value.clone();
        }

        trace!(secs, "refresh cached http date");
        let fresh = Arc::new(CachedDate::format(secs));
        let value = fresh.value.clone();
        // never move the cache backwards when a slower caller formats an older second
        if secs > current.secs {
            self.current.store(fresh);
        }
        value
    }
}

impl Default for DateCache {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}
