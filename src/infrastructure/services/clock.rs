use core::cell::Cell;
use core::fmt::Write;

use chrono::{DateTime, Datelike, Timelike};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;
use heapless::String;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shown until the first time sync
pub const PLACEHOLDER_TIME: &str = "00:00";
pub const PLACEHOLDER_DATE: &str = "01 Jan 2000";

/// `HH:MM`
pub type TimeString = String<8>;
/// `DD Mon YYYY`
pub type DateString = String<16>;

#[derive(Debug, Clone, Copy)]
struct Anchor {
    unix_secs: u64,
    at: Instant,
}

/// Wall clock anchored to the last network time sync
pub struct WallClock {
    anchor: Mutex<CriticalSectionRawMutex, Cell<Option<Anchor>>>,
}

impl WallClock {
    pub const fn new() -> Self {
        Self {
            anchor: Mutex::new(Cell::new(None)),
        }
    }

    /// Record the network time, in Unix seconds
    pub fn set(&self, unix_secs: u64) {
        let anchor = Anchor {
            unix_secs,
            at: Instant::now(),
        };
        self.anchor.lock(|cell| cell.set(Some(anchor)));
    }

    pub fn is_synced(&self) -> bool {
        self.anchor.lock(Cell::get).is_some()
    }

    /// Current Unix time, `None` before the first sync
    pub fn now(&self) -> Option<u64> {
        let anchor = self.anchor.lock(Cell::get)?;
        Some(anchor.unix_secs + anchor.at.elapsed().as_secs())
    }

    /// Clock and date lines, placeholders before the first sync
    pub fn display_strings(&self) -> (TimeString, DateString) {
        self.now()
            .and_then(format_unix)
            .unwrap_or_else(|| {
                (
                    TimeString::try_from(PLACEHOLDER_TIME).unwrap_or_default(),
                    DateString::try_from(PLACEHOLDER_DATE).unwrap_or_default(),
                )
            })
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Format Unix seconds as UTC `HH:MM` and `DD Mon YYYY`
pub fn format_unix(unix_secs: u64) -> Option<(TimeString, DateString)> {
    let datetime = DateTime::from_timestamp(i64::try_from(unix_secs).ok()?, 0)?;

    let mut time = TimeString::new();
    write!(time, "{:02}:{:02}", datetime.hour(), datetime.minute()).ok()?;

    let month = MONTH_NAMES.get(datetime.month0() as usize)?;
    let mut date = DateString::new();
    write!(date, "{:02} {} {:04}", datetime.day(), month, datetime.year()).ok()?;

    Some((time, date))
}
