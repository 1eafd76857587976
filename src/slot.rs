use crate::error::UsageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{macros::format_description, Date, OffsetDateTime, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunKind {
    EarlyRun,
    FinalRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "10:00")]
    Morning,
    #[serde(rename = "16:00")]
    Latest1,
    #[serde(rename = "16:15")]
    Latest2,
    #[serde(rename = "16:30")]
    Final,
}

struct SlotEntry {
    slot: Slot,
    label: &'static str,
    hour: u8,
    minute: u8,
    run_kind: RunKind,
}

static SLOTS: [SlotEntry; 4] = [
    SlotEntry {
        slot: Slot::Morning,
        label: "10:00",
        hour: 10,
        minute: 0,
        run_kind: RunKind::EarlyRun,
    },
    SlotEntry {
        slot: Slot::Latest1,
        label: "16:00",
        hour: 16,
        minute: 0,
        run_kind: RunKind::EarlyRun,
    },
    SlotEntry {
        slot: Slot::Latest2,
        label: "16:15",
        hour: 16,
        minute: 15,
        run_kind: RunKind::EarlyRun,
    },
    SlotEntry {
        slot: Slot::Final,
        label: "16:30",
        hour: 16,
        minute: 30,
        run_kind: RunKind::FinalRun,
    },
];

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Morning, Slot::Latest1, Slot::Latest2, Slot::Final];

    fn entry(self) -> &'static SlotEntry {
        // SLOTS is ordered like the enum.
        &SLOTS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn run_kind(self) -> RunKind {
        self.entry().run_kind
    }

    /// Nominal time of day, minutes after midnight.
    pub fn minute_of_day(self) -> u32 {
        let e = self.entry();
        u32::from(e.hour) * 60 + u32::from(e.minute)
    }

    /// True when `t` is within `window_minutes` of the nominal time.
    /// Seconds are ignored and the distance wraps at midnight.
    pub fn in_window(self, t: Time, window_minutes: u32) -> bool {
        let target = self.minute_of_day();
        let seen = u32::from(t.hour()) * 60 + u32::from(t.minute());
        let diff = target.abs_diff(seen);
        diff.min(24 * 60 - diff) <= window_minutes
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Slot {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SLOTS
            .iter()
            .find(|e| e.label == s)
            .map(|e| e.slot)
            .ok_or_else(|| UsageError::InvalidSlot(s.to_string()))
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::EarlyRun => f.write_str("EarlyRun"),
            RunKind::FinalRun => f.write_str("FinalRun"),
        }
    }
}

/// Parses `YYYY-MM-DD` or the literal `today` (case-insensitive).
pub fn parse_date(s: &str) -> Result<Date, UsageError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|_| UsageError::InvalidDate(s.to_string()))
}

/// Local date, falling back to UTC when the local offset can't be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn date_folder(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}
