//! Dump schedule
//!
//! A schedule is one of three modes: a single run (`once`), a cron
//! expression (`cron`), or a fixed interval (`frequency` minutes, optionally
//! starting at `begin`). Setting more than one mode is rejected rather than
//! picking a winner.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Interval used when no mode is configured, in minutes
pub const DEFAULT_FREQUENCY: u32 = 1440;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(skip_serializing_if = "is_false")]
    pub once: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
    /// Minutes between runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// `HHMM` wall-clock start or `+N` minutes from now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleMode {
    Once,
    Cron(String),
    Interval { frequency: u32, begin: Begin },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    Immediately,
    At(NaiveTime),
    AfterMinutes(u32),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule sets more than one mode: {0}")]
    Ambiguous(String),

    #[error("invalid cron expression '{0}' (expected 5 fields)")]
    InvalidCron(String),

    #[error("frequency must be greater than zero")]
    ZeroFrequency,

    #[error("invalid begin '{0}' (expected HHMM or +minutes)")]
    InvalidBegin(String),
}

impl Schedule {
    /// Work out which mode this schedule describes
    pub fn mode(&self) -> Result<ScheduleMode, ScheduleError> {
        let interval = self.frequency.is_some() || self.begin.is_some();

        let mut set = Vec::new();
        if self.once {
            set.push("once");
        }
        if self.cron.is_some() {
            set.push("cron");
        }
        if interval {
            set.push("frequency/begin");
        }
        if set.len() > 1 {
            return Err(ScheduleError::Ambiguous(set.join(", ")));
        }

        if self.once {
            return Ok(ScheduleMode::Once);
        }

        if let Some(cron) = &self.cron {
            if !validate_cron_schedule(cron) {
                return Err(ScheduleError::InvalidCron(cron.clone()));
            }
            return Ok(ScheduleMode::Cron(cron.clone()));
        }

        let frequency = self.frequency.unwrap_or(DEFAULT_FREQUENCY);
        if frequency == 0 {
            return Err(ScheduleError::ZeroFrequency);
        }
        let begin = match &self.begin {
            Some(raw) => parse_begin(raw)?,
            None => Begin::Immediately,
        };
        Ok(ScheduleMode::Interval { frequency, begin })
    }
}

/// Basic validation: should have 5 fields
pub fn validate_cron_schedule(schedule: &str) -> bool {
    schedule.split_whitespace().count() == 5
}

fn parse_begin(raw: &str) -> Result<Begin, ScheduleError> {
    let invalid = || ScheduleError::InvalidBegin(raw.to_string());

    if let Some(minutes) = raw.strip_prefix('+') {
        return minutes
            .parse::<u32>()
            .map(Begin::AfterMinutes)
            .map_err(|_| invalid());
    }

    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(raw, "%H%M")
        .map(Begin::At)
        .map_err(|_| invalid())
}

fn is_false(value: &bool) -> bool {
    !*value
}
