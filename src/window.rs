use jiff::{RoundMode, Timestamp, TimestampRound, ToSpan, Unit};

use crate::error::Error;
use crate::prelude::*;

/// The `[from, until)` range the feed is queried over, in Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    /// Inclusive.
    pub from: i64,

    /// Exclusive.
    pub until: i64,
}

impl FeedWindow {
    /// The window ending five minutes before the current minute.
    pub fn now() -> AppResult<Self> {
        Self::ending_before(Timestamp::now())
    }

    /// A full 24 hours ending 5 minutes before `now`, floored to the minute.
    ///
    /// Timestamps carry no zone, so there is no local offset to worry about.
    pub fn ending_before(now: Timestamp) -> AppResult<Self> {
        let minute = now
            .round(
                TimestampRound::new()
                    .smallest(Unit::Minute)
                    .mode(RoundMode::Floor),
            )
            .map_err(Error::Window)?;

        let until = minute.checked_sub(5.minutes()).map_err(Error::Window)?;
        let from = until.checked_sub(24.hours()).map_err(Error::Window)?;

        Ok(FeedWindow {
            from: from.as_second(),
            until: until.as_second(),
        })
    }
}
