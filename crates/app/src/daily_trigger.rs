//! Daily trigger: re-runs the planner on a cron schedule.
//!
//! Expressions use the classic five fields (`min hour dom month dow`); a
//! seconds field of `0` is prepended before parsing, and numeric weekdays
//! (0 or 7 = Sunday) are rewritten as day names. Six and seven field
//! expressions are handed to the parser as they are, with its own weekday
//! numbering (1 = Sunday).

use std::str::FromStr;
use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use cron::Schedule;
use tokio::task::JoinHandle;

use prayerbridge_domain::time::Timestamp;

use crate::planner::DailyPlanner;
use crate::ports::{AccessorySink, Clock, PrayerTimesSource};

/// Cron-driven refresh evaluated in a fixed timezone.
#[derive(Debug, Clone)]
pub struct DailyTrigger {
    expression: String,
    schedule: Schedule,
    timezone: Tz,
}

impl DailyTrigger {
    /// Parse a cron expression.
    ///
    /// # Errors
    ///
    /// Returns the cron parser's error for malformed expressions.
    pub fn parse(expression: &str, timezone: Tz) -> Result<Self, cron::error::Error> {
        let expression = expression.trim();
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let normalized = match fields.as_slice() {
            [minute, hour, dom, month, dow] => {
                format!("0 {minute} {hour} {dom} {month} {}", weekday_names(dow)?)
            }
            _ => expression.to_string(),
        };
        Ok(Self {
            schedule: Schedule::from_str(&normalized)?,
            expression: expression.to_string(),
            timezone,
        })
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First firing strictly after `now`.
    #[must_use]
    pub fn next_after(&self, now: Timestamp) -> Option<DateTime<Tz>> {
        self.schedule
            .after(&now.with_timezone(&self.timezone))
            .next()
    }

    /// Run forever: sleep until the next firing, then plan the day.
    ///
    /// The loop ends only if the expression has no future firing.
    pub fn spawn<F, C, S>(self, planner: Arc<DailyPlanner<F, C, S>>) -> JoinHandle<()>
    where
        F: PrayerTimesSource + 'static,
        C: Clock + 'static,
        S: AccessorySink + 'static,
    {
        tokio::spawn(async move {
            loop {
                let now = planner.engine().clock().now();
                let Some(next) = self.next_after(now) else {
                    tracing::warn!(cron = %self.expression, "daily trigger has no future firing");
                    return;
                };
                let wait = (next.to_utc() - now).to_std().unwrap_or_default();
                tracing::debug!(%next, cron = %self.expression, "daily refresh armed");
                tokio::time::sleep(wait).await;

                tracing::info!(cron = %self.expression, "daily refresh triggered");
                planner.plan_today().await;
            }
        })
    }
}

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Rewrite a classic day-of-week field as day names. Named items are left
/// for the parser.
fn weekday_names(field: &str) -> Result<String, cron::error::Error> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }
    let items = field
        .split(',')
        .map(|item| -> Result<String, cron::error::Error> {
            if item.bytes().any(|b| b.is_ascii_alphabetic()) {
                return Ok(item.to_string());
            }
            let days = weekday_item(item).ok_or_else(|| {
                cron::error::Error::from(cron::error::ErrorKind::Expression(format!(
                    "invalid day of week `{item}`"
                )))
            })?;
            Ok(days
                .into_iter()
                .map(|day| WEEKDAYS[day])
                .collect::<Vec<_>>()
                .join(","))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items.join(","))
}

/// Days (0 = Sunday) selected by one list item such as `3`, `1-5`, `*/2`
/// or `5-7`.
fn weekday_item(item: &str) -> Option<Vec<usize>> {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, step.parse::<usize>().ok().filter(|s| *s > 0)?),
        None => (item, 1),
    };
    let (start, end) = match range.split_once('-') {
        _ if range == "*" => (0, 6),
        Some((start, end)) => (weekday_number(start)?, weekday_number(end)?),
        None if step > 1 => (weekday_number(range)?, 7),
        None => {
            let day = weekday_number(range)?;
            (day, day)
        }
    };
    if start > end {
        return None;
    }
    let mut days: Vec<usize> = (start..=end).step_by(step).map(|day| day % 7).collect();
    days.sort_unstable();
    days.dedup();
    Some(days)
}

fn weekday_number(token: &str) -> Option<usize> {
    token.parse::<usize>().ok().filter(|day| *day <= 7)
}
