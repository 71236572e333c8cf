//! Time-bucketed activity trend for recruiter dashboards.
//!
//! All instants are shifted by a fixed +5:30 offset before truncating to a
//! calendar day, so "today" and the day boundaries are anchored to that zone
//! regardless of where the server runs. This is deliberately not
//! viewer-relative; keep it fixed for compatibility.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Reporting offset: UTC+5:30.
const REPORT_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Number of daily buckets emitted, ending "today" in the reporting offset.
const TREND_DAYS: u64 = 30;

/// Raw fetch window. Three days wider than the trend so timestamps that land
/// on a different calendar day after the offset shift are still captured.
const RAW_WINDOW: &str = "33 days";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub jobs_created: i64,
    pub applications_received: i64,
}

fn report_offset() -> FixedOffset {
    FixedOffset::east_opt(REPORT_OFFSET_SECS).expect("offset is in range")
}

/// Builds the 30-day series from raw timestamps. Pure: the caller supplies
/// the current instant, so day-boundary behavior is testable directly.
/// Timestamps outside the 30 generated days are dropped silently.
pub fn build_trend(
    now: DateTime<Utc>,
    jobs_created: &[DateTime<Utc>],
    applications_received: &[DateTime<Utc>],
) -> Vec<TrendPoint> {
    let offset = report_offset();
    let today = now.with_timezone(&offset).date_naive();
    let start = today - Days::new(TREND_DAYS - 1);

    let mut points: Vec<TrendPoint> = (0..TREND_DAYS)
        .map(|i| TrendPoint {
            date: start + Days::new(i),
            jobs_created: 0,
            applications_received: 0,
        })
        .collect();

    let bucket_index = |ts: &DateTime<Utc>| -> Option<usize> {
        let day = ts.with_timezone(&offset).date_naive();
        let idx = day.signed_duration_since(start).num_days();
        if (0..TREND_DAYS as i64).contains(&idx) {
            Some(idx as usize)
        } else {
            None
        }
    };

    for ts in jobs_created {
        if let Some(idx) = bucket_index(ts) {
            points[idx].jobs_created += 1;
        }
    }
    for ts in applications_received {
        if let Some(idx) = bucket_index(ts) {
            points[idx].applications_received += 1;
        }
    }

    points
}

/// Fetches raw activity timestamps for the recruiter's jobs and buckets them.
pub async fn recruiter_trend(
    db: &PgPool,
    recruiter_id: i64,
) -> Result<Vec<TrendPoint>, sqlx::Error> {
    let jobs_created: Vec<DateTime<Utc>> = sqlx::query_scalar(&format!(
        "SELECT created_at FROM jobs \
         WHERE recruiter_id = $1 AND created_at >= now() - INTERVAL '{RAW_WINDOW}'"
    ))
    .bind(recruiter_id)
    .fetch_all(db)
    .await?;

    let applications_received: Vec<DateTime<Utc>> = sqlx::query_scalar(&format!(
        "SELECT a.applied_at FROM applications a \
         JOIN jobs j ON j.id = a.job_id \
         WHERE j.recruiter_id = $1 AND a.applied_at >= now() - INTERVAL '{RAW_WINDOW}'"
    ))
    .bind(recruiter_id)
    .fetch_all(db)
    .await?;

    Ok(build_trend(
        Utc::now(),
        &jobs_created,
        &applications_received,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_empty_activity_still_yields_thirty_zero_days() {
        let trend = build_trend(at(2026, 8, 4, 12, 0), &[], &[]);
        assert_eq!(trend.len(), 30);
        assert!(trend
            .iter()
            .all(|p| p.jobs_created == 0 && p.applications_received == 0));
    }

    #[test]
    fn test_dates_are_strictly_increasing_with_no_gaps() {
        let trend = build_trend(at(2026, 8, 4, 12, 0), &[], &[]);
        for pair in trend.windows(2) {
            assert_eq!(pair[1].date, pair[0].date + Days::new(1));
        }
    }

    #[test]
    fn test_today_is_anchored_to_the_offset_zone() {
        // 2026-08-04 20:00 UTC is already 2026-08-05 01:30 at +5:30.
        let trend = build_trend(at(2026, 8, 4, 20, 0), &[], &[]);
        assert_eq!(
            trend.last().unwrap().date,
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
    }

    #[test]
    fn test_late_utc_evening_buckets_into_next_offset_day() {
        let now = at(2026, 8, 4, 12, 0);
        // 18:45 UTC on the 3rd is 00:15 on the 4th at +5:30.
        let shifted = at(2026, 8, 3, 18, 45);
        // 18:29 UTC stays on the 3rd (23:59 at +5:30).
        let unshifted = at(2026, 8, 3, 18, 29);
        let trend = build_trend(now, &[shifted, unshifted], &[]);

        let by_date = |d: NaiveDate| trend.iter().find(|p| p.date == d).unwrap();
        assert_eq!(
            by_date(NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()).jobs_created,
            1
        );
        assert_eq!(
            by_date(NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()).jobs_created,
            1
        );
    }

    #[test]
    fn test_out_of_window_timestamps_are_dropped() {
        let now = at(2026, 8, 4, 12, 0);
        let too_old = at(2026, 6, 1, 12, 0);
        let in_future = at(2026, 8, 10, 12, 0);
        let trend = build_trend(now, &[too_old], &[in_future]);
        assert!(trend.iter().all(|p| p.jobs_created == 0));
        assert!(trend.iter().all(|p| p.applications_received == 0));
    }

    #[test]
    fn test_counts_accumulate_per_day() {
        let now = at(2026, 8, 4, 12, 0);
        let day = at(2026, 8, 1, 9, 0);
        let same_day = at(2026, 8, 1, 15, 30);
        let trend = build_trend(now, &[day, same_day], &[same_day]);
        let point = trend
            .iter()
            .find(|p| p.date == NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
            .unwrap();
        assert_eq!(point.jobs_created, 2);
        assert_eq!(point.applications_received, 1);
    }

    #[test]
    fn test_window_spans_month_boundary() {
        let trend = build_trend(at(2026, 3, 10, 12, 0), &[], &[]);
        assert_eq!(
            trend.first().unwrap().date,
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
        assert_eq!(
            trend.last().unwrap().date,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
    }
}
