use crate::date::{parse_instant, InvalidScheduleInput};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use itertools::Itertools;

pub const REMINDER_TITLE: &str = "Order Reminder";
pub const SAME_DAY_REMINDER_TITLE: &str = "Order Today";

/// Days before the appointment date that get a single reminder at `DAILY_HOUR`
const DAILY_DAYS_BEFORE: [i64; 5] = [7, 6, 5, 4, 3];
const DAILY_HOUR: u32 = 6;
/// Days before the appointment date that get a reminder at each of `THRICE_DAILY_HOURS`
const THRICE_DAILY_DAYS_BEFORE: [i64; 3] = [3, 2, 1];
const THRICE_DAILY_HOURS: [u32; 3] = [6, 12, 18];
/// Hours before the appointment itself for the same day reminders
const SAME_DAY_HOURS_BEFORE: [i64; 3] = [4, 6, 8];
/// Same day reminders falling before this local hour are dropped
const SAME_DAY_EARLIEST_HOUR: u32 = 4;

/// Upper bound for the dispatcher interval. It is the distance between two
/// same day reminders, the calendar rungs are further apart. A same day
/// reminder can still land right after a calendar rung (an appointment at
/// 00:30 is reminded at 18:00 and 18:30 the day before), such pairs go out
/// in the same sweep.
pub const MAX_DISPATCH_INTERVAL_MINUTES: u64 = 2 * 60;

/// A single reminder derived from an order's appointment time
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedReminder {
    pub remind_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

/// The reminders that should exist for an order, ordered by `remind_at`
/// and without two reminders at the same instant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReminderPlan {
    reminders: Vec<PlannedReminder>,
}

impl ReminderPlan {
    /// Expands the reminder ladder for an appointment.
    ///
    /// Calendar based rungs (06:00, 12:00 and 18:00 on the days before) are
    /// computed in `timezone`, the same day rungs are offsets from the
    /// appointment itself. Only reminders strictly after `now` are kept.
    pub fn generate(
        appointment: &str,
        now: DateTime<Utc>,
        client_name: &str,
        timezone: &Tz,
    ) -> Result<Self, InvalidScheduleInput> {
        let appointment = parse_instant(appointment)?;
        let local_appointment = appointment.with_timezone(timezone);
        let appointment_date = local_appointment.date_naive();
        let time = format_time(&local_appointment);

        let upcoming_body = format!(
            "Upcoming order for {} on {} at {}",
            client_name,
            local_appointment.format("%b %-d, %Y"),
            time
        );

        let days_before_reminders = DAILY_DAYS_BEFORE
            .iter()
            .map(|days_before| (*days_before, DAILY_HOUR))
            .chain(THRICE_DAILY_DAYS_BEFORE.iter().flat_map(|days_before| {
                THRICE_DAILY_HOURS
                    .iter()
                    .map(move |hour| (*days_before, *hour))
            }))
            .filter_map(|(days_before, hour)| {
                local_instant(timezone, appointment_date - Duration::days(days_before), hour)
            })
            .map(|remind_at| PlannedReminder {
                remind_at,
                title: REMINDER_TITLE.into(),
                body: upcoming_body.clone(),
            });

        let same_day_reminders = SAME_DAY_HOURS_BEFORE.iter().filter_map(|hours_before| {
            let remind_at = appointment - Duration::hours(*hours_before);
            if remind_at.with_timezone(timezone).hour() < SAME_DAY_EARLIEST_HOUR {
                return None;
            }
            Some(PlannedReminder {
                remind_at,
                title: SAME_DAY_REMINDER_TITLE.into(),
                body: format!(
                    "Your order for {} is today at {} (in {} hours)!",
                    client_name, time, hours_before
                ),
            })
        });

        // Sorting is stable, so when two rungs hit the same instant the one
        // listed first in the ladder wins
        let reminders = days_before_reminders
            .chain(same_day_reminders)
            .filter(|reminder| reminder.remind_at > now)
            .sorted_by_key(|reminder| reminder.remind_at)
            .dedup_by(|r1, r2| r1.remind_at == r2.remind_at)
            .collect();

        Ok(Self { reminders })
    }

    pub fn reminders(&self) -> &[PlannedReminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

impl IntoIterator for ReminderPlan {
    type Item = PlannedReminder;
    type IntoIter = std::vec::IntoIter<PlannedReminder>;

    fn into_iter(self) -> Self::IntoIter {
        self.reminders.into_iter()
    }
}

/// `hour`:00 on `date` in `timezone`. Local times skipped by a DST
/// transition yield `None`, repeated ones resolve to the earliest instant.
fn local_instant(timezone: &Tz, date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    let local = date.and_hms_opt(hour, 0, 0)?;
    timezone
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_time(dt: &DateTime<Tz>) -> String {
    dt.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::{Asia::Kolkata, America::New_York, UTC};

    fn instant(datestr: &str) -> DateTime<Utc> {
        parse_instant(datestr).expect("Valid test timestamp")
    }

    fn local_hours(plan: &ReminderPlan, tz: &Tz) -> Vec<String> {
        plan.reminders()
            .iter()
            .map(|r| r.remind_at.with_timezone(tz).format("%m-%d %H:%M").to_string())
            .collect()
    }

    #[test]
    fn full_ladder_ten_days_ahead() {
        let now = instant("2025-04-01T14:00:00+05:30");
        let plan =
            ReminderPlan::generate("2025-04-11T14:00:00+05:30", now, "Ada", &Kolkata).unwrap();

        assert_eq!(plan.len(), 16);
        assert_eq!(
            local_hours(&plan, &Kolkata),
            vec![
                "04-04 06:00",
                "04-05 06:00",
                "04-06 06:00",
                "04-07 06:00",
                "04-08 06:00",
                "04-08 12:00",
                "04-08 18:00",
                "04-09 06:00",
                "04-09 12:00",
                "04-09 18:00",
                "04-10 06:00",
                "04-10 12:00",
                "04-10 18:00",
                "04-11 06:00",
                "04-11 08:00",
                "04-11 10:00",
            ]
        );

        let first = &plan.reminders()[0];
        assert_eq!(first.title, REMINDER_TITLE);
        assert_eq!(first.body, "Upcoming order for Ada on Apr 11, 2025 at 2:00 PM");

        let last = &plan.reminders()[15];
        assert_eq!(last.title, SAME_DAY_REMINDER_TITLE);
        assert_eq!(last.body, "Your order for Ada is today at 2:00 PM (in 4 hours)!");
        let same_day_titles = plan
            .reminders()
            .iter()
            .filter(|r| r.title == SAME_DAY_REMINDER_TITLE)
            .count();
        assert_eq!(same_day_titles, 3);
    }

    #[test]
    fn is_deterministic() {
        let now = instant("2025-04-01T00:00:00Z");
        let plan1 = ReminderPlan::generate("2025-04-11T14:00:00Z", now, "Ada", &UTC).unwrap();
        let plan2 = ReminderPlan::generate("2025-04-11T14:00:00Z", now, "Ada", &UTC).unwrap();
        assert_eq!(plan1, plan2);
    }

    #[test]
    fn emits_the_third_day_morning_once() {
        let now = instant("2025-04-01T00:00:00Z");
        let plan = ReminderPlan::generate("2025-04-11T14:00:00Z", now, "Ada", &UTC).unwrap();
        let day_3_morning = instant("2025-04-08T06:00:00Z");
        let occurrences = plan
            .reminders()
            .iter()
            .filter(|r| r.remind_at == day_3_morning)
            .count();
        assert_eq!(occurrences, 1);
        assert!(plan
            .reminders()
            .windows(2)
            .all(|w| w[0].remind_at < w[1].remind_at));
    }

    #[test]
    fn never_schedules_the_past() {
        let now = instant("2025-04-09T14:00:00Z");
        let plan = ReminderPlan::generate("2025-04-11T14:00:00Z", now, "Ada", &UTC).unwrap();
        assert!(plan.reminders().iter().all(|r| r.remind_at > now));
        assert_eq!(
            local_hours(&plan, &UTC),
            vec![
                "04-09 18:00",
                "04-10 06:00",
                "04-10 12:00",
                "04-10 18:00",
                "04-11 06:00",
                "04-11 08:00",
                "04-11 10:00",
            ]
        );

        // A reminder exactly at `now` is also in the past
        let now = instant("2025-04-11T10:00:00Z");
        let plan = ReminderPlan::generate("2025-04-11T14:00:00Z", now, "Ada", &UTC).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn same_day_reminders_never_before_four_in_the_morning() {
        let now = instant("2025-04-01T00:00:00Z");
        let plan = ReminderPlan::generate("2025-04-11T09:00:00Z", now, "Ada", &UTC).unwrap();
        let same_day = plan
            .reminders()
            .iter()
            .filter(|r| r.title == SAME_DAY_REMINDER_TITLE)
            .collect::<Vec<_>>();
        assert_eq!(same_day.len(), 1);
        assert_eq!(same_day[0].remind_at, instant("2025-04-11T05:00:00Z"));
        assert!(same_day
            .iter()
            .all(|r| r.remind_at.with_timezone(&UTC).hour() >= SAME_DAY_EARLIEST_HOUR));
    }

    #[test]
    fn ladder_is_computed_in_the_configured_timezone() {
        let now = instant("2025-06-01T00:00:00Z");
        // 14:00 in New York is 18:00 UTC during daylight saving time
        let plan =
            ReminderPlan::generate("2025-06-11T14:00:00-04:00", now, "Ada", &New_York).unwrap();
        assert_eq!(plan.reminders()[0].remind_at, instant("2025-06-04T06:00:00-04:00"));
        assert_eq!(plan.len(), 16);
    }

    #[test]
    fn daily_rungs_keep_local_hour_across_dst_start() {
        // New York moves from -05:00 to -04:00 on March 9th 2025
        let now = instant("2025-03-01T00:00:00Z");
        let plan =
            ReminderPlan::generate("2025-03-12T14:00:00-04:00", now, "Ada", &New_York).unwrap();
        assert_eq!(plan.reminders()[0].remind_at, instant("2025-03-05T11:00:00Z"));
        assert!(plan
            .reminders()
            .iter()
            .any(|r| r.remind_at == instant("2025-03-10T10:00:00Z")));
        assert_eq!(plan.len(), 16);
    }

    #[test]
    fn skipped_local_times_are_dropped_and_repeated_resolve_to_earliest() {
        let skipped = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(local_instant(&New_York, skipped, 2), None);

        let repeated = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        assert_eq!(
            local_instant(&New_York, repeated, 1),
            Some(instant("2025-11-02T01:00:00-04:00"))
        );
    }

    #[test]
    fn dispatch_interval_bound_is_the_same_day_gap() {
        let smallest_gap = SAME_DAY_HOURS_BEFORE
            .windows(2)
            .map(|w| (w[1] - w[0]) * 60)
            .min()
            .unwrap();
        assert_eq!(smallest_gap as u64, MAX_DISPATCH_INTERVAL_MINUTES);
    }

    #[test]
    fn same_instant_with_different_offsets_gives_the_same_plan() {
        let now = instant("2025-04-01T00:00:00Z");
        let plan1 =
            ReminderPlan::generate("2025-04-11T14:00:00+05:30", now, "Ada", &Kolkata).unwrap();
        let plan2 = ReminderPlan::generate("2025-04-11T08:30:00Z", now, "Ada", &Kolkata).unwrap();
        assert_eq!(plan1, plan2);
    }

    #[test]
    fn rejects_appointments_without_offset() {
        let now = instant("2025-04-01T00:00:00Z");
        assert_eq!(
            ReminderPlan::generate("2025-04-11T14:00:00", now, "Ada", &UTC),
            Err(InvalidScheduleInput("2025-04-11T14:00:00".into()))
        );
        assert!(ReminderPlan::generate("next tuesday", now, "Ada", &UTC).is_err());
    }
}
