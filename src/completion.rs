//! Daily completion over a plant collection.
//!
//! Pure functions; "now" and the calendar that dates it are always passed in.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::clock::Calendar;
use crate::models::Plant;

/// How many plants were watered today out of how many are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyStatus {
    pub watered: usize,
    pub total: usize,
}

impl DailyStatus {
    pub fn is_zero(&self) -> bool {
        self.watered == 0
    }
}

impl fmt::Display for DailyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "Your plants are waiting for a sip 💦")
        } else {
            write!(f, "{} of your plants feel loved today ✨", self.watered)
        }
    }
}

pub fn completed_count<C>(plants: &[Plant], now: DateTime<Utc>, calendar: &C) -> usize
where
    C: Calendar + ?Sized,
{
    plants.iter().filter(|p| p.is_watered_today(now, calendar)).count()
}

/// Share of plants watered today, in `[0, 1]`. An empty collection is `0`.
pub fn progress_fraction<C>(plants: &[Plant], now: DateTime<Utc>, calendar: &C) -> f64
where
    C: Calendar + ?Sized,
{
    if plants.is_empty() {
        return 0.0;
    }
    completed_count(plants, now, calendar) as f64 / plants.len() as f64
}

pub fn status<C>(plants: &[Plant], now: DateTime<Utc>, calendar: &C) -> DailyStatus
where
    C: Calendar + ?Sized,
{
    DailyStatus {
        watered: completed_count(plants, now, calendar),
        total: plants.len(),
    }
}

/// An empty collection is never all done.
pub fn is_all_done<C>(plants: &[Plant], now: DateTime<Utc>, calendar: &C) -> bool
where
    C: Calendar + ?Sized,
{
    !plants.is_empty() && completed_count(plants, now, calendar) == plants.len()
}

/// Clear `is_watered` on plants whose last watering was not today.
///
/// `last_watered_at` is kept. Returns the number of plants changed, so a
/// second pass on the same day returns `0`.
pub fn daily_rollover<C>(plants: &mut [Plant], now: DateTime<Utc>, calendar: &C) -> usize
where
    C: Calendar + ?Sized,
{
    let mut cleared = 0;
    for plant in plants.iter_mut() {
        if plant.is_watered && !plant.is_watered_today(now, calendar) {
            plant.is_watered = false;
            cleared += 1;
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreatePlantInput;
    use chrono::{Duration, FixedOffset, NaiveDate, Utc};

    fn plant(name: &str) -> Plant {
        Plant::new(CreatePlantInput::named(name))
    }

    fn watered(name: &str, at: DateTime<Utc>) -> Plant {
        let mut p = plant(name);
        p.is_watered = true;
        p.last_watered_at = Some(at);
        p
    }

    fn noon() -> DateTime<Utc> {
        "2026-05-20T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_collection() {
        let now = noon();
        assert_eq!(completed_count(&[], now, &Utc), 0);
        assert_eq!(progress_fraction(&[], now, &Utc), 0.0);
        assert!(!is_all_done(&[], now, &Utc));
        assert!(status(&[], now, &Utc).is_zero());
    }

    #[test]
    fn half_watered() {
        let now = noon();
        let plants = vec![watered("Pothos", now - Duration::hours(2)), plant("Fern")];

        assert_eq!(completed_count(&plants, now, &Utc), 1);
        assert_eq!(progress_fraction(&plants, now, &Utc), 0.5);
        assert!(!is_all_done(&plants, now, &Utc));

        let status = status(&plants, now, &Utc);
        assert_eq!(status, DailyStatus { watered: 1, total: 2 });
        assert!(!status.is_zero());
    }

    #[test]
    fn stale_flag_does_not_count_as_done() {
        let now = noon();
        let plants = vec![watered("Pothos", now - Duration::days(1))];
        assert_eq!(completed_count(&plants, now, &Utc), 0);
        assert!(!is_all_done(&plants, now, &Utc));
    }

    #[test]
    fn all_done_when_every_plant_watered_today() {
        let now = noon();
        let plants = vec![
            watered("Pothos", now - Duration::hours(1)),
            watered("Fern", now - Duration::hours(3)),
        ];
        assert!(is_all_done(&plants, now, &Utc));
        assert_eq!(progress_fraction(&plants, now, &Utc), 1.0);
    }

    #[test]
    fn rollover_clears_stale_flags_only() {
        let now = noon();
        let yesterday = now - Duration::days(1);
        let mut plants = vec![
            watered("Pothos", yesterday),
            watered("Fern", now - Duration::hours(1)),
            plant("Cactus"),
        ];

        assert_eq!(daily_rollover(&mut plants, now, &Utc), 1);
        assert!(!plants[0].is_watered);
        assert_eq!(plants[0].last_watered_at, Some(yesterday));
        assert!(plants[1].is_watered);
        assert!(!plants[2].is_watered);
    }

    #[test]
    fn rollover_is_idempotent() {
        let now = noon();
        let mut plants = vec![watered("Pothos", now - Duration::days(2)), plant("Fern")];

        daily_rollover(&mut plants, now, &Utc);
        let once = plants.clone();
        assert_eq!(daily_rollover(&mut plants, now, &Utc), 0);
        assert_eq!(plants, once);
    }

    /// Central European time across the March 2026 switch to summer time.
    struct SpringForward;

    impl Calendar for SpringForward {
        fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
            let switch: DateTime<Utc> = "2026-03-29T01:00:00Z".parse().unwrap();
            let hours = if at < switch { 1 } else { 2 };
            FixedOffset::east_opt(hours * 3600).unwrap().date_of(at)
        }
    }

    #[test]
    fn late_watering_before_a_dst_change_belongs_to_that_day() {
        // 23:30 +01:00 on the 28th; noon +02:00 on the 29th.
        let watered_at: DateTime<Utc> = "2026-03-28T22:30:00Z".parse().unwrap();
        let now: DateTime<Utc> = "2026-03-29T10:00:00Z".parse().unwrap();
        let mut plants = vec![watered("Pothos", watered_at)];

        assert_eq!(completed_count(&plants, now, &SpringForward), 0);
        assert!(!is_all_done(&plants, now, &SpringForward));
        assert_eq!(daily_rollover(&mut plants, now, &SpringForward), 1);
        assert!(!plants[0].is_watered);
    }

    #[test]
    fn status_wording() {
        let zero = DailyStatus { watered: 0, total: 3 };
        let some = DailyStatus { watered: 2, total: 3 };
        assert_eq!(zero.to_string(), "Your plants are waiting for a sip 💦");
        assert_eq!(some.to_string(), "2 of your plants feel loved today ✨");
    }
}
