//! Scheduled Discount Matcher
//!
//! Decides which scheduled discounts are live at a given instant, in the
//! restaurant's own timezone. Windows are `[start, end)` at minute
//! granularity; `start > end` wraps midnight.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};
use shared::models::{Choice, ScheduledDiscount, ScheduledDiscountInput};

use super::calculator::validate_percent;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Santiago;

pub type TimezoneChoice = Choice<Tz>;

/// Resolve a stored IANA timezone name; unknown names fall back to default
pub fn choose_timezone(name: Option<&str>) -> TimezoneChoice {
    Choice::from_option(name.and_then(|n| n.parse::<Tz>().ok()))
}

/// Parse strict 24h `"HH:MM"` into minute of day
pub fn parse_hhmm(value: &str) -> Option<u16> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |b: u8| b.is_ascii_digit().then(|| u16::from(b - b'0'));
    let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;
    (hour < 24 && minute < 60).then_some(hour * 60 + minute)
}

/// 0=Sunday..6=Saturday
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Check a discount against a local wall-clock time
pub fn is_window_active(discount: &ScheduledDiscount, local: NaiveDateTime) -> bool {
    if !discount.is_active {
        return false;
    }
    let start = parse_hhmm(&discount.start_time);
    let end = parse_hhmm(&discount.end_time);
    let (Some(start), Some(end)) = (start, end) else {
        return false;
    };
    if start == end {
        return false;
    }

    let minute = (local.hour() * 60 + local.minute()) as u16;
    let today = weekday_index(local.weekday());
    let on = |day: u8| discount.days.contains(&day);

    if start < end {
        on(today) && minute >= start && minute < end
    } else {
        // Overnight: the tail after midnight belongs to yesterday's window
        let yesterday = (today + 6) % 7;
        (minute >= start && on(today)) || (minute < end && on(yesterday))
    }
}

/// Pick the scheduled discount that applies to a category right now.
///
/// The largest percentage wins; equal percentages go to the lowest id.
pub fn best_active_discount<'a>(
    discounts: &'a [ScheduledDiscount],
    category_id: i64,
    now: DateTime<Utc>,
    tz: Tz,
) -> Option<&'a ScheduledDiscount> {
    let local = now.with_timezone(&tz).naive_local();
    discounts
        .iter()
        .filter(|d| d.category_id == category_id && is_window_active(d, local))
        .fold(None, |best: Option<&ScheduledDiscount>, d| match best {
            Some(b) if b.discount > d.discount || (b.discount == d.discount && b.id <= d.id) => {
                Some(b)
            }
            _ => Some(d),
        })
}

fn schedule_error(field: &str, msg: &str) -> AppError {
    AppError::with_message(ErrorCode::InvalidSchedule, msg).with_detail("field", field)
}

/// Validate one entry of a replace-all request. `index` prefixes field names.
pub fn validate_scheduled_discount(
    input: &ScheduledDiscountInput,
    index: usize,
) -> Result<(), AppError> {
    let field = |name: &str| format!("discounts[{index}].{name}");

    validate_percent(&field("discount"), input.discount)?;

    let days = field("days");
    if input.days.is_empty() {
        return Err(schedule_error(&days, "Debe incluir al menos un día"));
    }
    let mut seen = [false; 7];
    for &day in &input.days {
        let slot = seen
            .get_mut(usize::from(day))
            .ok_or_else(|| schedule_error(&days, "Día fuera de rango (0-6)"))?;
        if *slot {
            return Err(schedule_error(&days, "Día duplicado"));
        }
        *slot = true;
    }

    let start = parse_hhmm(&input.start_time)
        .ok_or_else(|| schedule_error(&field("start_time"), "Hora inválida, use HH:MM"))?;
    let end = parse_hhmm(&input.end_time)
        .ok_or_else(|| schedule_error(&field("end_time"), "Hora inválida, use HH:MM"))?;
    if start == end {
        return Err(schedule_error(
            &field("end_time"),
            "La hora de término debe ser distinta a la de inicio",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn discount(id: i64, pct: f64, days: &[u8], start: &str, end: &str) -> ScheduledDiscount {
        ScheduledDiscount {
            id,
            restaurant_id: 1,
            category_id: 10,
            discount: pct,
            days: days.to_vec(),
            start_time: start.into(),
            end_time: end.into(),
            is_active: true,
            created_at: 0,
        }
    }

    // 2025-01-15 is a Wednesday
    fn wed(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parse_hhmm_is_strict() {
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("23:59"), Some(23 * 60 + 59));
        assert_eq!(parse_hhmm("17:30"), Some(1050));
        for bad in ["24:00", "12:60", "9:30", "09:3", "0930", "09-30", " 9:30", "ab:cd", "+1:00"] {
            assert_eq!(parse_hhmm(bad), None, "{bad}");
        }
    }

    #[test]
    fn end_is_exclusive() {
        let d = discount(1, 20.0, &[1, 2, 3, 4, 5], "17:00", "19:00");
        assert!(!is_window_active(&d, wed(16, 59)));
        assert!(is_window_active(&d, wed(17, 0)));
        assert!(is_window_active(&d, wed(18, 0)));
        assert!(is_window_active(&d, wed(18, 59)));
        assert!(!is_window_active(&d, wed(19, 0)));
    }

    #[test]
    fn weekday_must_match() {
        let weekend = discount(1, 20.0, &[0, 6], "17:00", "19:00");
        assert!(!is_window_active(&weekend, wed(18, 0)));
    }

    #[test]
    fn inactive_never_matches() {
        let mut d = discount(1, 20.0, &[3], "00:00", "23:59");
        d.is_active = false;
        assert!(!is_window_active(&d, wed(12, 0)));
    }

    #[test]
    fn overnight_uses_yesterday_after_midnight() {
        // Tuesday night 22:00 until Wednesday 02:00
        let d = discount(1, 15.0, &[2], "22:00", "02:00");
        assert!(is_window_active(&d, wed(1, 30)));
        assert!(!is_window_active(&d, wed(2, 0)));
        // Wednesday 23:00 is not covered: Wednesday is not in days
        assert!(!is_window_active(&d, wed(23, 0)));

        let wed_night = discount(2, 15.0, &[3], "22:00", "02:00");
        assert!(is_window_active(&wed_night, wed(22, 0)));
        assert!(!is_window_active(&wed_night, wed(1, 0)));
    }

    #[test]
    fn largest_discount_then_lowest_id_wins() {
        let tz = chrono_tz::UTC;
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 18, 0, 0).unwrap();
        let all = [
            discount(5, 10.0, &[3], "17:00", "19:00"),
            discount(4, 25.0, &[3], "17:00", "19:00"),
            discount(3, 25.0, &[3], "17:00", "19:00"),
            discount(1, 90.0, &[3], "08:00", "09:00"),
        ];
        assert_eq!(best_active_discount(&all, 10, now, tz).map(|d| d.id), Some(3));
        assert!(best_active_discount(&all, 99, now, tz).is_none());
    }

    #[test]
    fn now_is_interpreted_in_restaurant_timezone() {
        // 21:00 UTC on Wednesday is 18:00 in Santiago (UTC-3 in January)
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 21, 0, 0).unwrap();
        let all = [discount(1, 20.0, &[3], "17:00", "19:00")];
        assert!(best_active_discount(&all, 10, now, DEFAULT_TIMEZONE).is_some());
        assert!(best_active_discount(&all, 10, now, chrono_tz::UTC).is_none());
    }

    #[test]
    fn timezone_choice() {
        assert!(choose_timezone(None).is_default());
        assert!(choose_timezone(Some("Mars/Olympus")).is_default());
        assert_eq!(
            choose_timezone(Some("Europe/Madrid")).configured().copied(),
            Some(chrono_tz::Europe::Madrid)
        );
    }

    #[test]
    fn validation_rejects_bad_input() {
        let ok = ScheduledDiscountInput {
            category_id: 1,
            discount: 20.0,
            days: vec![1, 5],
            start_time: "22:00".into(),
            end_time: "02:00".into(),
            is_active: true,
        };
        assert!(validate_scheduled_discount(&ok, 0).is_ok());

        let with = |edit: fn(&mut ScheduledDiscountInput)| {
            let mut input = ok.clone();
            edit(&mut input);
            input
        };
        let cases = [
            (with(|d| d.discount = 101.0), "discount", ErrorCode::InvalidDiscount),
            (with(|d| d.discount = f64::NAN), "discount", ErrorCode::InvalidDiscount),
            (with(|d| d.days = vec![]), "days", ErrorCode::InvalidSchedule),
            (with(|d| d.days = vec![7]), "days", ErrorCode::InvalidSchedule),
            (with(|d| d.days = vec![1, 1]), "days", ErrorCode::InvalidSchedule),
            (with(|d| d.start_time = "25:00".into()), "start_time", ErrorCode::InvalidSchedule),
            (with(|d| d.end_time = "22:00".into()), "end_time", ErrorCode::InvalidSchedule),
        ];
        for (input, field, code) in cases {
            let err = validate_scheduled_discount(&input, 2).unwrap_err();
            assert_eq!(err.code, code, "{field}");
            assert_eq!(err.details.unwrap()["field"], format!("discounts[2].{field}"));
        }
    }
}
