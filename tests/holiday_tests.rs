use chrono::{NaiveDate, Weekday};
use goal_planner::holidays::{
    SPRING_BREAK, WINTER_BREAK, fall_quarter, spring_quarter, winter_quarter,
};
use goal_planner::{Holiday, HolidayRule, NamedRule, generate_holidays, generate_with_rules};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn has(holidays: &[Holiday], date: NaiveDate, name: &str) -> bool {
    holidays.iter().any(|h| h.date == date && h.name == name)
}

#[test]
fn generation_is_deterministic() {
    let first = generate_holidays(2025, 2025);
    let second = generate_holidays(2025, 2025);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn standard_holidays_for_2025() {
    let holidays = generate_holidays(2025, 2025);
    assert!(has(&holidays, d(2025, 12, 25), "Christmas Day"));
    assert!(
        holidays
            .iter()
            .any(|h| h.date == d(2025, 11, 27) && h.name.contains("Thanksgiving"))
    );
    assert!(has(&holidays, d(2025, 1, 20), "Martin Luther King Jr. Day"));
    assert!(has(&holidays, d(2025, 2, 17), "Presidents' Day"));
    assert!(has(&holidays, d(2025, 5, 26), "Memorial Day"));
    assert!(has(&holidays, d(2025, 9, 1), "Labor Day"));
    assert!(has(&holidays, d(2025, 3, 31), "Cesar Chavez Day"));
    assert!(has(&holidays, d(2025, 6, 19), "Juneteenth"));
    assert!(has(&holidays, d(2025, 7, 4), "Independence Day"));
    assert!(has(&holidays, d(2025, 11, 11), "Veterans Day"));
}

#[test]
fn reversed_range_is_empty() {
    assert!(generate_holidays(2026, 2025).is_empty());
    assert!(generate_with_rules(&[], 2026, 2025).is_empty());
}

#[test]
fn output_is_sorted_without_duplicates() {
    let holidays = generate_holidays(2024, 2027);
    for pair in holidays.windows(2) {
        assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
    }
}

#[test]
fn output_stays_inside_requested_years() {
    let holidays = generate_holidays(2025, 2025);
    assert!(holidays.iter().all(|h| h.date >= d(2025, 1, 1)));
    assert!(holidays.iter().all(|h| h.date <= d(2025, 12, 31)));
}

#[test]
fn quarter_boundaries() {
    assert_eq!(fall_quarter(2025), Some((d(2025, 9, 29), d(2025, 12, 15))));
    assert_eq!(winter_quarter(2025), Some((d(2025, 1, 6), d(2025, 3, 24))));
    assert_eq!(spring_quarter(2025), Some((d(2025, 3, 31), d(2025, 6, 16))));
}

#[test]
fn winter_break_straddles_new_year() {
    let holidays = generate_holidays(2025, 2026);
    let winter: Vec<NaiveDate> = holidays
        .iter()
        .filter(|h| h.name == WINTER_BREAK)
        .map(|h| h.date)
        .filter(|&date| date >= d(2025, 12, 1) && date <= d(2026, 1, 31))
        .collect();
    assert_eq!(winter.first(), Some(&d(2025, 12, 16)));
    assert_eq!(winter.last(), Some(&d(2026, 1, 4)));
    assert_eq!(winter.len(), 20);

    // The break carried over from the previous academic year is clipped.
    assert!(has(&holidays, d(2025, 1, 3), WINTER_BREAK));
    assert!(!holidays.iter().any(|h| h.date < d(2025, 1, 1)));
}

#[test]
fn spring_break_sits_between_quarters() {
    let holidays = generate_holidays(2025, 2025);
    let spring: Vec<NaiveDate> = holidays
        .iter()
        .filter(|h| h.name == SPRING_BREAK)
        .map(|h| h.date)
        .collect();
    let expected: Vec<NaiveDate> = (25..=30).map(|day| d(2025, 3, day)).collect();
    assert_eq!(spring, expected);
}

#[test]
fn year_range_does_not_change_a_years_entries() {
    let single = generate_holidays(2026, 2026);
    let wide: Vec<Holiday> = generate_holidays(2025, 2027)
        .into_iter()
        .filter(|h| h.date >= d(2026, 1, 1) && h.date <= d(2026, 12, 31))
        .collect();
    assert_eq!(single, wide);
}

#[test]
fn custom_rules() {
    let rules = vec![
        NamedRule::new("Founders Day", HolidayRule::Fixed { month: 4, day: 2 }),
        NamedRule::new(
            "Offsite",
            HolidayRule::NthWeekday { month: 10, weekday: Weekday::Wed, n: 2 },
        ),
        NamedRule::new(
            "Summer Close",
            HolidayRule::LastWeekday { month: 8, weekday: Weekday::Fri },
        ),
        // No fifth Monday in February 2025; skipped silently.
        NamedRule::new(
            "Phantom",
            HolidayRule::NthWeekday { month: 2, weekday: Weekday::Mon, n: 5 },
        ),
    ];
    let holidays = generate_with_rules(&rules, 2025, 2025);
    assert_eq!(
        holidays,
        vec![
            Holiday::new(d(2025, 4, 2), "Founders Day"),
            Holiday::new(d(2025, 8, 29), "Summer Close"),
            Holiday::new(d(2025, 10, 8), "Offsite"),
        ]
    );
}
