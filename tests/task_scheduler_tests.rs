use chrono::NaiveDate;
use goal_planner::dates::inclusive_days;
use goal_planner::{
    BusinessCalendar, DependencyResolution, Difficulty, Holiday, MAX_TASK_DURATION, PlannerError,
    TaskScheduler, TaskTemplate, compute_task_positions, default_template, validate_template,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_template_layout_for_easy_goal() {
    let cal = BusinessCalendar::default();
    let layout =
        compute_task_positions(&default_template(), d(2025, 1, 6), Some(Difficulty::Easy), &cal)
            .unwrap();

    let expected = [
        ("define", d(2025, 1, 6), d(2025, 1, 9)),
        // Starts on the Thursday define ends.
        ("scope-approval", d(2025, 1, 9), d(2025, 1, 12)),
        // Sunday 01-12 snapped to Monday.
        ("research", d(2025, 1, 13), d(2025, 1, 19)),
        ("proposal", d(2025, 1, 13), d(2025, 1, 19)),
        // Sunday 01-19 and MLK day (01-20) are skipped.
        ("proposal-approval", d(2025, 1, 21), d(2025, 1, 24)),
        ("implement", d(2025, 1, 24), d(2025, 1, 30)),
        ("communicate", d(2025, 1, 24), d(2025, 1, 27)),
        ("sign-off", d(2025, 1, 30), d(2025, 2, 2)),
    ];

    assert_eq!(layout.len(), expected.len());
    for (position, (id, start, end)) in layout.iter().zip(expected) {
        assert_eq!(position.task.id, id);
        assert_eq!(position.start_date, start, "start of {id}");
        assert_eq!(position.end_date, end, "end of {id}");
    }
    assert_eq!(layout.earliest_start(), Some(d(2025, 1, 6)));
    assert_eq!(layout.latest_end(), Some(d(2025, 2, 2)));
}

#[test]
fn dependent_starts_on_the_business_day_its_dependency_ends() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![
        TaskTemplate::new("a", "A", 1.0),
        TaskTemplate::new("b", "B", 1.0).depends_on(["a"]),
        TaskTemplate::new("c", "C", 2.0).depends_on(["b"]),
        TaskTemplate::new("d", "D", 1.0).depends_on(["c"]),
    ];
    let layout = compute_task_positions(&tasks, d(2025, 6, 2), None, &cal).unwrap();

    let a_end = layout.get("a").unwrap().end_date;
    assert_eq!(a_end, d(2025, 6, 5));
    let b = layout.get("b").unwrap();
    assert_eq!(b.start_date, cal.next_business_day(a_end).unwrap());
    assert_eq!(b.start_date, d(2025, 6, 5));

    // c ends on Sunday 06-15, so d waits for Monday.
    assert_eq!(layout.get("c").unwrap().end_date, d(2025, 6, 15));
    assert_eq!(layout.get("d").unwrap().start_date, d(2025, 6, 16));
}

#[test]
fn hard_span_is_double_easy() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![TaskTemplate::new("t", "Two units", 2.0)];
    let monday = d(2025, 6, 2);

    let easy = compute_task_positions(&tasks, monday, Some(Difficulty::Easy), &cal).unwrap();
    let hard = compute_task_positions(&tasks, monday, Some(Difficulty::Hard), &cal).unwrap();
    let easy = easy.get("t").unwrap();
    let hard = hard.get("t").unwrap();

    assert_eq!(inclusive_days(easy.start_date, easy.end_date), 7);
    assert_eq!(inclusive_days(hard.start_date, hard.end_date), 14);
}

#[test]
fn missing_difficulty_behaves_like_easy() {
    let cal = BusinessCalendar::default();
    let template = default_template();
    let none = compute_task_positions(&template, d(2025, 6, 2), None, &cal).unwrap();
    let easy =
        compute_task_positions(&template, d(2025, 6, 2), Some(Difficulty::Easy), &cal).unwrap();
    assert_eq!(none, easy);
}

#[test]
fn medium_spans_round_half_away_from_zero() {
    let cal = BusinessCalendar::weekdays_only();
    let scheduler = TaskScheduler::new(&cal);
    let scale = Difficulty::Medium.scale();
    assert_eq!(scheduler.scaled_span_days(1.0, scale), 5);
    assert_eq!(scheduler.scaled_span_days(2.0, scale), 11);
    assert_eq!(scheduler.scaled_span_days(0.0, scale), 1);
}

#[test]
fn starts_snap_forward_past_weekends() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![TaskTemplate::new("a", "A", 1.0)];
    // Saturday anchor
    let layout = compute_task_positions(&tasks, d(2025, 6, 7), None, &cal).unwrap();
    assert_eq!(layout.get("a").unwrap().start_date, d(2025, 6, 9));
}

#[test]
fn unknown_dependencies_are_ignored() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![TaskTemplate::new("a", "A", 1.0).depends_on(["ghost"])];
    let layout = compute_task_positions(&tasks, d(2025, 6, 2), None, &cal).unwrap();
    assert_eq!(layout.get("a").unwrap().start_date, d(2025, 6, 2));
}

#[test]
fn topological_mode_honours_late_listed_dependencies() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![
        TaskTemplate::new("b", "B", 1.0).depends_on(["a"]),
        TaskTemplate::new("a", "A", 1.0),
    ];

    let template_order = compute_task_positions(&tasks, d(2025, 6, 2), None, &cal).unwrap();
    assert_eq!(template_order.get("b").unwrap().start_date, d(2025, 6, 2));

    let topological = TaskScheduler::new(&cal)
        .with_resolution(DependencyResolution::Topological)
        .execute(&tasks, d(2025, 6, 2), None)
        .unwrap();
    // a: 06-02..06-05, b starts on a's last day
    assert_eq!(topological.get("a").unwrap().end_date, d(2025, 6, 5));
    assert_eq!(topological.get("b").unwrap().start_date, d(2025, 6, 5));
    // Output keeps template order.
    let ids: Vec<&str> = topological.iter().map(|p| p.task.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[test]
fn topological_mode_rejects_cycles() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![
        TaskTemplate::new("a", "A", 1.0).depends_on(["b"]),
        TaskTemplate::new("b", "B", 1.0).depends_on(["a"]),
    ];
    let result = TaskScheduler::new(&cal)
        .with_resolution(DependencyResolution::Topological)
        .execute(&tasks, d(2025, 6, 2), None);
    assert!(matches!(result, Err(PlannerError::DependencyCycle { .. })));

    // Template order tolerates the same input.
    assert!(compute_task_positions(&tasks, d(2025, 6, 2), None, &cal).is_ok());
}

#[test]
fn holiday_extension_is_capped() {
    let mut cal = BusinessCalendar::weekdays_only().with_iteration_cap(5);
    for day in 3..=20 {
        cal.add_holiday(Holiday::new(d(2025, 6, day), "Closure"));
    }
    let tasks = vec![TaskTemplate::new("a", "A", 2.0)];
    let result = compute_task_positions(&tasks, d(2025, 6, 2), None, &cal);
    assert!(matches!(
        result,
        Err(PlannerError::BusinessDayRunaway { limit: 5, .. })
    ));
}

#[test]
fn oversized_duration_is_an_error() {
    let cal = BusinessCalendar::weekdays_only();
    let tasks = vec![TaskTemplate::new("a", "A", 1e15)];
    let result = compute_task_positions(&tasks, d(2025, 6, 2), None, &cal);
    assert!(matches!(
        result,
        Err(PlannerError::DateOutOfRange { from, .. }) if from == d(2025, 6, 2)
    ));

    let result = TaskScheduler::new(&cal)
        .with_resolution(DependencyResolution::Topological)
        .execute(&[TaskTemplate::new("a", "A", f64::MAX)], d(2025, 6, 2), None);
    assert!(matches!(result, Err(PlannerError::DateOutOfRange { .. })));
}

#[test]
fn template_validation() {
    assert!(validate_template(&default_template()).is_ok());

    let duplicate = vec![TaskTemplate::new("a", "A", 1.0), TaskTemplate::new("a", "B", 1.0)];
    assert!(matches!(
        validate_template(&duplicate),
        Err(PlannerError::InvalidTemplate(_))
    ));

    let negative = vec![TaskTemplate::new("a", "A", -1.0)];
    assert!(matches!(
        validate_template(&negative),
        Err(PlannerError::InvalidTemplate(_))
    ));

    let oversized = vec![TaskTemplate::new("a", "A", MAX_TASK_DURATION + 1.0)];
    assert!(matches!(
        validate_template(&oversized),
        Err(PlannerError::InvalidTemplate(_))
    ));

    let cyclic = vec![TaskTemplate::new("a", "A", 1.0).depends_on(["a"])];
    assert!(validate_template(&cyclic).is_err());
}
