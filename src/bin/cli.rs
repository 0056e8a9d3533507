use chrono::NaiveDate;
use goal_planner::dates::{format_date, parse_date};
use goal_planner::{
    BusinessCalendar, Difficulty, Goal, HolidayOverlay, PlannerConfig, Priority, PriorityOnReorder,
    SchedulingContext,
    calculate_weighted_completion, can_complete_task, generate_holidays, load_goals_from_json,
    move_goal, portfolio_progress, save_goals_to_json, save_schedule_to_csv,
};
use std::collections::HashMap;
use std::io::{self, Write};

struct Session {
    ctx: SchedulingContext,
    goals: Vec<Goal>,
    anchor: NaiveDate,
    completed: HashMap<String, Vec<String>>,
}

impl Session {
    fn new(config: PlannerConfig) -> Self {
        let anchor = config.default_anchor;
        Self {
            ctx: SchedulingContext::from_config(config),
            goals: Vec::new(),
            anchor,
            completed: HashMap::new(),
        }
    }

    fn reschedule(&mut self) -> bool {
        match self.ctx.schedule_goals(&mut self.goals, self.anchor) {
            Ok(()) => true,
            Err(e) => {
                println!("Scheduling error: {}", e);
                false
            }
        }
    }

    fn find_goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    fn display_order(&self) -> Vec<usize> {
        goal_planner::goal_scheduler::top_level_order(&self.goals)
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers.iter().copied(), &widths));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

fn render_goals(session: &Session) -> String {
    let mut rows = Vec::new();
    let mut push = |goal: &Goal, label: String| {
        rows.push(vec![
            label,
            goal.id.clone(),
            goal.title.clone(),
            goal.priority.map(|p| p.to_string()).unwrap_or_default(),
            goal.effective_difficulty().to_string(),
            optional_date(goal.scheduled_start_date),
            optional_date(goal.scheduled_end_date),
            optional_date(goal.completed_date),
        ]);
    };
    for (position, idx) in session.display_order().into_iter().enumerate() {
        let goal = &session.goals[idx];
        push(goal, position.to_string());
        for child in session
            .goals
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(goal.id.as_str()))
        {
            push(child, "  -".to_string());
        }
    }
    render_table(
        &["#", "id", "title", "priority", "difficulty", "start", "end", "completed"],
        &rows,
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                                   Show this help\n  show                                   Show scheduled goals\n  add <id> <difficulty> <priority> <title...>\n                                         Add a top-level goal\n  child <id> <parent_id> <difficulty> <title...>\n                                         Add a child goal\n  done <id> <YYYY-MM-DD>                 Mark a goal completed\n  anchor <YYYY-MM-DD>                    Set the anchor date\n  holidays <from_year> <to_year>         Regenerate the holiday calendar\n  schedule                               Recompute all goal dates\n  tasks <goal_id>                        Show the task layout for a goal\n  complete <goal_id> <task_id>           Check off a task\n  progress                               Show completion for every goal\n  gantt <goal_id>                        Show the weekly grid for a goal\n  move <from> <to> [adopt]               Reorder top-level goals\n  load json <path>                       Load goals from JSON\n  save <json|csv> <path>                 Save goals\n  quit|exit                              Exit"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = match std::env::var("GOAL_PLANNER_CONFIG") {
        Ok(path) => match PlannerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config {path}: {e}; using defaults");
                PlannerConfig::default()
            }
        },
        Err(_) => PlannerConfig::default(),
    };
    let mut session = Session::new(config);

    println!("Goal Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_goals(&session)),
            "schedule" => {
                if session.reschedule() {
                    println!("Scheduled from {}.", session.anchor);
                    println!("{}", render_goals(&session));
                }
            }
            "add" | "child" => {
                let fields: Vec<&str> = parts.by_ref().take(3).collect();
                let title = parts.collect::<Vec<_>>().join(" ");
                let goal = match (cmd, fields.as_slice()) {
                    ("add", &[id, difficulty, priority]) => {
                        let mut goal = Goal::new(id, title);
                        goal.difficulty = difficulty.parse::<Difficulty>().ok();
                        goal.priority = priority.parse::<Priority>().ok();
                        goal
                    }
                    ("child", &[id, parent_id, difficulty]) => {
                        let mut goal = Goal::new(id, title).with_parent(parent_id);
                        goal.difficulty = difficulty.parse::<Difficulty>().ok();
                        goal
                    }
                    ("add", _) => {
                        println!("Usage: add <id> <difficulty> <priority> <title...>");
                        continue;
                    }
                    _ => {
                        println!("Usage: child <id> <parent_id> <difficulty> <title...>");
                        continue;
                    }
                };
                let id = goal.id.clone();
                if session.find_goal(&id).is_some() {
                    println!("Goal {id} already exists.");
                    continue;
                }
                session.goals.push(goal);
                if session.reschedule() {
                    println!("Goal {id} added.");
                    println!("{}", render_goals(&session));
                }
            }
            "done" => {
                let (Some(id), Some(date_s)) = (parts.next(), parts.next()) else {
                    println!("Usage: done <id> <YYYY-MM-DD>");
                    continue;
                };
                let date = match parse_date(date_s) {
                    Ok(d) => d,
                    Err(_) => {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    }
                };
                match session.goals.iter_mut().find(|goal| goal.id == id) {
                    Some(goal) => goal.completed_date = Some(date),
                    None => {
                        println!("Goal {id} not found.");
                        continue;
                    }
                }
                if session.reschedule() {
                    println!("Goal {id} completed on {date}.");
                    println!("{}", render_goals(&session));
                }
            }
            "anchor" => {
                session.anchor = session.ctx.resolve_anchor(parts.next());
                if session.reschedule() {
                    println!("Anchor set to {}.", session.anchor);
                }
            }
            "holidays" => {
                let years = (
                    parts.next().and_then(|s| s.parse::<i32>().ok()),
                    parts.next().and_then(|s| s.parse::<i32>().ok()),
                );
                let (Some(from), Some(to)) = years else {
                    println!("Usage: holidays <from_year> <to_year>");
                    continue;
                };
                let holidays = generate_holidays(from, to);
                let mut config = session.ctx.config().clone();
                config.holiday_years = (from, to);
                let calendar =
                    BusinessCalendar::from_holidays(&holidays).with_iteration_cap(config.iteration_cap);
                session.ctx = SchedulingContext::new(calendar, config);
                println!("Loaded {} holiday entries for {from}-{to}.", holidays.len());
                session.reschedule();
            }
            "tasks" => {
                let Some(goal) = parts.next().and_then(|id| session.find_goal(id)) else {
                    println!("Usage: tasks <goal_id> (goal must exist)");
                    continue;
                };
                let Some(start) = goal.scheduled_start_date else {
                    println!("Goal {} is not scheduled.", goal.id);
                    continue;
                };
                let layout = match session.ctx.task_layout(start, goal.difficulty) {
                    Ok(layout) => layout,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let empty = Vec::new();
                let completed = session.completed.get(&goal.id).unwrap_or(&empty).as_slice();
                let rows: Vec<Vec<String>> = layout
                    .iter()
                    .map(|p| {
                        let state = if completed.contains(&p.task.id) {
                            "done"
                        } else if can_complete_task(&p.task.id, &layout, completed) {
                            "ready"
                        } else {
                            "blocked"
                        };
                        vec![
                            p.task.id.clone(),
                            p.task.name.clone(),
                            if p.task.is_approval { "approval" } else { "task" }.to_string(),
                            format_date(p.start_date),
                            format_date(p.end_date),
                            state.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    render_table(&["task", "name", "kind", "start", "end", "state"], &rows)
                );
                let weights = session.ctx.config().completion_weights;
                println!(
                    "Completion: {}%",
                    calculate_weighted_completion(&layout, completed, weights)
                );
            }
            "complete" => {
                let (Some(goal_id), Some(task_id)) = (parts.next(), parts.next()) else {
                    println!("Usage: complete <goal_id> <task_id>");
                    continue;
                };
                let Some(goal) = session.find_goal(goal_id) else {
                    println!("Goal {goal_id} not found.");
                    continue;
                };
                let Some(start) = goal.scheduled_start_date else {
                    println!("Goal {goal_id} is not scheduled.");
                    continue;
                };
                let layout = match session.ctx.task_layout(start, goal.difficulty) {
                    Ok(layout) => layout,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let done = session.completed.entry(goal_id.to_string()).or_default();
                if !layout.contains(task_id) {
                    println!("Task {task_id} is not part of the template.");
                } else if done.iter().any(|t| t == task_id) {
                    println!("Task {task_id} already completed.");
                } else if !can_complete_task(task_id, &layout, done.as_slice()) {
                    println!("Task {task_id} is blocked by unfinished dependencies.");
                } else {
                    done.push(task_id.to_string());
                    let weights = session.ctx.config().completion_weights;
                    println!(
                        "Task {task_id} completed. {goal_id} is {}% complete.",
                        calculate_weighted_completion(&layout, done.as_slice(), weights)
                    );
                }
            }
            "progress" => match portfolio_progress(&session.goals, &session.completed, &session.ctx) {
                Ok(progress) => {
                    let rows: Vec<Vec<String>> = progress
                        .iter()
                        .map(|p| {
                            vec![
                                p.goal_id.clone(),
                                format!("{}%", p.percent),
                                p.next_completable.join(","),
                            ]
                        })
                        .collect();
                    println!("{}", render_table(&["goal", "complete", "next"], &rows));
                }
                Err(e) => println!("Error: {}", e),
            },
            "gantt" => {
                let Some(goal) = parts.next().and_then(|id| session.find_goal(id)) else {
                    println!("Usage: gantt <goal_id> (goal must exist)");
                    continue;
                };
                match session.ctx.gantt_for(goal) {
                    Ok(Some(grid)) => {
                        let mut headers = vec!["task".to_string()];
                        headers.extend(grid.weeks.iter().map(|w| {
                            let marker = match w.overlay {
                                HolidayOverlay::Full => "*",
                                HolidayOverlay::Partial => "+",
                                HolidayOverlay::None => "",
                            };
                            format!("W{}{}", w.index, marker)
                        }));
                        let rows: Vec<Vec<String>> = grid
                            .rows
                            .iter()
                            .map(|row| {
                                let mut cells = vec![row.task_id.clone()];
                                cells.extend(row.cells.iter().map(|c| format!("{:.2}", c)));
                                cells
                            })
                            .collect();
                        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
                        println!("{}", render_table(&header_refs, &rows));
                    }
                    Ok(None) => println!("Goal {} is not scheduled.", goal.id),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "move" => {
                let from = parts.next().and_then(|s| s.parse::<usize>().ok());
                let to = parts.next().and_then(|s| s.parse::<usize>().ok());
                let policy = match parts.next() {
                    Some("adopt") => PriorityOnReorder::AdoptNeighbor,
                    _ => PriorityOnReorder::Keep,
                };
                let (Some(from), Some(to)) = (from, to) else {
                    println!("Usage: move <from> <to> [adopt]");
                    continue;
                };
                // Reorder the top-level goals as displayed; children keep their slots.
                let order = session.display_order();
                let mut top_level: Vec<Goal> =
                    order.iter().map(|&idx| session.goals[idx].clone()).collect();
                if let Err(e) = move_goal(&mut top_level, from, to, policy) {
                    println!("Error: {}", e);
                    continue;
                }
                let children = session.goals.iter().filter(|g| g.is_child()).cloned();
                session.goals = top_level.into_iter().chain(children).collect();
                if session.reschedule() {
                    println!("Moved goal from {from} to {to}.");
                    println!("{}", render_goals(&session));
                }
            }
            "load" => {
                let (Some("json"), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: load json <path>");
                    continue;
                };
                match load_goals_from_json(path) {
                    Ok(goals) => {
                        session.goals = goals;
                        session.completed.clear();
                        if session.reschedule() {
                            println!("Goals loaded from {path}.");
                            println!("{}", render_goals(&session));
                        }
                    }
                    Err(e) => println!("Error loading goals: {}", e),
                }
            }
            "save" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: save <json|csv> <path>");
                    continue;
                };
                let result = match format {
                    "json" => save_goals_to_json(&session.goals, path),
                    "csv" => save_schedule_to_csv(&session.goals, path),
                    _ => {
                        println!("Unknown format '{format}' (expected json or csv)");
                        continue;
                    }
                };
                match result {
                    Ok(()) => println!("Goals saved to {path}."),
                    Err(e) => println!("Error saving goals: {}", e),
                }
            }
            other => println!("Unknown command '{other}'. Type 'help'."),
        }
    }
}
