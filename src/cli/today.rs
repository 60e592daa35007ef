//! `td today`: overdue tasks and tasks due today

use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde_json::json;

use super::output::Output;
use super::task::{project_names, task_row};
use crate::api::{Api, TaskFilter};
use crate::domain::Task;
use crate::resolve::list_tasks;

pub fn run(api: &impl Api, output: &Output) -> Result<()> {
    report(api, output, Local::now().date_naive())
}

/// Splits active tasks into overdue and due-on-`today`, preserving order
fn agenda(tasks: Vec<Task>, today: NaiveDate) -> (Vec<Task>, Vec<Task>) {
    let (overdue, rest): (Vec<Task>, Vec<Task>) =
        tasks.into_iter().partition(|t| t.is_overdue(today));
    let due_today = rest.into_iter().filter(|t| t.is_due_on(today)).collect();
    (overdue, due_today)
}

fn report(api: &impl Api, output: &Output, today: NaiveDate) -> Result<()> {
    let tasks = list_tasks(api, &TaskFilter::default())?;
    let (overdue, due_today) = agenda(tasks, today);

    if output.is_json() {
        output.data(&json!({ "overdue": overdue, "today": due_today }));
        return Ok(());
    }

    if overdue.is_empty() && due_today.is_empty() {
        println!("No tasks due today.");
        return Ok(());
    }

    let projects = project_names(api)?;
    let row = |task: &Task| {
        task_row(output, task, projects.get(&task.project_id).map(String::as_str))
    };

    if !overdue.is_empty() {
        println!("{}", output.red(&format!("Overdue ({})", overdue.len())));
        for task in &overdue {
            println!("{}", row(task));
        }
        println!();
    }

    println!("{}", output.bold(&format!("Today ({})", due_today.len())));
    for task in &due_today {
        println!("{}", row(task));
    }

    Ok(())
}
