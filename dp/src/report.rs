//! Plain-terminal plan output for the `generate` subcommand

use colored::{ColoredString, Colorize};
use daytypes::{Plan, PlanRequest, PlanResponse, Priority};
use eyre::Result;

use crate::tui::plan_rows;

const HEADERS: [&str; 6] = ["TIME", "ACTIVITY", "DESCRIPTION", "DURATION", "PRIORITY", "DONE"];

fn paint_priority(label: &str, priority: Priority) -> ColoredString {
    match priority {
        Priority::High => label.red().bold(),
        Priority::Medium => label.yellow(),
        Priority::Low => label.green(),
    }
}

/// Render the plan as an aligned, colored table
pub fn format_table(request: &PlanRequest, plan: &Plan) -> String {
    let rows = plan_rows(plan);

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{} {} mood, energy {}/5, {}h for {}\n\n",
        "Plan:".bright_cyan().bold(),
        request.mood,
        request.energy,
        request.available_time,
        request.goals_label()
    ));

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    out.push_str(&format!("{}\n", header.join("  ").bold()));

    for (cells, item) in rows.iter().zip(plan.iter()) {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect();
        let line = format!(
            "{}  {}  {}  {}  {}  {}",
            padded[0],
            padded[1],
            padded[2].dimmed(),
            padded[3],
            paint_priority(&padded[4], item.priority),
            padded[5]
        );
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} activities, {} min scheduled of {} min available\n",
        plan.len(),
        plan.total_minutes(),
        request.minute_budget()
    ));
    out
}

/// The plan in the service's response shape
pub fn format_json(plan: &Plan) -> Result<String> {
    let response = PlanResponse { plan: plan.clone() };
    Ok(serde_json::to_string_pretty(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daytypes::{Goal, Mood, PlanItem};

    fn fixture() -> (PlanRequest, Plan) {
        let request = PlanRequest::new(Mood::Focused, 4, 8.0, [Goal::Work, Goal::Exercise]).unwrap();
        let plan = Plan::new(vec![
            PlanItem::new("09:00", "Deep work", "Focus block", 120, Priority::High),
            PlanItem::new("11:00", "Run", "Easy 5k", 30, Priority::Low),
        ]);
        (request, plan)
    }

    #[test]
    fn test_format_table() {
        colored::control::set_override(false);
        let (request, plan) = fixture();

        let out = format_table(&request, &plan);

        assert!(out.starts_with("Plan: focused mood, energy 4/5, 8h for work, exercise"));
        assert!(out.contains("TIME   ACTIVITY   DESCRIPTION  DURATION  PRIORITY  DONE"));
        assert!(out.contains("09:00  Deep work  Focus block  120 min   High      [ ]"));
        assert!(out.contains("2 activities, 150 min scheduled of 480 min available"));
    }

    #[test]
    fn test_format_json() {
        let (_, plan) = fixture();
        let value: serde_json::Value = serde_json::from_str(&format_json(&plan).unwrap()).unwrap();
        assert_eq!(value["plan"][0]["activity"], "Deep work");
        assert_eq!(value["plan"][0]["priority"], 1);
        assert_eq!(value["plan"][1]["completed"], false);
    }
}
