use std::fmt::Write;

use crate::models::{AchievementRecord, RollupRow, TargetRecord};
use crate::normalize::MonthLabel;
use crate::rollup::{self, RecordFilter, View};
use crate::status::Tone;

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "[+]",
        Tone::Caution => "[~]",
        Tone::Negative => "[-]",
        Tone::Muted => "[ ]",
    }
}

fn row_name(row: &RollupRow) -> String {
    match &row.month_label {
        Some(month) => format!("{} ({})", row.salesperson_name, month),
        None => row.salesperson_name.clone(),
    }
}

/// Plain text lines for the terminal.
pub fn render_lines(rows: &[RollupRow], view: View, limit: usize) -> String {
    let mut output = String::new();

    if rows.is_empty() {
        let _ = writeln!(output, "No records found for this selection.");
        return output;
    }

    let _ = writeln!(output, "{}:", view.title());
    for row in rows.iter().take(limit) {
        let _ = write!(
            output,
            "- {} {} target {:.2}, projected {:.2}, achieved {:.2}, {:.1}% {}",
            marker(row.status.tone()),
            row_name(row),
            row.target_total,
            row.projected_total,
            row.achieved_total,
            row.progress_percent,
            row.status_label
        );
        if let Some(remaining) = row.percent_remaining {
            let _ = write!(output, ", {remaining:.1}% remaining");
        }
        let _ = writeln!(output);
    }

    output
}

fn write_table(output: &mut String, rows: &[RollupRow], view: View) {
    if rows.is_empty() {
        let _ = writeln!(output, "No records for this view.");
        return;
    }

    let with_remaining = rows.iter().any(|row| row.percent_remaining.is_some());
    let _ = write!(
        output,
        "| Salesperson | Target | Projected | Achieved | Progress | Status |"
    );
    if with_remaining {
        let _ = write!(output, " Remaining |");
    }
    let _ = writeln!(output);
    let _ = write!(output, "|---|---:|---:|---:|---:|---|");
    if with_remaining {
        let _ = write!(output, "---:|");
    }
    let _ = writeln!(output);

    for row in rows {
        let _ = write!(
            output,
            "| {} | {:.2} | {:.2} | {:.2} | {:.1}% | {} {} |",
            row_name(row),
            row.target_total,
            row.projected_total,
            row.achieved_total,
            row.progress_percent,
            marker(row.status.tone()),
            row.status_label
        );
        if let Some(remaining) = row.percent_remaining {
            let _ = write!(output, " {remaining:.1}% |");
        }
        let _ = writeln!(output);
    }

    let achieved = rows.iter().filter(|row| row.is_achieved).count();
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{} of {} {} met their goal.",
        achieved,
        rows.len(),
        row_unit(view)
    );
}

fn row_unit(view: View) -> &'static str {
    match view {
        View::Monthly => "salesperson-months",
        View::Performance | View::Pipeline => "salespeople",
    }
}

pub fn build_report(
    targets: &[TargetRecord],
    achievements: &[AchievementRecord],
    filter: &RecordFilter,
    label: MonthLabel,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Business Performance Report");
    let mut scope = Vec::new();
    if let Some(salesperson) = &filter.salesperson {
        scope.push(format!("salesperson {salesperson}"));
    }
    if let Some(month) = filter.month {
        scope.push(format!("month {}", month.label(label)));
    }
    let scope = if scope.is_empty() {
        "all salespeople".to_string()
    } else {
        scope.join(", ")
    };
    let _ = writeln!(
        output,
        "Generated for {} from {} projections and {} inquiries",
        scope,
        targets.len(),
        achievements.len()
    );

    for view in [View::Performance, View::Pipeline, View::Monthly] {
        let rows = rollup::compute_filtered(targets, achievements, view, label, filter);
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", view.title());
        write_table(&mut output, &rows, view);
    }

    output
}
