use crate::models::RollupRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Highest progress first; equal progress keeps encounter order.
    ByPerformance,
    /// Oldest month first, then salesperson name.
    ByMonthThenName,
}

pub fn sort_rows(rows: &mut [RollupRow], order: RowOrder) {
    match order {
        RowOrder::ByPerformance => {
            rows.sort_by(|a, b| b.progress_percent.total_cmp(&a.progress_percent));
        }
        RowOrder::ByMonthThenName => {
            rows.sort_by(|a, b| {
                a.month
                    .cmp(&b.month)
                    .then_with(|| a.salesperson_name.cmp(&b.salesperson_name))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::MonthBucket;
    use crate::status::Status;

    fn row(name: &str, progress: f64, month: Option<MonthBucket>) -> RollupRow {
        RollupRow {
            group_key: name.to_string(),
            salesperson_name: name.to_string(),
            month,
            month_label: None,
            target_total: 0.0,
            projected_total: 0.0,
            achieved_total: 0.0,
            status: Status::NotAchieved,
            status_label: Status::NotAchieved.to_string(),
            is_achieved: false,
            progress_percent: progress,
            percent_remaining: None,
        }
    }

    fn names(rows: &[RollupRow]) -> Vec<&str> {
        rows.iter()
            .map(|row| row.salesperson_name.as_str())
            .collect()
    }

    #[test]
    fn performance_sort_is_stable() {
        let mut rows = vec![
            row("first", 50.0, None),
            row("best", 100.0, None),
            row("second", 50.0, None),
            row("none", 0.0, None),
            row("third", 50.0, None),
        ];
        sort_rows(&mut rows, RowOrder::ByPerformance);
        assert_eq!(
            names(&rows),
            vec!["best", "first", "second", "third", "none"]
        );
    }

    #[test]
    fn chronological_sort_breaks_ties_by_name() {
        let jan = MonthBucket::new(2025, 1);
        let dec = MonthBucket::new(2024, 12);
        let mut rows = vec![
            row("bob", 0.0, jan),
            row("Zed", 0.0, jan),
            row("alice", 0.0, dec),
            row("Amy", 0.0, jan),
        ];
        sort_rows(&mut rows, RowOrder::ByMonthThenName);
        // Uppercase sorts before lowercase.
        assert_eq!(names(&rows), vec!["alice", "Amy", "Zed", "bob"]);
    }
}
