use std::fmt;

use serde::Serialize;

use crate::models::Aggregate;

/// Which total the achieved amount is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Target,
    Projected,
}

impl Basis {
    pub fn total(&self, aggregate: &Aggregate) -> f64 {
        match self {
            Self::Target => aggregate.target_total,
            Self::Projected => aggregate.projected_total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Achieved,
    PartiallyAchieved,
    NotAchieved,
    NoTarget,
}

/// Presentation hint for a status. Renderers map this to icons or colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Negative,
    Muted,
}

impl Status {
    pub fn label(&self, basis: Basis) -> &'static str {
        match (self, basis) {
            (Self::Achieved, _) => "Achieved",
            (Self::PartiallyAchieved, _) => "Partially Achieved",
            (Self::NotAchieved, _) => "Not Achieved",
            (Self::NoTarget, Basis::Target) => "No Target",
            (Self::NoTarget, Basis::Projected) => "No data",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Achieved => Tone::Positive,
            Self::PartiallyAchieved => Tone::Caution,
            Self::NotAchieved => Tone::Negative,
            Self::NoTarget => Tone::Muted,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Basis::Target))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub status: Status,
    pub basis: Basis,
    /// Always within 0..=100.
    pub progress_percent: f64,
    pub is_achieved: bool,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        self.status.label(self.basis)
    }
}

pub fn classify(aggregate: &Aggregate, basis: Basis) -> Classification {
    let total = basis.total(aggregate);
    let achieved = aggregate.achieved_total;

    let (status, progress_percent) = if total <= 0.0 {
        (Status::NoTarget, 0.0)
    } else if achieved >= total {
        (Status::Achieved, 100.0)
    } else if achieved > 0.0 {
        (Status::PartiallyAchieved, achieved / total * 100.0)
    } else {
        (Status::NotAchieved, 0.0)
    };

    Classification {
        status,
        basis,
        progress_percent,
        is_achieved: status == Status::Achieved,
    }
}

/// Share of the basis still outstanding. Never negative; 0 with no basis.
pub fn percent_remaining(aggregate: &Aggregate, basis: Basis) -> f64 {
    let total = basis.total(aggregate);
    if total <= 0.0 {
        return 0.0;
    }

    ((total - aggregate.achieved_total) / total * 100.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupKey;

    fn aggregate(target: f64, projected: f64, achieved: f64) -> Aggregate {
        Aggregate {
            key: GroupKey {
                person: "A".to_string(),
                month: None,
            },
            salesperson_name: "A".to_string(),
            target_total: target,
            projected_total: projected,
            achieved_total: achieved,
        }
    }

    #[test]
    fn met_target_is_capped_at_hundred() {
        let result = classify(&aggregate(100.0, 120.0, 100.0), Basis::Target);
        assert_eq!(result.status, Status::Achieved);
        assert_eq!(result.progress_percent, 100.0);
        assert!(result.is_achieved);

        let result = classify(&aggregate(100.0, 0.0, 250.0), Basis::Target);
        assert_eq!(result.progress_percent, 100.0);
        assert_eq!(
            percent_remaining(&aggregate(100.0, 0.0, 250.0), Basis::Target),
            0.0
        );
    }

    #[test]
    fn partial_progress_is_a_ratio() {
        let result = classify(&aggregate(200.0, 0.0, 50.0), Basis::Target);
        assert_eq!(result.status, Status::PartiallyAchieved);
        assert_eq!(result.label(), "Partially Achieved");
        assert_eq!(result.progress_percent, 25.0);
        assert!(!result.is_achieved);
        assert_eq!(
            percent_remaining(&aggregate(200.0, 0.0, 50.0), Basis::Target),
            75.0
        );
    }

    #[test]
    fn nothing_achieved() {
        let result = classify(&aggregate(100.0, 0.0, 0.0), Basis::Target);
        assert_eq!(result.status, Status::NotAchieved);
        assert_eq!(result.progress_percent, 0.0);
        assert_eq!(
            percent_remaining(&aggregate(100.0, 0.0, 0.0), Basis::Target),
            100.0
        );
    }

    #[test]
    fn zero_basis_never_divides() {
        let result = classify(&aggregate(0.0, 80.0, 50.0), Basis::Target);
        assert_eq!(result.status, Status::NoTarget);
        assert_eq!(result.label(), "No Target");
        assert_eq!(result.progress_percent, 0.0);
        assert!(!result.is_achieved);
        assert_eq!(
            percent_remaining(&aggregate(0.0, 80.0, 50.0), Basis::Target),
            0.0
        );

        let result = classify(&aggregate(500.0, 0.0, 50.0), Basis::Projected);
        assert_eq!(result.label(), "No data");
        assert_eq!(result.progress_percent, 0.0);
    }

    #[test]
    fn basis_selects_the_denominator() {
        let totals = aggregate(100.0, 400.0, 100.0);
        assert!(classify(&totals, Basis::Target).is_achieved);
        let pipeline = classify(&totals, Basis::Projected);
        assert_eq!(pipeline.status, Status::PartiallyAchieved);
        assert_eq!(pipeline.progress_percent, 25.0);
    }

    #[test]
    fn tones_follow_status() {
        assert_eq!(Status::Achieved.tone(), Tone::Positive);
        assert_eq!(Status::NoTarget.tone(), Tone::Muted);
        assert_eq!(Status::NotAchieved.to_string(), "Not Achieved");
    }
}
