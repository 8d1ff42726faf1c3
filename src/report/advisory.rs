use std::fmt;

use super::summary::ProcessSummary;

/// Platform maximum of process exclusions per policy
pub const PROCESS_EXCLUSION_MAX: usize = 100;
/// Lowest total that triggers a caution
pub const CAUTION_THRESHOLD: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Caution,
    Warning,
}

impl Severity {
    /// Classify a policy by its total process exclusion count
    pub fn classify(total: usize) -> Option<Self> {
        if total > PROCESS_EXCLUSION_MAX {
            Some(Severity::Warning)
        } else if total >= CAUTION_THRESHOLD {
            Some(Severity::Caution)
        } else {
            None
        }
    }

    pub fn headline(self) -> String {
        match self {
            Severity::Caution => format!(
                "CAUTION: Policy has close to the maximum of {PROCESS_EXCLUSION_MAX} process exceptions."
            ),
            Severity::Warning => format!(
                "WARNING: Policy exceeds the maximum {PROCESS_EXCLUSION_MAX} process exceptions."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub severity: Severity,
    pub policy: String,
    pub total: usize,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" has {} exceptions", self.policy, self.total)
    }
}

/// Advisories for every flagged policy, cautions first, then by policy name
pub fn advisories(summary: &ProcessSummary) -> Vec<Advisory> {
    let mut flagged: Vec<Advisory> = summary
        .rows
        .iter()
        .filter_map(|row| {
            Severity::classify(row.total).map(|severity| Advisory {
                severity,
                policy: row.policy.clone(),
                total: row.total,
            })
        })
        .collect();

    flagged.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.policy.cmp(&b.policy))
    });
    flagged
}
