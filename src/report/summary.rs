use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::exclusion::{PathExclusion, ProcessExclusion, path_type_label};

pub const POLICY_NAME: &str = "Policy Name";
pub const TOTAL_EXCLUSIONS: &str = "Total Exclusions";

/// Column headers of the full process pivot, in output order
pub const PROCESS_COLUMNS: [&str; 8] = [
    POLICY_NAME,
    "File Scan",
    "File Scan Child",
    "System Process Protection",
    "System Process Protection Child",
    "Malicious Activity",
    "Malicious Activity Child",
    TOTAL_EXCLUSIONS,
];

/// Path exclusion counts per policy and type code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathSummary {
    /// Type codes present in the input, in column order
    pub type_codes: Vec<String>,
    /// One row per policy, sorted by policy name
    pub rows: Vec<PathRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRow {
    pub policy: String,
    /// Counts aligned with [`PathSummary::type_codes`]
    pub counts: Vec<usize>,
    pub total: usize,
}

impl PathSummary {
    pub fn build(paths: &[PathExclusion]) -> Self {
        let mut codes: BTreeSet<&str> = BTreeSet::new();
        let mut per_policy: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();

        for path in paths {
            codes.insert(&path.type_code);
            *per_policy
                .entry(&path.policy.name)
                .or_default()
                .entry(&path.type_code)
                .or_default() += 1;
        }

        let mut type_codes: Vec<&str> = codes.into_iter().collect();
        type_codes.sort_by_key(|code| code_order(code));

        let rows = per_policy
            .into_iter()
            .map(|(policy, by_code)| {
                let counts: Vec<usize> = type_codes
                    .iter()
                    .map(|code| by_code.get(code).copied().unwrap_or(0))
                    .collect();
                PathRow {
                    policy: policy.to_string(),
                    total: counts.iter().sum(),
                    counts,
                }
            })
            .collect();

        Self {
            type_codes: type_codes.into_iter().map(String::from).collect(),
            rows,
        }
    }

    /// Header row with type codes replaced by their labels
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(POLICY_NAME.to_string())
            .chain(
                self.type_codes
                    .iter()
                    .map(|code| path_type_label(code).to_string()),
            )
            .chain(std::iter::once(TOTAL_EXCLUSIONS.to_string()))
            .collect()
    }

    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.policy.clone())
                    .chain(row.counts.iter().map(usize::to_string))
                    .chain(std::iter::once(row.total.to_string()))
                    .collect()
            })
            .collect()
    }
}

/// Numeric codes first in numeric order, anything else after them
fn code_order(code: &str) -> (bool, u64, String) {
    match code.parse::<u64>() {
        Ok(n) => (false, n, String::new()),
        Err(_) => (true, 0, code.to_string()),
    }
}

/// Process exclusion counts per policy and protection capability
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessSummary {
    /// One row per policy, sorted by policy name
    pub rows: Vec<ProcessRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProcessRow {
    #[serde(rename = "Policy Name")]
    pub policy: String,
    /// Exclusions whose raw flag is in `[0, 3)`
    #[serde(rename = "File Scan")]
    pub file_scan: usize,
    #[serde(rename = "File Scan Child")]
    pub file_scan_child: usize,
    #[serde(rename = "System Process Protection")]
    pub system_process_protection: usize,
    #[serde(rename = "System Process Protection Child")]
    pub system_process_protection_child: usize,
    #[serde(rename = "Malicious Activity")]
    pub malicious_activity: usize,
    #[serde(rename = "Malicious Activity Child")]
    pub malicious_activity_child: usize,
    #[serde(rename = "Total Exclusions")]
    pub total: usize,
}

impl ProcessRow {
    fn add(&mut self, process: &ProcessExclusion) {
        let flags = &process.flags;
        self.total += 1;
        self.file_scan += usize::from(process.is_file_scan());
        self.file_scan_child += usize::from(flags.file_scan_children);
        self.system_process_protection += usize::from(flags.system_process_protection);
        self.system_process_protection_child +=
            usize::from(flags.system_process_protection_children);
        self.malicious_activity += usize::from(flags.malicious_activity);
        self.malicious_activity_child += usize::from(flags.malicious_activity_children);
    }
}

impl ProcessSummary {
    pub fn build(processes: &[ProcessExclusion]) -> Self {
        let mut per_policy: BTreeMap<&str, ProcessRow> = BTreeMap::new();

        for process in processes {
            per_policy
                .entry(&process.policy.name)
                .or_insert_with(|| ProcessRow {
                    policy: process.policy.name.clone(),
                    ..Default::default()
                })
                .add(process);
        }

        Self {
            rows: per_policy.into_values().collect(),
        }
    }

    /// Console headers: child columns dropped, the rest abbreviated
    pub fn display_headers(&self) -> Vec<String> {
        [POLICY_NAME, "FS", "SPP", "MA", TOTAL_EXCLUSIONS]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    pub fn display_records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.policy.clone(),
                    row.file_scan.to_string(),
                    row.system_process_protection.to_string(),
                    row.malicious_activity.to_string(),
                    row.total.to_string(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::PolicyRef;

    fn path(policy: &str, code: &str) -> PathExclusion {
        let policy = PolicyRef::new(policy, format!("guid-{policy}"));
        PathExclusion::parse(&policy, &format!("1|{code}|0|0|C:\\x")).unwrap()
    }

    fn process(policy: &str, flag: i32) -> ProcessExclusion {
        let policy = PolicyRef::new(policy, format!("guid-{policy}"));
        ProcessExclusion::parse(&policy, &format!("1|0|hash|C:\\p.exe|{flag}")).unwrap()
    }

    fn fixture() -> (Vec<PathExclusion>, Vec<ProcessExclusion>) {
        let paths = vec![
            path("Servers", "2"),
            path("Audit", "3"),
            path("Servers", "2"),
            path("Audit", "1"),
            path("Servers", "10"),
            path("Audit", "3"),
            path("Servers", "6"),
        ];
        let processes = vec![
            process("Audit", 0),
            process("Servers", 7),
            process("Audit", 2),
            process("Audit", 3),
            process("Servers", 52),
        ];
        (paths, processes)
    }

    #[test]
    fn path_summary_counts_per_policy_and_type() {
        let (paths, _) = fixture();
        let summary = PathSummary::build(&paths);

        assert_eq!(summary.type_codes, vec!["1", "2", "3", "6", "10"]);
        assert_eq!(
            summary.headers(),
            vec![
                "Policy Name",
                "Threat",
                "Path",
                "File Extension",
                "Wildcard",
                "10",
                "Total Exclusions"
            ]
        );
        assert_eq!(
            summary.rows,
            vec![
                PathRow {
                    policy: "Audit".to_string(),
                    counts: vec![1, 0, 2, 0, 0],
                    total: 3,
                },
                PathRow {
                    policy: "Servers".to_string(),
                    counts: vec![0, 2, 0, 1, 1],
                    total: 4,
                },
            ]
        );
        assert_eq!(
            summary.records()[0],
            vec!["Audit", "1", "0", "2", "0", "0", "3"]
        );
    }

    #[test]
    fn path_row_sums_match_record_counts() {
        let (paths, _) = fixture();
        let summary = PathSummary::build(&paths);

        for row in &summary.rows {
            let expected = paths.iter().filter(|p| p.policy.name == row.policy).count();
            assert_eq!(row.counts.iter().sum::<usize>(), expected);
            assert_eq!(row.total, expected);
        }
    }

    #[test]
    fn process_summary_pivots_flags() {
        let (_, processes) = fixture();
        let summary = ProcessSummary::build(&processes);

        assert_eq!(
            summary.rows,
            vec![
                ProcessRow {
                    policy: "Audit".to_string(),
                    // flags 0 and 2 are in [0, 3)
                    file_scan: 2,
                    // bit 1 set in 2 and 3
                    file_scan_child: 2,
                    system_process_protection: 0,
                    system_process_protection_child: 0,
                    malicious_activity: 0,
                    malicious_activity_child: 0,
                    total: 3,
                },
                ProcessRow {
                    policy: "Servers".to_string(),
                    file_scan: 0,
                    file_scan_child: 1,
                    // 7 = 0b111, 52 = 0b110100
                    system_process_protection: 2,
                    system_process_protection_child: 0,
                    malicious_activity: 1,
                    malicious_activity_child: 1,
                    total: 2,
                },
            ]
        );
    }

    #[test]
    fn process_totals_match_record_counts() {
        let (_, processes) = fixture();
        let summary = ProcessSummary::build(&processes);

        for row in &summary.rows {
            let expected = processes
                .iter()
                .filter(|p| p.policy.name == row.policy)
                .count();
            assert_eq!(row.total, expected);
        }
    }

    #[test]
    fn process_display_view_drops_child_columns() {
        let (_, processes) = fixture();
        let summary = ProcessSummary::build(&processes);

        assert_eq!(
            summary.display_headers(),
            vec!["Policy Name", "FS", "SPP", "MA", "Total Exclusions"]
        );
        assert_eq!(
            summary.display_records(),
            vec![
                vec!["Audit", "2", "0", "0", "3"],
                vec!["Servers", "0", "2", "1", "2"],
            ]
        );
    }

    #[test]
    fn aggregation_is_idempotent_and_order_independent() {
        let (paths, processes) = fixture();
        let mut reversed_paths = paths.clone();
        reversed_paths.reverse();
        let mut reversed_processes = processes.clone();
        reversed_processes.reverse();

        assert_eq!(PathSummary::build(&paths), PathSummary::build(&paths));
        assert_eq!(PathSummary::build(&paths), PathSummary::build(&reversed_paths));
        assert_eq!(
            ProcessSummary::build(&processes),
            ProcessSummary::build(&processes)
        );
        assert_eq!(
            ProcessSummary::build(&processes),
            ProcessSummary::build(&reversed_processes)
        );
    }

    #[test]
    fn empty_input_builds_empty_summaries() {
        assert_eq!(PathSummary::build(&[]), PathSummary::default());
        assert_eq!(ProcessSummary::build(&[]), ProcessSummary::default());
        assert_eq!(
            PathSummary::default().headers(),
            vec!["Policy Name", "Total Exclusions"]
        );
    }
}
