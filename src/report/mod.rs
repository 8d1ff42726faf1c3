pub mod advisory;
pub mod summary;
pub mod table;

use std::path::{Path, PathBuf};

use crate::{
    collector::Collection,
    error::AmpError,
    exclusion::{PathExclusion, ProcessExclusion},
};

pub use advisory::{Advisory, Severity, advisories};
pub use summary::{PROCESS_COLUMNS, PathRow, PathSummary, ProcessRow, ProcessSummary};
pub use table::render_table;

pub const PATH_CSV: &str = "path_exclusions.csv";
pub const PROCESS_CSV: &str = "process_exclusions.csv";

/// Summaries and advisories computed from one run's exclusions
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub paths: PathSummary,
    pub processes: ProcessSummary,
    pub advisories: Vec<Advisory>,
}

impl Report {
    pub fn build(paths: &[PathExclusion], processes: &[ProcessExclusion]) -> Self {
        log::debug!("Creating path exclusion summary");
        let paths = PathSummary::build(paths);

        log::debug!("Creating process exclusion summary");
        let processes = ProcessSummary::build(processes);
        let advisories = advisories(&processes);

        Self {
            paths,
            processes,
            advisories,
        }
    }

    pub fn from_collection(collection: &Collection) -> Self {
        Self::build(&collection.paths, &collection.processes)
    }

    /// Write the path matrix and the full process pivot as CSV
    ///
    /// Returns the paths of the written files.
    pub fn write_csv(&self, output_dir: &Path) -> Result<(PathBuf, PathBuf), AmpError> {
        log::debug!("Saving exclusion summary files to {}", output_dir.display());

        let path_csv = output_dir.join(PATH_CSV);
        let mut writer = csv::Writer::from_path(&path_csv)?;
        writer.write_record(self.paths.headers())?;
        for record in self.paths.records() {
            writer.write_record(&record)?;
        }
        writer.flush()?;

        let process_csv = output_dir.join(PROCESS_CSV);
        let mut writer = csv::Writer::from_path(&process_csv)?;
        if self.processes.rows.is_empty() {
            writer.write_record(PROCESS_COLUMNS)?;
        }
        for row in &self.processes.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok((path_csv, process_csv))
    }

    /// Console rendering: both tables, the abbreviation legend and advisories
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Path exclusion count for policy by type\n");
        out.push_str(&render_table(&self.paths.headers(), &self.paths.records()));
        out.push_str("\n\n");

        out.push_str("Process exclusion types by policy\n");
        out.push_str(&render_table(
            &self.processes.display_headers(),
            &self.processes.display_records(),
        ));
        out.push('\n');
        out.push_str("    FS = File Scan\n");
        out.push_str("    SPP = System Process Protection\n");
        out.push_str("    MA = Malicious Activity\n\n");

        for severity in [Severity::Caution, Severity::Warning] {
            let mut flagged = self
                .advisories
                .iter()
                .filter(|a| a.severity == severity)
                .peekable();
            if flagged.peek().is_none() {
                continue;
            }
            out.push_str(&severity.headline());
            out.push('\n');
            for advisory in flagged {
                out.push_str(&format!("         {advisory}\n"));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::PolicyRef;
    use std::fs;

    fn processes(policy: &str, count: usize) -> Vec<ProcessExclusion> {
        let policy = PolicyRef::new(policy, format!("guid-{policy}"));
        (0..count)
            .map(|i| {
                ProcessExclusion::parse(&policy, &format!("1|0|h{i}|C:\\p{i}.exe|{}", i % 8))
                    .unwrap()
            })
            .collect()
    }

    fn paths(policy: &str, codes: &[&str]) -> Vec<PathExclusion> {
        let policy = PolicyRef::new(policy, format!("guid-{policy}"));
        codes
            .iter()
            .map(|code| PathExclusion::parse(&policy, &format!("1|{code}|0|0|v")).unwrap())
            .collect()
    }

    fn fixture() -> Report {
        let mut process_records = processes("A", 95);
        process_records.extend(processes("B", 105));
        process_records.extend(processes("C", 50));

        let mut path_records = paths("A", &["1", "2", "2"]);
        path_records.extend(paths("C", &["5"]));

        Report::build(&path_records, &process_records)
    }

    #[test]
    fn render_lists_advisories_by_severity() {
        let rendered = fixture().render();

        let caution = rendered
            .find("CAUTION: Policy has close to the maximum of 100 process exceptions.")
            .unwrap();
        let warning = rendered
            .find("WARNING: Policy exceeds the maximum 100 process exceptions.")
            .unwrap();
        let a = rendered.find("         \"A\" has 95 exceptions").unwrap();
        let b = rendered.find("         \"B\" has 105 exceptions").unwrap();

        assert!(caution < a && a < warning && warning < b);
        assert!(!rendered.contains("\"C\" has"));
        assert!(rendered.contains("    SPP = System Process Protection"));
    }

    #[test]
    fn render_without_advisories() {
        let report = Report::build(&paths("A", &["1"]), &processes("A", 3));
        let rendered = report.render();

        assert!(rendered.starts_with("Path exclusion count for policy by type\n+"));
        assert!(!rendered.contains("CAUTION"));
        assert!(!rendered.contains("WARNING"));
    }

    #[test]
    fn write_csv_artifacts() {
        let output = tempfile::tempdir().unwrap();
        let (path_csv, process_csv) = fixture().write_csv(output.path()).unwrap();

        assert_eq!(path_csv, output.path().join(PATH_CSV));
        assert_eq!(
            fs::read_to_string(path_csv).unwrap(),
            "Policy Name,Threat,Path,Process,Total Exclusions\nA,1,2,0,3\nC,0,0,1,1\n"
        );

        let content = fs::read_to_string(process_csv).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), PROCESS_COLUMNS.join(","));
        // 95 records with flags cycling 0..8: 11 full cycles plus 0..=6
        assert_eq!(lines.next().unwrap(), "A,36,47,47,0,0,0,95");
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn write_csv_for_empty_run() {
        let output = tempfile::tempdir().unwrap();
        let report = Report::from_collection(&Collection::default());
        let (path_csv, process_csv) = report.write_csv(output.path()).unwrap();

        assert_eq!(
            fs::read_to_string(path_csv).unwrap(),
            "Policy Name,Total Exclusions\n"
        );
        assert_eq!(
            fs::read_to_string(process_csv).unwrap(),
            format!("{}\n", PROCESS_COLUMNS.join(","))
        );
        assert!(report.advisories.is_empty());
    }
}
