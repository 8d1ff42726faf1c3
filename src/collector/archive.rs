use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{error::AmpError, exclusion::PolicyRef};

/// Folder inside the output directory that holds the raw policy documents
pub const POLICY_FILES_DIR: &str = "policy_files";

/// On-disk copy of every fetched policy document, stored as `<policy name>.xml`
#[derive(Debug, Clone)]
pub struct PolicyArchive {
    dir: PathBuf,
}

impl PolicyArchive {
    /// Create the archive folder under `output_dir`
    pub fn create(output_dir: &Path) -> Result<Self, AmpError> {
        let dir = output_dir.join(POLICY_FILES_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the raw policy body verbatim under a name from [`FileNames::assign`]
    pub async fn store(&self, file_name: &str, xml: &str) -> Result<PathBuf, AmpError> {
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, xml).await?;
        Ok(path)
    }
}

/// Hands out one archive file name per policy within a run
///
/// Names are compared case-insensitively. When two policies clean up to the
/// same name, the later one gets its GUID appended, then a counter.
#[derive(Debug, Default)]
pub struct FileNames {
    used: HashSet<String>,
}

impl FileNames {
    pub fn assign(&mut self, policy: &PolicyRef) -> String {
        let stem = file_stem(&policy.name);
        let mut candidate = stem.clone();
        if self.used.contains(&candidate.to_lowercase()) {
            candidate = format!("{}_{}", stem, file_stem(&policy.guid));
        }

        let base = candidate.clone();
        let mut n = 2;
        while self.used.contains(&candidate.to_lowercase()) {
            candidate = format!("{base}_{n}");
            n += 1;
        }

        self.used.insert(candidate.to_lowercase());
        format!("{candidate}.xml")
    }
}

/// Policy name with characters that cannot appear in a file name replaced by `_`
fn file_stem(policy_name: &str) -> String {
    let stem: String = policy_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match stem.trim() {
        "" | "." | ".." => "_".to_string(),
        _ => stem,
    }
}
