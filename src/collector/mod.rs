pub mod archive;

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::{
    amp::{PolicySource, PolicySummary},
    error::AmpError,
    exclusion::{PathExclusion, PolicyExclusions, ProcessExclusion, parse_exclusions},
};

pub use archive::{FileNames, POLICY_FILES_DIR, PolicyArchive};

/// Maximum number of policies fetched and parsed at the same time
pub const MAX_WORKERS: usize = 10;

/// Exclusions gathered from every policy in a run
#[derive(Debug, Default, PartialEq)]
pub struct Collection {
    pub paths: Vec<PathExclusion>,
    pub processes: Vec<ProcessExclusion>,
    /// Policies returned by the listing call
    pub policies: usize,
    /// Policies that could not be fetched or parsed
    pub failed: usize,
    /// Individual entries dropped as malformed
    pub skipped: usize,
}

impl Collection {
    fn merge(&mut self, parsed: PolicyExclusions) {
        self.paths.extend(parsed.paths);
        self.processes.extend(parsed.processes);
        self.skipped += parsed.skipped;
    }
}

/// List every policy, then fetch, archive and parse each one
///
/// At most [`MAX_WORKERS`] policies are in flight. A failed listing call
/// yields an empty collection; a failed policy is logged and left out.
/// Records are merged only after every task has finished.
pub async fn collect<S: PolicySource>(source: Arc<S>, archive: Arc<PolicyArchive>) -> Collection {
    let policies = match source.list_policies().await {
        Ok(policies) => policies,
        Err(err) => {
            log::error!("Failed to get policy list: {}", err);
            return Collection::default();
        }
    };

    log::info!(
        "Starting policy collection for {} policies with {} workers",
        policies.len(),
        MAX_WORKERS
    );

    let semaphore = Arc::new(Semaphore::new(MAX_WORKERS));
    let mut file_names = FileNames::default();
    let mut names = Vec::with_capacity(policies.len());
    let mut handles = Vec::with_capacity(policies.len());

    for policy in policies {
        names.push(policy.name.clone());
        let file_name = file_names.assign(&policy.to_ref());

        let source = Arc::clone(&source);
        let archive = Arc::clone(&archive);
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            process_policy(source.as_ref(), &archive, &policy, &file_name).await
        }));
    }

    let mut collection = Collection {
        policies: names.len(),
        ..Default::default()
    };

    for (name, result) in names.iter().zip(join_all(handles).await) {
        match result.map_err(AmpError::from).and_then(|parsed| parsed) {
            Ok(parsed) => collection.merge(parsed),
            Err(err) => {
                log::error!("Skipping policy \"{}\": {}", name, err);
                collection.failed += 1;
            }
        }
    }

    log::info!(
        "Completed policy collection: {} path and {} process exclusions, {} policies failed",
        collection.paths.len(),
        collection.processes.len(),
        collection.failed
    );

    collection
}

async fn process_policy<S: PolicySource>(
    source: &S,
    archive: &PolicyArchive,
    policy: &PolicySummary,
    file_name: &str,
) -> Result<PolicyExclusions, AmpError> {
    let xml = source.fetch_policy_xml(policy).await?;

    log::debug!("Attempting to write {} for \"{}\"", file_name, policy.name);
    if let Err(err) = archive.store(file_name, &xml).await {
        log::error!("Failed to archive policy \"{}\": {}", policy.name, err);
    }

    parse_exclusions(&policy.to_ref(), &xml)
}
