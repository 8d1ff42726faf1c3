use std::fmt;

use crate::error::AmpError;

use super::flags::ExclusionFlags;

/// Minimum number of pipe-delimited fields in an exclusion entry
pub const MIN_FIELDS: usize = 5;

/// Identity of the policy an exclusion was parsed from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolicyRef {
    pub name: String,
    pub guid: String,
}

impl PolicyRef {
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionClass {
    Path,
    Process,
}

impl fmt::Display for ExclusionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionClass::Path => f.write_str("path"),
            ExclusionClass::Process => f.write_str("process"),
        }
    }
}

/// Display label for a path exclusion type code
///
/// Unknown codes are returned unchanged.
pub fn path_type_label(code: &str) -> &str {
    match code {
        "1" => "Threat",
        "2" => "Path",
        "3" => "File Extension",
        "4" => "File Name",
        "5" => "Process",
        "6" => "Wildcard",
        other => other,
    }
}

/// Exclusion keyed by path, extension, file name, wildcard, threat or process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExclusion {
    pub policy: PolicyRef,
    pub class: ExclusionClass,
    pub type_code: String,
    pub value: String,
}

impl PathExclusion {
    /// Parse a `|`-delimited path exclusion entry
    ///
    /// Field 1 is the type code and field 4 the excluded value.
    pub fn parse(policy: &PolicyRef, entry: &str) -> Result<Self, AmpError> {
        let fields = split_fields(entry)?;
        Ok(Self {
            policy: policy.clone(),
            class: ExclusionClass::Path,
            type_code: fields[1].to_string(),
            value: fields[4].to_string(),
        })
    }
}

/// Exclusion keyed by process hash/path with a capability flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessExclusion {
    pub policy: PolicyRef,
    pub class: ExclusionClass,
    pub version: String,
    pub auth_type: String,
    pub hash: String,
    pub path: String,
    pub flag: i32,
    pub flags: ExclusionFlags,
}

impl ProcessExclusion {
    /// Parse a `|`-delimited process exclusion entry
    ///
    /// Layout: `version|auth type|hash|path|flag`.
    pub fn parse(policy: &PolicyRef, entry: &str) -> Result<Self, AmpError> {
        let fields = split_fields(entry)?;
        let raw_flag = fields[4].trim();
        let flag = raw_flag
            .parse::<i32>()
            .map_err(|source| AmpError::InvalidFlag {
                entry: entry.to_string(),
                value: raw_flag.to_string(),
                source,
            })?;

        Ok(Self {
            policy: policy.clone(),
            class: ExclusionClass::Process,
            version: fields[0].to_string(),
            auth_type: fields[1].to_string(),
            hash: fields[2].to_string(),
            path: fields[3].to_string(),
            flag,
            flags: ExclusionFlags::decode(flag),
        })
    }

    /// Whether the raw flag falls in the file-scan range `[0, 3)`
    pub fn is_file_scan(&self) -> bool {
        (0..3).contains(&self.flag)
    }
}

fn split_fields(entry: &str) -> Result<Vec<&str>, AmpError> {
    let fields: Vec<&str> = entry.split('|').collect();
    if fields.len() < MIN_FIELDS {
        return Err(AmpError::MalformedExclusion {
            entry: entry.to_string(),
            expected: MIN_FIELDS,
            found: fields.len(),
        });
    }
    Ok(fields)
}
