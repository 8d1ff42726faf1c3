use quick_xml::{
    events::Event,
    name::{Namespace, ResolveResult},
    reader::NsReader,
};

use crate::error::AmpError;

use super::model::{PathExclusion, PolicyRef, ProcessExclusion};

/// Namespace of the `exclusions` section in a policy document
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Exclusions extracted from one policy document
#[derive(Debug, Default, PartialEq)]
pub struct PolicyExclusions {
    pub paths: Vec<PathExclusion>,
    pub processes: Vec<ProcessExclusion>,
    /// Entries that were present but could not be parsed
    pub skipped: usize,
}

impl PolicyExclusions {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.processes.is_empty()
    }

    fn push_entry(&mut self, policy: &PolicyRef, section: Section, text: Option<String>) {
        let Some(text) = text else {
            log::warn!(
                "Skipping {} exclusion: {}",
                section.name(),
                AmpError::EmptyExclusion {
                    policy: policy.name.clone()
                }
            );
            self.skipped += 1;
            return;
        };

        let parsed = match section {
            Section::Info => PathExclusion::parse(policy, &text).map(|p| self.paths.push(p)),
            Section::Process => {
                ProcessExclusion::parse(policy, &text).map(|p| self.processes.push(p))
            }
        };

        if let Err(err) = parsed {
            log::warn!(
                "Skipping {} exclusion in \"{}\": {}",
                section.name(),
                policy.name,
                err
            );
            self.skipped += 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Section {
    Info,
    Process,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Section::Info => "path",
            Section::Process => "process",
        }
    }
}

/// An open `info` or `process` element and its depth
struct Container {
    section: Section,
    depth: usize,
}

/// An open direct child of a container
///
/// Text collects every text and CDATA piece up to the first child element.
struct Item {
    depth: usize,
    text: Option<String>,
    sealed: bool,
}

impl Item {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            text: None,
            sealed: false,
        }
    }

    fn append(&mut self, piece: &str) {
        self.text.get_or_insert_with(String::new).push_str(piece);
    }
}

/// Extract path and process exclusions from a policy XML document
///
/// Every `exclusions` element in the [`XMLDSIG_NS`] namespace is searched for
/// `info` (path) and `process` sections. Each direct child of a section holds
/// one `|`-delimited entry.
///
/// Malformed entries are logged and counted in
/// [`PolicyExclusions::skipped`]; the remaining entries are still returned.
/// A document that is not well-formed XML is an error for the whole policy.
pub fn parse_exclusions(policy: &PolicyRef, xml: &str) -> Result<PolicyExclusions, AmpError> {
    let mut reader = NsReader::from_str(xml);

    let xml_error = |source: quick_xml::Error| AmpError::Xml {
        policy: policy.name.clone(),
        source,
    };

    let mut result = PolicyExclusions::default();
    let mut depth = 0usize;
    let mut exclusions: Vec<usize> = Vec::new();
    let mut container: Option<Container> = None;
    let mut item: Option<Item> = None;

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
        match event {
            Event::Start(start) => {
                depth += 1;
                let in_ns = is_xmldsig(&ns);
                let local = start.local_name();

                if let Some(open) = &container {
                    if depth == open.depth + 1 {
                        item = Some(Item::new(depth));
                    } else if let Some(open_item) = item.as_mut() {
                        open_item.sealed = true;
                    }
                } else if in_ns && local.as_ref() == b"exclusions" {
                    exclusions.push(depth);
                } else if in_ns && !exclusions.is_empty() {
                    container = section_of(local.as_ref()).map(|section| Container { section, depth });
                }
            }
            Event::Empty(_) => {
                // self-closing direct child carries no entry text
                if let Some(open) = &container
                    && depth == open.depth
                {
                    result.push_entry(policy, open.section, None);
                } else if let Some(open) = item.as_mut() {
                    open.sealed = true;
                }
            }
            Event::Text(text) => {
                if let Some(open) = item.as_mut()
                    && open.depth == depth
                    && !open.sealed
                {
                    open.append(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(open) = item.as_mut()
                    && open.depth == depth
                    && !open.sealed
                {
                    open.append(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if let Some(done) = item.take_if(|open| open.depth == depth)
                    && let Some(open) = &container
                {
                    result.push_entry(policy, open.section, done.text);
                }
                if container.as_ref().is_some_and(|open| open.depth == depth) {
                    container = None;
                }
                if exclusions.last() == Some(&depth) {
                    exclusions.pop();
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    log::debug!(
        "Found {} path and {} process exclusions for \"{}\"",
        result.paths.len(),
        result.processes.len(),
        policy.name
    );

    Ok(result)
}

fn is_xmldsig(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == XMLDSIG_NS.as_bytes())
}

fn section_of(local: &[u8]) -> Option<Section> {
    match local {
        b"info" => Some(Section::Info),
        b"process" => Some(Section::Process),
        _ => None,
    }
}
