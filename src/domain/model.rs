use crate::domain::ordering::compare_domains;
use std::collections::HashSet;

/// Deduplicated host names accepted from every source of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    hosts: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the host was not present before.
    pub fn insert(&mut self, host: impl Into<String>) -> bool {
        self.hosts.insert(host.into())
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Consumes the set, returning hosts in suffix-first label order.
    pub fn into_sorted(self) -> Vec<String> {
        let mut hosts: Vec<String> = self.hosts.into_iter().collect();
        hosts.sort_unstable_by(|a, b| compare_domains(a, b));
        hosts
    }
}

/// Everything collected by the extract stage.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub hosts: DomainSet,
    /// Source list entries that were fetched successfully, sorted.
    pub sources: Vec<String>,
}

/// A fully rendered hosts file, ready to be written.
#[derive(Debug, Clone)]
pub struct HostsDocument {
    pub content: String,
    pub domain_count: usize,
}

/// Source URLs in file order; blank and `#` lines are dropped.
pub fn parse_source_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
