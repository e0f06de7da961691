/// Maximum number of bundles remembered in the recent list.
pub const RECENT_BUNDLE_LIMIT: usize = 6;

/// Identifies one uploaded log bundle. The hash is the file tree's reset key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInfo {
    pub hash: String,
    pub name: String,
    pub issue: Option<String>,
}

impl BundleInfo {
    pub fn new(hash: impl Into<String>, name: impl Into<String>, issue: Option<String>) -> Self {
        Self {
            hash: hash.into(),
            name: name.into(),
            issue,
        }
    }
}

/// `"{issue} · {name} ({suffix})"`, where the suffix is the last eight characters of the hash.
pub fn format_bundle_label(bundle: &BundleInfo) -> String {
    let suffix = hash_suffix(&bundle.hash);
    match bundle.issue.as_deref() {
        Some(issue) if !issue.is_empty() => format!("{issue} · {} ({suffix})", bundle.name),
        _ => format!("{} ({suffix})", bundle.name),
    }
}

fn hash_suffix(hash: &str) -> &str {
    let count = hash.chars().count();
    if count <= 8 {
        return hash;
    }
    let start = hash
        .char_indices()
        .nth(count - 8)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &hash[start..]
}

/// Most-recently-selected bundles, newest first, unique by hash.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecentBundles {
    entries: Vec<BundleInfo>,
}

impl RecentBundles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `bundle` to the front, dropping any older entry with the same hash.
    pub fn push(&mut self, bundle: BundleInfo) {
        self.entries.retain(|entry| entry.hash != bundle.hash);
        self.entries.insert(0, bundle);
        self.entries.truncate(RECENT_BUNDLE_LIMIT);
    }

    pub fn get(&self, index: usize) -> Option<&BundleInfo> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[BundleInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<BundleInfo> for RecentBundles {
    /// Builds the list from newest to oldest, keeping the first occurrence of each hash.
    fn from_iter<I: IntoIterator<Item = BundleInfo>>(iter: I) -> Self {
        let mut entries: Vec<BundleInfo> = Vec::new();
        for bundle in iter {
            if entries.len() == RECENT_BUNDLE_LIMIT {
                break;
            }
            if entries.iter().all(|entry| entry.hash != bundle.hash) {
                entries.push(bundle);
            }
        }
        Self { entries }
    }
}
