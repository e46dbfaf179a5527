//! Set of links already handed to the downloader during this run.

use std::collections::HashSet;

/// Lines that have been dispatched. Grows for the lifetime of the process;
/// nothing is ever removed.
#[derive(Debug, Default)]
pub struct LinkSet {
    seen: HashSet<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    /// Returns the links in `content` not seen before, in file order, and
    /// marks them seen. A link repeated within `content` is returned once.
    pub fn take_new(&mut self, content: &str) -> Vec<String> {
        let mut fresh = Vec::new();
        for link in candidate_links(content) {
            if self.seen.insert(link.to_string()) {
                fresh.push(link.to_string());
            }
        }
        fresh
    }
}

/// Trimmed, non-empty, non-comment lines of `content`.
pub fn candidate_links(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pass_returns_every_link() {
        let mut set = LinkSet::new();
        assert_eq!(set.take_new("http://a/x\nhttp://b/y"), vec!["http://a/x", "http://b/y"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn second_pass_returns_only_additions() {
        let mut set = LinkSet::new();
        set.take_new("http://a/x\nhttp://b/y");
        assert_eq!(set.take_new("http://a/x\nhttp://c/z"), vec!["http://c/z"]);
        assert!(set.contains("http://b/y"));
    }

    #[test]
    fn resave_without_changes_returns_nothing() {
        let mut set = LinkSet::new();
        let content = "http://a/x\n\nhttp://b/y\n";
        set.take_new(content);
        assert!(set.take_new(content).is_empty());
    }

    #[test]
    fn duplicates_within_one_pass_collapse() {
        let mut set = LinkSet::new();
        assert_eq!(set.take_new("http://a/x\nhttp://a/x\n  http://a/x  "), vec!["http://a/x"]);
    }

    #[test]
    fn blanks_and_comments_are_skipped() {
        let mut set = LinkSet::new();
        let content = "# Add your links here (one per line)\n\n   \r\nhttp://a/x\r\n#http://b/y\n";
        assert_eq!(set.take_new(content), vec!["http://a/x"]);
        assert!(!set.contains("#http://b/y"));
    }

    #[test]
    fn removed_lines_are_not_forgotten() {
        let mut set = LinkSet::new();
        set.take_new("http://a/x");
        assert!(set.take_new("").is_empty());
        assert!(set.take_new("http://a/x").is_empty());
    }
}
