//! The `media` manifest: numbered zip members and the file names they stand for.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Display name to member name, sorted by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaIndex {
    members: BTreeMap<String, String>,
}
impl MediaIndex {
    /// Parse a manifest of `{"<member>": "<display name>", ...}`.
    ///
    /// Entries whose member isn't in the container are skipped, as are repeated
    /// display names after the first.
    pub(crate) fn parse(manifest: &[u8], has_member: impl Fn(&str) -> bool) -> Result<Self> {
        let manifest: BTreeMap<String, String> = serde_json::from_slice(manifest)
            .or_raise(|| ErrorKind::Format("media manifest is not a JSON object of file names".to_string()))?;
        let mut members = BTreeMap::new();
        for (member, name) in manifest {
            if !has_member(&member) {
                tracing::warn!(%member, %name, "skipping media entry without a matching member");
                continue;
            }
            match members.entry(name) {
                Entry::Vacant(entry) => {
                    entry.insert(member);
                },
                Entry::Occupied(entry) => {
                    tracing::warn!(%member, name = %entry.key(), "skipping duplicate media name");
                },
            }
        }
        tracing::debug!(count = members.len(), "indexed media");
        Ok(Self { members })
    }

    /// Member holding the file called `name`.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&str> {
        self.members.get(name).map(String::as_str)
    }

    /// Display names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn present(member: &str) -> bool {
        matches!(member, "0" | "1" | "2")
    }

    #[test]
    fn test_reverse_index() {
        let index = MediaIndex::parse(br#"{"1": "b.mp3", "0": "a.jpg", "7": "gone.png"}"#, present).unwrap();
        assert_eq!(index.member("a.jpg"), Some("0"));
        assert_eq!(index.member("b.mp3"), Some("1"));
        assert_eq!(index.member("gone.png"), None);
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["a.jpg", "b.mp3"]);
    }

    #[test]
    fn test_duplicate_names_keep_first_member() {
        let index = MediaIndex::parse(br#"{"2": "same.jpg", "1": "same.jpg"}"#, present).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.member("same.jpg"), Some("1"));
    }

    #[rstest]
    #[case(b"{}".as_slice(), true)]
    #[case(b"{not json".as_slice(), false)]
    #[case(b"[\"a.jpg\"]".as_slice(), false)]
    #[case(br#"{"0": 5}"#.as_slice(), false)]
    fn test_manifest_shapes(#[case] manifest: &[u8], #[case] valid: bool) {
        let result = MediaIndex::parse(manifest, present);
        assert_eq!(result.is_ok(), valid);
        if let Err(err) = result {
            assert!(matches!(&*err, ErrorKind::Format(_)));
        }
    }
}
