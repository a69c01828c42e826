use crate::utils::url::Url;

/// Canonical host serving public storage objects over HTTP(S).
const PUBLIC_STORAGE_HOST: &str = "https://storage.googleapis.com";

/// Alternate host serving the same objects through the storage console.
const CONSOLE_STORAGE_HOST: &str = "https://storage.cloud.google.com";

/// The two HTTP(S) forms a video reference can be rewritten to.
///
/// Both fields equal the input when no rewriting applies (already an
/// `http(s)://` URL, or any form we don't know how to rewrite).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ResolvedUrls {
    pub(crate) rewritten: String,
    pub(crate) alternate: String,
}

/// Derive the playable HTTP(S) forms of an arbitrary video reference.
///
/// A `gs://bucket/path` storage identifier is not directly fetchable by a
/// browser media element and is rewritten to a public-object URL on each of
/// the two canonical serving hosts. Everything else is passed through
/// verbatim. This function never fails: an empty reference yields empty
/// fields.
pub(crate) fn resolve(reference: &str) -> ResolvedUrls {
    if reference.is_empty() {
        return ResolvedUrls {
            rewritten: String::new(),
            alternate: String::new(),
        };
    }
    let url = Url::new(reference.to_string());
    if url.is_http() {
        return ResolvedUrls {
            rewritten: reference.to_string(),
            alternate: reference.to_string(),
        };
    }
    if let Some((bucket, path)) = url.cloud_storage_parts() {
        return ResolvedUrls {
            rewritten: format!("{}/{}/{}", PUBLIC_STORAGE_HOST, bucket, path),
            alternate: format!("{}/{}/{}", CONSOLE_STORAGE_HOST, bucket, path),
        };
    }
    ResolvedUrls {
        rewritten: reference.to_string(),
        alternate: reference.to_string(),
    }
}

/// Ordered set of candidate URLs derived once from a single video reference.
///
/// The first candidate is attempted first; order is rewritten form, then
/// alternate form, then the original reference, deduplicated and with empty
/// entries excluded. The set is read-only for the whole playback session:
/// only the current index moves, when a playback failure makes the session
/// fall back to the next candidate.
#[derive(Clone, Debug, Default)]
pub(crate) struct SourceCandidates {
    urls: Vec<Url>,
    index: usize,
}

impl SourceCandidates {
    pub(crate) fn from_reference(reference: &str) -> Self {
        let ResolvedUrls {
            rewritten,
            alternate,
        } = resolve(reference);
        let mut urls: Vec<Url> = vec![];
        for candidate in [rewritten, alternate, reference.to_string()] {
            if !candidate.is_empty() && !urls.iter().any(|u| u.get_ref() == candidate) {
                urls.push(Url::new(candidate));
            }
        }
        Self { urls, index: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.urls.len()
    }

    /// The candidate URL the session is currently bound to.
    pub(crate) fn current(&self) -> Option<&Url> {
        self.urls.get(self.index)
    }

    pub(crate) fn current_index(&self) -> usize {
        self.index
    }

    /// Move to the next candidate, wrapping around.
    ///
    /// With zero or one candidate there is nothing else to try and this is a
    /// no-op. Returns `true` if the index actually moved.
    pub(crate) fn advance(&mut self) -> bool {
        if self.urls.len() <= 1 {
            return false;
        }
        self.index = (self.index + 1) % self.urls.len();
        true
    }

    /// Every candidate in resolver order, e.g. to report which URLs were
    /// attempted or to build the external-open fallback chain.
    pub(crate) fn all(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(Url::get_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_passes_http_through() {
        let r = resolve("https://example.com/videos/v1.mp4");
        assert_eq!(r.rewritten, "https://example.com/videos/v1.mp4");
        assert_eq!(r.alternate, "https://example.com/videos/v1.mp4");

        let r = resolve("http://example.com/videos/v1.mp4");
        assert_eq!(r.rewritten, "http://example.com/videos/v1.mp4");
        assert_eq!(r.alternate, "http://example.com/videos/v1.mp4");
    }

    #[test]
    fn test_resolve_passes_unknown_forms_through() {
        let r = resolve("ftp://example.com/v1.mp4");
        assert_eq!(r.rewritten, "ftp://example.com/v1.mp4");
        assert_eq!(r.alternate, "ftp://example.com/v1.mp4");

        let r = resolve("just-a-name.mp4");
        assert_eq!(r.rewritten, "just-a-name.mp4");
        assert_eq!(r.alternate, "just-a-name.mp4");
    }

    #[test]
    fn test_resolve_empty_reference() {
        let r = resolve("");
        assert_eq!(r.rewritten, "");
        assert_eq!(r.alternate, "");
    }

    #[test]
    fn test_resolve_rewrites_storage_identifiers() {
        let r = resolve("gs://my-bucket/videos/v1.mp4");
        assert_eq!(
            r.rewritten,
            "https://storage.googleapis.com/my-bucket/videos/v1.mp4"
        );
        assert_eq!(
            r.alternate,
            "https://storage.cloud.google.com/my-bucket/videos/v1.mp4"
        );
        assert_ne!(r.rewritten, r.alternate);
        assert!(!r.rewritten.contains("gs://"));
        assert!(!r.alternate.contains("gs://"));
        assert!(r.rewritten.contains("my-bucket/videos/v1.mp4"));
        assert!(r.alternate.contains("my-bucket/videos/v1.mp4"));
    }

    #[test]
    fn test_candidates_order_and_first_attempt() {
        let candidates = SourceCandidates::from_reference("gs://my-bucket/videos/v1.mp4");
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates.current_index(), 0);
        assert_eq!(
            candidates.current().map(|u| u.get_ref()),
            Some("https://storage.googleapis.com/my-bucket/videos/v1.mp4")
        );
        let all: Vec<&str> = candidates.all().collect();
        assert_eq!(
            all,
            vec![
                "https://storage.googleapis.com/my-bucket/videos/v1.mp4",
                "https://storage.cloud.google.com/my-bucket/videos/v1.mp4",
                "gs://my-bucket/videos/v1.mp4",
            ]
        );
    }

    #[test]
    fn test_candidates_deduplicate_when_resolver_collides() {
        // Both resolved forms equal the original here.
        let candidates = SourceCandidates::from_reference("https://example.com/v1.mp4");
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates.current().map(|u| u.get_ref()),
            Some("https://example.com/v1.mp4")
        );
    }

    #[test]
    fn test_candidates_exclude_empty_entries() {
        let candidates = SourceCandidates::from_reference("");
        assert!(candidates.is_empty());
        assert_eq!(candidates.current(), None);
    }

    #[test]
    fn test_advance_is_noop_on_single_candidate() {
        let mut candidates = SourceCandidates::from_reference("https://example.com/v1.mp4");
        assert!(!candidates.advance());
        assert_eq!(candidates.current_index(), 0);
    }

    #[test]
    fn test_advance_cycles_through_all_candidates() {
        let mut candidates = SourceCandidates::from_reference("gs://bucket/a/b.mp4");
        assert_eq!(candidates.len(), 3);
        let mut seen = vec![candidates.current_index()];
        for _ in 0..2 {
            assert!(candidates.advance());
            seen.push(candidates.current_index());
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert!(candidates.advance());
        assert_eq!(candidates.current_index(), 0);
    }

    #[test]
    fn test_bare_bucket_reference() {
        let r = resolve("gs://my-bucket");
        assert_eq!(r.rewritten, "https://storage.googleapis.com/my-bucket/");
        assert_eq!(r.alternate, "https://storage.cloud.google.com/my-bucket/");
    }
}
