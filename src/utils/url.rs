use std::fmt::Display;

/// Abstraction allowing to help with the handling of video references and
/// candidate URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    inner: String,
}

impl Url {
    pub fn new(url: String) -> Self {
        Self { inner: url }
    }

    pub fn take(self) -> String {
        self.inner
    }

    pub fn get_ref(&self) -> &str {
        self.inner.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if this URL is already fetchable by a browser media
    /// element as-is, that is, if it carries an `http://` or `https://`
    /// scheme.
    pub fn is_http(&self) -> bool {
        self.inner.starts_with("http://") || self.inner.starts_with("https://")
    }

    /// If this URL is a bucket-qualified storage identifier (`gs://` scheme),
    /// returns its bucket name and object path.
    ///
    /// The object path may be empty for a bare bucket reference.
    pub fn cloud_storage_parts(&self) -> Option<(&str, &str)> {
        let rest = self.inner.strip_prefix("gs://")?;
        match rest.find('/') {
            Some(idx) => Some((&rest[..idx], &rest[idx + 1..])),
            None => Some((rest, "")),
        }
    }

    /// Last path component of the URL, query string and fragment excluded.
    pub fn filename(&self) -> &str {
        let parsed = match self.inner.find('#') {
            Some(idx) => &self.inner[0..idx],
            None => &self.inner,
        };
        let parsed = match parsed.find('?') {
            Some(idx) => &parsed[0..idx],
            None => parsed,
        };
        match parsed.rfind('/') {
            Some(idx) => &parsed[idx + 1..],
            None => parsed,
        }
    }

    pub fn extension(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(idx) => &filename[idx + 1..],
            None => "",
        }
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_ref())
    }
}
