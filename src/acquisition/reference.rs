use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};

/// A reference to an image as handed over by a camera or a picker
///
/// Accepts `file://`, `content://` and any other URL scheme, plus bare
/// absolute paths which are turned into `file://` references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    url: Url,
}

impl ImageRef {
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        match Url::parse(reference) {
            Ok(url) => Some(Self { url }),
            Err(_) => Self::from_path(Path::new(reference)),
        }
    }

    /// `file://` reference for an absolute path
    pub fn from_path(path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(|url| Self { url })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Provider authority, e.g. `com.android.providers.media.documents`
    pub fn authority(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Percent-decoded path component
    pub fn path(&self) -> String {
        urlencoding::decode(self.url.path())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| self.url.path().to_string())
    }

    /// Local path of a `file://` reference
    pub fn file_path(&self) -> Option<PathBuf> {
        if self.scheme().eq_ignore_ascii_case("file") {
            Some(PathBuf::from(self.path()))
        } else {
            None
        }
    }

    /// Whether this is a document-provider reference (`.../document/<id>`)
    pub fn is_document(&self) -> bool {
        self.document_id().is_some()
    }

    /// Decoded document id of a document-provider reference
    pub fn document_id(&self) -> Option<String> {
        if !self.scheme().eq_ignore_ascii_case("content") {
            return None;
        }
        let segments: Vec<&str> = self.url.path_segments()?.collect();
        let pos = segments.iter().rposition(|s| *s == "document")?;
        let raw = segments.get(pos + 1)?;
        urlencoding::decode(raw).ok().map(|id| id.into_owned())
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_reference() {
        let image = ImageRef::parse("file:///storage/emulated/0/Pictures/1700000000000.jpg").unwrap();
        assert_eq!(image.scheme(), "file");
        assert_eq!(
            image.file_path().unwrap(),
            PathBuf::from("/storage/emulated/0/Pictures/1700000000000.jpg")
        );
        assert!(!image.is_document());
    }

    #[test]
    fn test_bare_path_becomes_file_reference() {
        let image = ImageRef::parse("/tmp/fridge shot.jpg").unwrap();
        assert_eq!(image.scheme(), "file");
        assert_eq!(image.file_path().unwrap(), PathBuf::from("/tmp/fridge shot.jpg"));
    }

    #[test]
    fn test_document_id_is_decoded() {
        let image =
            ImageRef::parse("content://com.android.providers.media.documents/document/image%3A42")
                .unwrap();
        assert_eq!(image.authority(), Some("com.android.providers.media.documents"));
        assert_eq!(image.document_id().as_deref(), Some("image:42"));
    }

    #[test]
    fn test_tree_document_id() {
        let image = ImageRef::parse(
            "content://com.android.externalstorage.documents/tree/primary%3ADCIM/document/primary%3ADCIM%2Fa.jpg",
        )
        .unwrap();
        assert_eq!(image.document_id().as_deref(), Some("primary:DCIM/a.jpg"));
    }

    #[test]
    fn test_blank_reference_is_none() {
        assert!(ImageRef::parse("   ").is_none());
        assert!(ImageRef::parse("relative/path.jpg").is_none());
    }
}
