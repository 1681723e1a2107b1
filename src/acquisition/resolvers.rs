use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;

use super::ImageRef;

const MEDIA_DOCUMENTS: &str = "com.android.providers.media.documents";
const DOWNLOADS_DOCUMENTS: &str = "com.android.providers.downloads.documents";
const EXTERNAL_STORAGE_DOCUMENTS: &str = "com.android.externalstorage.documents";

const MEDIA_IMAGES_URI: &str = "content://media/external/images/media";
const PUBLIC_DOWNLOADS_URI: &str = "content://downloads/public_downloads";

/// Platform content lookups a reference resolver may need
///
/// Mobile bindings implement this over the platform's content resolver.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Value of the `_data` column of the first row matching the query
    async fn query_data_column(
        &self,
        uri: &str,
        selection: Option<&str>,
        selection_args: &[String],
    ) -> Option<String>;

    /// App-private directory on external storage
    fn external_files_dir(&self) -> Option<PathBuf>;
}

/// Turns one kind of image reference into a local file path
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    fn name(&self) -> &str;
    fn can_resolve(&self, reference: &ImageRef) -> bool;
    async fn resolve(
        &self,
        reference: &ImageRef,
        content: &dyn ContentResolver,
    ) -> Option<PathBuf>;
}

/// `file://` references resolve to their path
pub struct FileSchemeResolver;

#[async_trait]
impl ReferenceResolver for FileSchemeResolver {
    fn name(&self) -> &str {
        "file"
    }

    fn can_resolve(&self, reference: &ImageRef) -> bool {
        reference.scheme().eq_ignore_ascii_case("file")
    }

    async fn resolve(&self, reference: &ImageRef, _content: &dyn ContentResolver) -> Option<PathBuf> {
        reference.file_path()
    }
}

/// Plain `content://` references, looked up through the `_data` column
pub struct ContentProviderResolver;

#[async_trait]
impl ReferenceResolver for ContentProviderResolver {
    fn name(&self) -> &str {
        "content"
    }

    fn can_resolve(&self, reference: &ImageRef) -> bool {
        reference.scheme().eq_ignore_ascii_case("content") && !reference.is_document()
    }

    async fn resolve(
        &self,
        reference: &ImageRef,
        content: &dyn ContentResolver,
    ) -> Option<PathBuf> {
        content
            .query_data_column(reference.as_str(), None, &[])
            .await
            .map(PathBuf::from)
    }
}

/// Media store documents: id `image:42` is looked up by `_id` in the images
/// table
pub struct MediaDocumentResolver;

#[async_trait]
impl ReferenceResolver for MediaDocumentResolver {
    fn name(&self) -> &str {
        "media-documents"
    }

    fn can_resolve(&self, reference: &ImageRef) -> bool {
        reference.is_document() && reference.authority() == Some(MEDIA_DOCUMENTS)
    }

    async fn resolve(
        &self,
        reference: &ImageRef,
        content: &dyn ContentResolver,
    ) -> Option<PathBuf> {
        let document_id = reference.document_id()?;
        let (_, id) = document_id.split_once(':')?;
        content
            .query_data_column(MEDIA_IMAGES_URI, Some("_id=?"), &[id.to_string()])
            .await
            .map(PathBuf::from)
    }
}

/// Downloads documents: numeric ids map to the public downloads table,
/// `raw:` ids already carry the path
pub struct DownloadsDocumentResolver;

#[async_trait]
impl ReferenceResolver for DownloadsDocumentResolver {
    fn name(&self) -> &str {
        "downloads-documents"
    }

    fn can_resolve(&self, reference: &ImageRef) -> bool {
        reference.is_document() && reference.authority() == Some(DOWNLOADS_DOCUMENTS)
    }

    async fn resolve(
        &self,
        reference: &ImageRef,
        content: &dyn ContentResolver,
    ) -> Option<PathBuf> {
        let document_id = reference.document_id()?;
        if let Some(path) = document_id.strip_prefix("raw:") {
            return Some(PathBuf::from(path));
        }
        let id: i64 = document_id.parse().ok()?;
        content
            .query_data_column(&format!("{}/{}", PUBLIC_DOWNLOADS_URI, id), None, &[])
            .await
            .map(PathBuf::from)
    }
}

/// External storage documents: only the `primary` volume is supported
pub struct ExternalStorageDocumentResolver;

#[async_trait]
impl ReferenceResolver for ExternalStorageDocumentResolver {
    fn name(&self) -> &str {
        "external-storage-documents"
    }

    fn can_resolve(&self, reference: &ImageRef) -> bool {
        reference.is_document() && reference.authority() == Some(EXTERNAL_STORAGE_DOCUMENTS)
    }

    async fn resolve(
        &self,
        reference: &ImageRef,
        content: &dyn ContentResolver,
    ) -> Option<PathBuf> {
        let document_id = reference.document_id()?;
        let (volume, relative) = document_id.split_once(':')?;
        if !volume.eq_ignore_ascii_case("primary") {
            return None;
        }
        content
            .external_files_dir()
            .map(|dir| dir.join(relative))
    }
}

/// Resolvers in the order they are tried
pub fn default_resolvers() -> Vec<Box<dyn ReferenceResolver>> {
    vec![
        Box::new(MediaDocumentResolver),
        Box::new(DownloadsDocumentResolver),
        Box::new(ExternalStorageDocumentResolver),
        Box::new(ContentProviderResolver),
        Box::new(FileSchemeResolver),
    ]
}

/// Resolve a reference to an uploadable local file
///
/// Returns `None` for empty input, unknown schemes, unknown document
/// authorities and failed lookups.
pub async fn resolve_upload_path(
    reference: Option<&ImageRef>,
    content: &dyn ContentResolver,
) -> Option<PathBuf> {
    let reference = reference?;
    for resolver in default_resolvers() {
        if resolver.can_resolve(reference) {
            let path = resolver.resolve(reference, content).await;
            debug!(
                "{} resolver mapped {} to {:?}",
                resolver.name(),
                reference,
                path
            );
            return path.filter(|p| !p.as_os_str().is_empty());
        }
    }
    debug!("No resolver accepts {}", reference);
    None
}

/// In-memory content table
///
/// Rows are keyed by their full content URI; a `_id=?` selection against a
/// table URI looks up `<table uri>/<id>`.
#[derive(Debug, Default, Clone)]
pub struct StaticContentResolver {
    rows: HashMap<String, String>,
    external_files_dir: Option<PathBuf>,
}

impl StaticContentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, uri: impl Into<String>, data: impl Into<String>) -> Self {
        self.rows.insert(uri.into(), data.into());
        self
    }

    pub fn with_external_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.external_files_dir = Some(dir.into());
        self
    }
}

#[async_trait]
impl ContentResolver for StaticContentResolver {
    async fn query_data_column(
        &self,
        uri: &str,
        selection: Option<&str>,
        selection_args: &[String],
    ) -> Option<String> {
        let key = match (selection, selection_args.first()) {
            (Some("_id=?"), Some(id)) => format!("{}/{}", uri.trim_end_matches('/'), id),
            (None, _) => uri.to_string(),
            _ => return None,
        };
        self.rows.get(&key).cloned()
    }

    fn external_files_dir(&self) -> Option<PathBuf> {
        self.external_files_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> StaticContentResolver {
        StaticContentResolver::new()
            .with_row(
                "content://media/external/images/media/42",
                "/storage/emulated/0/DCIM/42.jpg",
            )
            .with_row(
                "content://downloads/public_downloads/7",
                "/storage/emulated/0/Download/fridge.jpg",
            )
            .with_row(
                "content://media/external/images/media/9",
                "/storage/emulated/0/Pictures/9.jpg",
            )
            .with_external_files_dir("/storage/emulated/0/Android/data/app/files")
    }

    async fn resolve(reference: &str) -> Option<PathBuf> {
        let reference = ImageRef::parse(reference);
        resolve_upload_path(reference.as_ref(), &content()).await
    }

    #[tokio::test]
    async fn test_file_reference_resolves_to_its_path() {
        assert_eq!(
            resolve("file:///data/user/0/app/1700000000000.jpg").await,
            Some(PathBuf::from("/data/user/0/app/1700000000000.jpg"))
        );
    }

    #[tokio::test]
    async fn test_media_document() {
        assert_eq!(
            resolve("content://com.android.providers.media.documents/document/image%3A42").await,
            Some(PathBuf::from("/storage/emulated/0/DCIM/42.jpg"))
        );
    }

    #[tokio::test]
    async fn test_media_document_without_type_prefix() {
        assert_eq!(
            resolve("content://com.android.providers.media.documents/document/42").await,
            None
        );
    }

    #[tokio::test]
    async fn test_downloads_document() {
        assert_eq!(
            resolve("content://com.android.providers.downloads.documents/document/7").await,
            Some(PathBuf::from("/storage/emulated/0/Download/fridge.jpg"))
        );
        assert_eq!(
            resolve("content://com.android.providers.downloads.documents/document/raw%3A%2Fsdcard%2Fa.jpg")
                .await,
            Some(PathBuf::from("/sdcard/a.jpg"))
        );
        assert_eq!(
            resolve("content://com.android.providers.downloads.documents/document/msf%3A12").await,
            None
        );
    }

    #[tokio::test]
    async fn test_external_storage_document() {
        assert_eq!(
            resolve("content://com.android.externalstorage.documents/document/primary%3ADCIM%2Fa.jpg")
                .await,
            Some(PathBuf::from(
                "/storage/emulated/0/Android/data/app/files/DCIM/a.jpg"
            ))
        );
        assert_eq!(
            resolve("content://com.android.externalstorage.documents/document/1A2B-3C4D%3Aa.jpg")
                .await,
            None
        );
    }

    #[tokio::test]
    async fn test_plain_content_reference() {
        assert_eq!(
            resolve("content://media/external/images/media/9").await,
            Some(PathBuf::from("/storage/emulated/0/Pictures/9.jpg"))
        );
        assert_eq!(resolve("content://media/external/images/media/10").await, None);
    }

    #[tokio::test]
    async fn test_unresolvable_references() {
        assert_eq!(resolve("https://example.com/a.jpg").await, None);
        assert_eq!(
            resolve("content://com.example.unknown.documents/document/a%3A1").await,
            None
        );
        assert_eq!(resolve_upload_path(None, &content()).await, None);
    }
}
