//! Getting from "the user picked or shot a photo" to a local file that can be
//! uploaded.

mod capture;
mod reference;
mod resolvers;

pub use capture::CaptureSink;
pub use reference::ImageRef;
pub use resolvers::{
    default_resolvers, resolve_upload_path, ContentProviderResolver, ContentResolver,
    DownloadsDocumentResolver, ExternalStorageDocumentResolver, FileSchemeResolver,
    MediaDocumentResolver, ReferenceResolver, StaticContentResolver,
};
