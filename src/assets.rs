use include_dir::{Dir, include_dir};
use tauri::utils::mime_type::MimeType;

/// The built frontend, compiled into the binary.
static FRONTEND_DIST: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/frontend/dist");

/// The document served for the bundle root and for client-side routes.
pub const INDEX_FILE: &str = "index.html";

/// A file from the asset bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// The path of the file relative to the bundle root.
    pub path: String,

    /// The file contents, exactly as bundled.
    pub bytes: &'static [u8],

    /// The MIME type to serve the file with.
    pub mime_type: String,
}

/// Why a request path could not be turned into a bundle path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPathError {
    /// The path is not valid percent-encoded UTF-8.
    Malformed,

    /// The path tries to leave the bundle root.
    Traversal,
}

/// A static file tree served to the webview.
#[derive(Debug, Clone, Copy)]
pub struct AssetBundle {
    root: &'static Dir<'static>,
}

impl AssetBundle {
    /// The frontend bundle embedded at build time.
    pub fn embedded() -> Self {
        Self {
            root: &FRONTEND_DIST,
        }
    }

    /// Resolves a request path to a bundled file.
    ///
    /// The root resolves to `index.html`. A path that isn't a bundled file falls back to
    /// `index.html` as long as its last segment has no extension, so client-side routes
    /// keep working after a reload. Missing files with an extension resolve to `None`.
    ///
    /// # Arguments
    ///
    /// * `request_path` - The (percent-encoded) path of the request.
    pub fn resolve(&self, request_path: &str) -> Result<Option<Asset>, AssetPathError> {
        let path = normalize_path(request_path)?;

        if path.is_empty() {
            return Ok(self.file(INDEX_FILE));
        }

        if let Some(asset) = self.file(&path) {
            return Ok(Some(asset));
        }

        let is_route = request_path.ends_with('/')
            || path.rsplit('/').next().is_some_and(|name| !name.contains('.'));

        if is_route {
            tracing::trace!(path = %path, "falling back to {INDEX_FILE}");

            return Ok(self.file(INDEX_FILE));
        }

        Ok(None)
    }

    /// Gets a bundled file by its exact path.
    fn file(&self, path: &str) -> Option<Asset> {
        let file = self.root.get_file(path)?;

        Some(Asset {
            path: path.to_string(),
            bytes: file.contents(),
            mime_type: MimeType::parse(file.contents(), path),
        })
    }
}

/// Turns a request path into a path relative to the bundle root.
///
/// Percent-escapes are decoded, empty and `.` segments are dropped and any `..`
/// segment is rejected.
fn normalize_path(request_path: &str) -> Result<String, AssetPathError> {
    let decoded = urlencoding::decode(request_path).map_err(|_| AssetPathError::Malformed)?;

    let mut segments = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return Err(AssetPathError::Traversal),
            segment => segments.push(segment),
        }
    }

    Ok(segments.join("/"))
}
