use std::borrow::Cow;

use tauri::{
    Url,
    http::{
        HeaderValue, Method, Request, Response, StatusCode,
        header::{ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    },
};

use crate::{
    assets::{AssetBundle, AssetPathError, INDEX_FILE},
    error::AppError,
};

/// The URI scheme the asset bundle is served on.
pub const ASSET_SCHEME: &str = "inventa";

/// Gets the URL a webview uses to load `path` from the asset bundle.
///
/// Windows and Android only allow custom protocols through `http://<scheme>.localhost`.
///
/// # Arguments
///
/// * `path` - The absolute path within the bundle.
pub fn app_url(path: &str) -> Result<Url, AppError> {
    let origin = if cfg!(any(windows, target_os = "android")) {
        format!("http://{ASSET_SCHEME}.localhost")
    } else {
        format!("{ASSET_SCHEME}://localhost")
    };

    Url::parse(&format!("{origin}{path}"))
        .map_err(|e| AppError::GenericError(format!("Invalid app URL '{path}': {e}")))
}

/// Whether `url` points into the asset bundle.
pub fn is_app_url(url: &Url) -> bool {
    match url.scheme() {
        ASSET_SCHEME => url.host_str() == Some("localhost"),
        "http" => url.host_str() == Some(format!("{ASSET_SCHEME}.localhost").as_str()),
        _ => false,
    }
}

/// Serves a request against the asset bundle.
///
/// # Arguments
///
/// * `bundle` - The bundle to serve from.
/// * `request` - The webview's request.
pub fn handle_request(
    bundle: &AssetBundle,
    request: &Request<Vec<u8>>,
) -> Response<Cow<'static, [u8]>> {
    let method = request.method();
    let path = request.uri().path();

    if method != Method::GET && method != Method::HEAD {
        tracing::warn!(%method, path, "unsupported method for asset request");

        let mut response = empty_response(StatusCode::METHOD_NOT_ALLOWED);
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));

        return response;
    }

    let asset = match bundle.resolve(path) {
        Ok(Some(asset)) => asset,

        Ok(None) => {
            tracing::debug!(path, "asset not found");

            return empty_response(StatusCode::NOT_FOUND);
        }

        Err(AssetPathError::Traversal) | Err(AssetPathError::Malformed) => {
            tracing::warn!(path, "rejected asset path");

            return empty_response(StatusCode::BAD_REQUEST);
        }
    };

    let body: Cow<'static, [u8]> = if method == Method::HEAD {
        Cow::Borrowed(&[][..])
    } else {
        Cow::Borrowed(asset.bytes)
    };

    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&asset.mime_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(asset.bytes.len()));

    if asset.path == INDEX_FILE {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }

    response
}

fn empty_response(status: StatusCode) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Borrowed(&[][..]));
    *response.status_mut() = status;

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, uri: &str) -> Request<Vec<u8>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Vec::new())
            .unwrap()
    }

    fn get(uri: &str) -> Response<Cow<'static, [u8]>> {
        handle_request(&AssetBundle::embedded(), &request("GET", uri))
    }

    #[test]
    fn root_returns_the_index_document() {
        let response = get("inventa://localhost/");
        let index = AssetBundle::embedded().resolve("/").unwrap().unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), index.bytes);
        assert!(
            response.headers()[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");
    }

    #[test]
    fn windows_style_origin_is_served_the_same() {
        let response = get("http://inventa.localhost/assets/index.css");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CACHE_CONTROL).is_none());
        assert_eq!(
            response.headers()[CONTENT_LENGTH],
            response.body().len().to_string().as_str()
        );
    }

    #[test]
    fn head_has_headers_but_no_body() {
        let response = handle_request(
            &AssetBundle::embedded(),
            &request("HEAD", "inventa://localhost/assets/index.js"),
        );
        let asset = AssetBundle::embedded()
            .resolve("/assets/index.js")
            .unwrap()
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
        assert_eq!(
            response.headers()[CONTENT_LENGTH],
            asset.bytes.len().to_string().as_str()
        );
    }

    #[test]
    fn other_methods_are_not_allowed() {
        let response = handle_request(
            &AssetBundle::embedded(),
            &request("POST", "inventa://localhost/"),
        );

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }

    #[test]
    fn missing_assets_are_not_found() {
        assert_eq!(
            get("inventa://localhost/assets/missing.js").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn traversal_is_a_bad_request() {
        assert_eq!(
            get("inventa://localhost/assets/%2E%2E/%2E%2E/Cargo.toml").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn app_url_points_into_the_bundle() {
        let url = app_url("/").unwrap();

        assert!(is_app_url(&url));
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn external_urls_are_not_app_urls() {
        for url in [
            "https://api.openai.com/v1/chat/completions",
            "http://localhost:11434/",
            "inventa://example.com/",
        ] {
            assert!(!is_app_url(&Url::parse(url).unwrap()), "{url}");
        }
    }
}
