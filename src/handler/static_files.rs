//! Static file serving module
//!
//! Handles static file loading, MIME type detection, and response building.

use crate::handler::router::RequestContext;
use crate::http::{mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Serve a static file resolved against the static root
pub async fn serve(ctx: &RequestContext<'_>, static_dir: &str) -> Response<Full<Bytes>> {
    match load_from_directory(static_dir, ctx.path).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            response::build_ok_response(Bytes::from(content), content_type, ctx.is_head)
        }
        None => crate::http::build_404_response(),
    }
}

/// Load a static file from the directory with index file support
async fn load_from_directory(static_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(static_dir).join(&clean_path);

    // Security: ensure file_path stays within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Directory paths fall back to an index file
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in INDEX_FILES {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}
