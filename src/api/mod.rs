// API module entry
// The exam aggregation endpoint: GET /api/exams

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::exams::{self, Subject};
use crate::handler::router::RequestContext;
use crate::http::{self, encoding};
use crate::logger;

/// Handle `GET /api/exams`
///
/// Runs the aggregation pass on a blocking thread (the walk does synchronous
/// filesystem reads), then serializes the result. Any aggregation failure
/// turns into an all-or-nothing 500; there is no partial response.
pub async fn serve_exams(ctx: &RequestContext<'_>, config: &Arc<Config>) -> Response<Full<Bytes>> {
    let exam_dir = PathBuf::from(&config.content.exam_dir);
    let result = tokio::task::spawn_blocking(move || exams::aggregate(&exam_dir)).await;

    let subjects = match result {
        Ok(Ok(subjects)) => subjects,
        Ok(Err(e)) => {
            logger::log_error(&format!("Aggregation failed: {e}"));
            return http::build_500_response(&format!("Failed to read exam files: {e}"));
        }
        Err(e) => {
            logger::log_error(&format!("Aggregation task panicked: {e}"));
            return http::build_500_response(&format!("Failed to read exam files: {e}"));
        }
    };

    build_exams_response(&subjects, ctx.accepts_gzip, ctx.is_head)
}

/// Serialize the aggregation result, compressing when the client asked for it
fn build_exams_response(
    subjects: &[Subject],
    accepts_gzip: bool,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = match serde_json::to_vec(subjects) {
        Ok(b) => b,
        Err(e) => {
            logger::log_error(&format!("Serialization failed: {e}"));
            return http::build_500_response(&format!("Failed to encode response: {e}"));
        }
    };

    if accepts_gzip {
        match encoding::gzip(&body) {
            Ok(compressed) => return build_gzip_response(compressed, is_head),
            Err(e) => {
                // Fall through to the identity response
                logger::log_warning(&format!("Gzip compression failed: {e}"));
            }
        }
    }

    http::response::build_ok_response(Bytes::from(body), "application/json", is_head)
}

/// Build the compressed 200 response
///
/// No Content-Length header here: an explicit length would describe the
/// uncompressed payload, not the bytes on the wire.
fn build_gzip_response(compressed: Vec<u8>, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(compressed)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Content-Encoding", "gzip")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build gzip response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Path served by this module, dispatched from the router
pub const EXAMS_PATH: &str = "/api/exams";

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;

    fn sample_subjects() -> Vec<Subject> {
        vec![Subject {
            name: "math".to_string(),
            exams: vec![exams::ExamEntry {
                name: "a.json".to_string(),
                content: json!({"q": 1}),
            }],
        }]
    }

    #[test]
    fn test_identity_response() {
        let resp = build_exams_response(&sample_subjects(), false, false);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        assert!(resp.headers().get("Content-Encoding").is_none());
        assert!(resp.headers().get("Content-Length").is_some());
    }

    #[test]
    fn test_gzip_response_headers_and_body() {
        let subjects = sample_subjects();
        let resp = build_exams_response(&subjects, true, false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Encoding").unwrap(), "gzip");
        // A stale length would mismatch the compressed byte count
        assert!(resp.headers().get("Content-Length").is_none());
    }

    #[test]
    fn test_gzip_body_decompresses_to_identity() {
        let subjects = sample_subjects();
        let expected = serde_json::to_vec(&subjects).unwrap();
        let compressed = encoding::gzip(&expected).unwrap();

        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).unwrap();
        assert_eq!(decompressed, expected);
    }

    #[tokio::test]
    async fn test_missing_exam_root_is_a_500_with_fixed_prefix() {
        use http_body_util::BodyExt;

        let config = Arc::new(crate::config::Config::load_from("no_such_config_file").unwrap());
        // Default exam_dir is "json" relative to the working directory; point
        // somewhere that cannot exist instead.
        let mut cfg = (*config).clone();
        cfg.content.exam_dir = "/nonexistent/exam/root".to_string();
        let config = Arc::new(cfg);

        let ctx = RequestContext {
            path: EXAMS_PATH,
            is_head: false,
            accepts_gzip: false,
            access_log: false,
        };

        let resp = serve_exams(&ctx, &config).await;
        assert_eq!(resp.status(), 500);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Failed to read exam files: "));
    }

    #[test]
    fn test_head_gzip_body_is_empty() {
        let resp = build_exams_response(&sample_subjects(), true, true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Encoding").unwrap(), "gzip");
    }
}
