use crate::{
    http::{HttpRequest, HttpResponse, HttpResponseBuilder, HttpStatusCode},
    logging::Logger,
};

pub const INTERNAL_ERROR_BODY: &str = "Error interno del servidor";

/// Logs `<METHOD> <URL>` at http level for every inbound request.
pub fn log_request(request: &HttpRequest, logger: &Logger) {
    logger.http(&format!("{} {}", request.method, request.resource_path));
}

/// Logs the full error report, causes and backtrace included, and answers
/// with the same 500 whatever went wrong.
pub fn handle_error(e: &anyhow::Error, _request: &HttpRequest, logger: &Logger) -> HttpResponse {
    logger.error(&format!("{:?}", e));

    HttpResponseBuilder::new()
        .set_status(HttpStatusCode::InternalServerError)
        .set_html_body(INTERNAL_ERROR_BODY)
        .build()
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;
    use crate::http::HttpRequestRaw;
    use crate::logging::logger::tests::memory_logger;
    use crate::logging::Level;

    fn request(request_line: &str) -> HttpRequest {
        HttpRequest::from_raw_request(HttpRequestRaw {
            request_line: request_line.to_owned(),
            headers: Vec::new(),
            body: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_log_request_includes_query() {
        let (logger, sink) = memory_logger(Level::Debug);

        log_request(&request("POST /users?debug=1 HTTP/1.1"), &logger);

        assert_eq!(
            vec![(Level::Http, "POST /users?debug=1".to_owned())],
            sink.records()
        );
    }

    #[test]
    fn test_log_request_hidden_in_production() {
        let (logger, sink) = memory_logger(Level::Info);
        log_request(&request("GET / HTTP/1.1"), &logger);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_handle_error_logs_cause_chain() {
        let (logger, sink) = memory_logger(Level::Info);
        let e = Err::<(), _>(anyhow!("connection refused"))
            .context("failed to load user")
            .unwrap_err();

        let response = handle_error(&e, &request("GET /users HTTP/1.1"), &logger);

        assert_eq!(HttpStatusCode::InternalServerError, response.status);
        assert_eq!(INTERNAL_ERROR_BODY, response.body_str());

        let records = sink.records();
        assert_eq!(1, records.len());
        assert_eq!(Level::Error, records[0].0);
        assert!(records[0].1.contains("failed to load user"));
        assert!(records[0].1.contains("connection refused"));
    }
}
