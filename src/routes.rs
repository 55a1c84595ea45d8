use anyhow::Result;

use crate::{
    http::{HttpRequest, HttpResponse, HttpResponseBuilder, HttpStatusCode},
    logging::{Level, Logger},
};

pub const LOGGER_TEST_BODY: &str = "Logs generados en la consola";

/// Smoke test for the gate: one line per level, lowest first.
pub fn get_logger_test(_request: &HttpRequest, logger: &Logger) -> Result<HttpResponse> {
    for level in Level::ALL {
        logger.log(level, &format!("Mensaje de prueba: {}", level));
    }

    Ok(HttpResponseBuilder::new()
        .set_status(HttpStatusCode::OK)
        .set_html_body(LOGGER_TEST_BODY)
        .build())
}
