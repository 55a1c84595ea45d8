use chrono::{DateTime, Utc};
use log::trace;

use super::{HttpHeader, HttpResponse, HttpStatusCode};

pub struct HttpResponseBuilder {
    response: HttpResponse,
}

impl Default for HttpResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponseBuilder {
    pub fn new() -> Self {
        HttpResponseBuilder {
            response: HttpResponse::new(),
        }
        .set_date(Utc::now())
        .set_header("Connection", "close")
        .set_header("Content-Length", "0")
    }

    pub fn build(self) -> HttpResponse {
        trace!("{:?}", self.response);
        self.response
    }

    pub fn set_status(mut self, status: HttpStatusCode) -> Self {
        self.response.status = status;
        self
    }

    pub fn set_header(mut self, key: &str, value: &str) -> Self {
        self.response
            .headers
            .insert(key.to_owned(), HttpHeader::new(key, value));
        self
    }

    pub fn set_date(self, date: DateTime<Utc>) -> Self {
        let date = date.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        self.set_header("Date", &date)
    }

    pub fn set_content_type(self, content_type: &str) -> Self {
        self.set_header("Content-Type", content_type)
    }

    pub fn set_html_body(mut self, body: &str) -> Self {
        let length = body.len().to_string();

        self.response.body = body.as_bytes().to_vec();
        self.set_content_type("text/html; charset=utf-8")
            .set_header("Content-Length", &length)
    }
}
