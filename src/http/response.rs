use std::collections::BTreeMap;

use super::{HttpHeader, HttpStatusCode, HttpVersion};

#[derive(Debug)]
pub struct HttpResponse {
    pub version: HttpVersion,
    pub status: HttpStatusCode,
    pub headers: BTreeMap<String, HttpHeader>,
    pub body: Vec<u8>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponse {
    pub fn new() -> Self {
        HttpResponse {
            version: HttpVersion::HTTP1_1,
            status: HttpStatusCode::OK,
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    pub fn start_line(&self) -> String {
        format!("{} {}", self.version, self.status)
    }

    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut response = format!("{}\r\n", self.start_line());

        for header in self.headers.values() {
            response.push_str(&format!("{}: {}\r\n", header.name, header.value));
        }

        response.push_str("\r\n");

        let mut bytes = response.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
