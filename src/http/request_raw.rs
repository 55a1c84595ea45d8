use anyhow::{bail, Context, Result};
use std::{
    io::{BufRead, BufReader, Read},
    net::TcpStream,
};

use super::HttpHeader;

/// Largest body accepted. Anything declared above it is rejected before
/// reading.
pub const MAX_BODY_LEN: usize = 1024 * 1024;

pub struct HttpRequestRaw {
    pub request_line: String,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl HttpRequestRaw {
    pub fn from_tcp(stream: &TcpStream) -> Result<HttpRequestRaw> {
        Self::from_reader(BufReader::new(stream))
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<HttpRequestRaw> {
        let mut request_line = String::new();
        let mut headers = Vec::new();

        reader.read_line(&mut request_line)?;

        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            if line.trim().is_empty() {
                break;
            }

            if let Some(header) = HttpHeader::from_line(&line) {
                headers.push(header);
            }

            line.clear();
        }

        let mut body = Vec::new();
        if let Some(content_len) = headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case("Content-Length"))
        {
            let content_len: usize = content_len
                .value
                .parse()
                .context("Content-Length should be a number")?;
            if content_len > MAX_BODY_LEN {
                bail!(
                    "body of {} bytes exceeds the {} byte limit",
                    content_len,
                    MAX_BODY_LEN
                );
            }

            reader.take(content_len as u64).read_to_end(&mut body)?;
            if body.len() < content_len {
                bail!(
                    "body ended after {} of {} declared bytes",
                    body.len(),
                    content_len
                );
            }
        }

        Ok(HttpRequestRaw {
            request_line,
            headers,
            body,
        })
    }
}
