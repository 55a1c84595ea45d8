use anyhow::{bail, Context, Result};
use std::{collections::HashMap, str::FromStr};

use super::{HttpHeader, HttpMethod, HttpRequestRaw, HttpVersion};

#[derive(Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path as sent by the client, query string included.
    pub resource_path: String,
    pub version: HttpVersion,

    pub url: String,
    pub query: HashMap<String, String>,

    pub headers: HashMap<String, HttpHeader>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn from_raw_request(raw_request: HttpRequestRaw) -> Result<HttpRequest> {
        let (method, resource_path, version) =
            Self::parse_request_line(&raw_request.request_line)?;

        let (url, query) = match resource_path.split_once('?') {
            Some((url, query_line)) => (url.to_owned(), Self::parse_query_line(query_line)?),
            None => (resource_path.clone(), HashMap::new()),
        };

        let headers: HashMap<String, HttpHeader> = raw_request
            .headers
            .into_iter()
            .map(|header| (header.name.to_ascii_lowercase(), header))
            .collect();

        Ok(HttpRequest {
            method,
            resource_path,
            version,
            url,
            query,
            headers,
            body: raw_request.body,
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|header| header.value.as_str())
    }

    pub fn parse_request_line(start_line: &str) -> Result<(HttpMethod, String, HttpVersion)> {
        let mut parts = start_line.split_whitespace();

        let verb = parts.next().context("start line should have HTTP verb")?;
        let verb = HttpMethod::from_str(verb)?;

        let resource_path = parts
            .next()
            .context("start line should have resource path")?
            .to_owned();

        if !resource_path.starts_with('/') {
            bail!("resource path should be absolute: {}", resource_path);
        }

        let version = match parts.next() {
            Some(version) => HttpVersion::from_str(version)?,
            None => bail!("HTTP/0.9 requests are not supported"),
        };

        Ok((verb, resource_path, version))
    }

    fn parse_query_line(query_line: &str) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();

        for param in query_line.split('&').filter(|param| !param.is_empty()) {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            result.insert(key.to_owned(), value.to_owned());
        }

        Ok(result)
    }
}
