//! Blocking feed download with a full diagnostic on failure.
//!
//! A failed fetch is otherwise hard to debug (servers reject unknown
//! agents, redirect to login pages, return HTML error pages...), so every
//! failure is captured as a [`FetchFailure`] holding the request, whatever
//! the transport reported, and the response if there was one. Printing it
//! is left to the caller.

use std::fmt;
use std::process::Command;

use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderMap, USER_AGENT};
use url::Url;

/// Agent reported when `wget --version` cannot be read.
const FALLBACK_WGET_VERSION: &str = "1.21.4";

const NO_PAYLOAD: &str = "<none>";
const UNREADABLE_PAYLOAD: &str = "<unable to read response payload>";

/// Everything known about a failed feed request.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub url: String,
    pub request_headers: Vec<(String, String)>,
    pub request_body: Option<String>,
    /// Transport-level detail, outermost error first.
    pub transport_log: Vec<String>,
    pub response: Option<FailedResponse>,
    pub summary: String,
}

/// Response received for a request that did not succeed.
#[derive(Debug, Clone)]
pub struct FailedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl FetchFailure {
    /// Multi-line dump of the request and response.
    pub fn report(&self) -> String {
        let mut lines = vec![
            "--- ICS network failure ---".to_string(),
            format!("Request URL: {}", self.url),
            format!("Request headers: {}", render_headers(&self.request_headers)),
            format!(
                "Request payload: {}",
                self.request_body.as_deref().unwrap_or(NO_PAYLOAD)
            ),
            "Network detail:".to_string(),
        ];
        lines.extend(self.transport_log.iter().map(|l| format!("  {}", l)));

        if let Some(response) = &self.response {
            lines.push(format!("Response code: {}", response.status));
            lines.push(format!(
                "Response headers: {}",
                render_headers(&response.headers)
            ));
            lines.push(format!("Response payload: {}", response.body));
        }

        lines.push(format!("Error summary: {}", self.summary));
        lines.join("\n")
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.url)
    }
}

/// `Wget/<version>` matching the locally installed wget.
pub fn wget_user_agent() -> String {
    // Output begins with: 'GNU Wget 1.21.4 built on ...'
    let version = Command::new("wget")
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| {
            let stdout = String::from_utf8_lossy(&output.stdout);
            stdout
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(2))
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_WGET_VERSION.to_string());

    format!("Wget/{}", version)
}

/// GET `url` and return the body as text.
///
/// Any transport error or non-success status becomes a [`FetchFailure`].
pub fn fetch_text(url: &Url, user_agent: &str) -> Result<String, FetchFailure> {
    let client = Client::builder()
        .build()
        .map_err(|e| FetchFailure::from_transport(url.as_str(), Vec::new(), None, &e))?;

    let request = client
        .get(url.as_str())
        .header(USER_AGENT, user_agent)
        .build()
        .map_err(|e| FetchFailure::from_transport(url.as_str(), Vec::new(), None, &e))?;

    let request_headers = header_pairs(request.headers());
    let request_body = request_payload(&request);

    log::debug!("Fetching feed {} as {}", url, user_agent);

    let response = client.execute(request).map_err(|e| {
        FetchFailure::from_transport(url.as_str(), request_headers.clone(), request_body.clone(), &e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let headers = header_pairs(response.headers());
        let body = response
            .text()
            .unwrap_or_else(|_| UNREADABLE_PAYLOAD.to_string());

        return Err(FetchFailure {
            url: url.to_string(),
            request_headers,
            request_body,
            transport_log: Vec::new(),
            response: Some(FailedResponse {
                status: status.as_u16(),
                headers,
                body,
            }),
            summary: format!("HTTP status {}", status),
        });
    }

    log::debug!("Feed {} answered {}", url, status);

    response.text().map_err(|e| {
        FetchFailure::from_transport(url.as_str(), request_headers.clone(), request_body.clone(), &e)
    })
}

impl FetchFailure {
    fn from_transport(
        url: &str,
        request_headers: Vec<(String, String)>,
        request_body: Option<String>,
        err: &reqwest::Error,
    ) -> Self {
        let mut transport_log = Vec::new();
        if err.is_connect() {
            transport_log.push("connection could not be established".to_string());
        }
        if err.is_timeout() {
            transport_log.push("request timed out".to_string());
        }
        transport_log.extend(error_chain(err));

        FetchFailure {
            url: url.to_string(),
            request_headers,
            request_body,
            transport_log,
            response: None,
            summary: err.to_string(),
        }
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    chain
}

fn request_payload(request: &Request) -> Option<String> {
    request
        .body()
        .and_then(|body| body.as_bytes())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect()
}

fn render_headers(headers: &[(String, String)]) -> String {
    let pairs: Vec<String> = headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_fetch_returns_body_and_sends_agent() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/feed.ics")
            .match_header("user-agent", "Wget/9.9")
            .with_status(200)
            .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
            .create();

        let url = Url::parse(&format!("{}/feed.ics", server.url())).unwrap();
        let body = fetch_text(&url, "Wget/9.9").unwrap();

        assert!(body.starts_with("BEGIN:VCALENDAR"));
        mock.assert();
    }

    #[test]
    fn error_status_captures_request_and_response() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/private.ics")
            .with_status(403)
            .with_header("x-reason", "login required")
            .with_body("<html>Forbidden</html>")
            .create();

        let url = Url::parse(&format!("{}/private.ics", server.url())).unwrap();
        let failure = fetch_text(&url, "Wget/1.21.4").unwrap_err();

        assert_eq!(failure.url, url.to_string());
        assert!(
            failure
                .request_headers
                .iter()
                .any(|(k, v)| k == "user-agent" && v == "Wget/1.21.4")
        );
        assert_eq!(failure.request_body, None);

        let response = failure.response.as_ref().expect("response should be captured");
        assert_eq!(response.status, 403);
        assert_eq!(response.body, "<html>Forbidden</html>");
        assert!(
            response
                .headers
                .iter()
                .any(|(k, v)| k == "x-reason" && v == "login required")
        );

        let report = failure.report();
        assert!(report.contains(&format!("Request URL: {}", url)));
        assert!(report.contains("Request payload: <none>"));
        assert!(report.contains("Response code: 403"));
        assert!(report.contains("<html>Forbidden</html>"));
    }

    #[test]
    fn unreachable_host_records_transport_detail() {
        // Port 9 (discard) on localhost is not expected to be listening
        let url = Url::parse("http://127.0.0.1:9/feed.ics").unwrap();
        let failure = fetch_text(&url, "Wget/1.21.4").unwrap_err();

        assert!(failure.response.is_none());
        assert!(!failure.transport_log.is_empty());
        assert!(!failure.request_headers.is_empty());

        let report = failure.report();
        assert!(report.contains("Request URL: http://127.0.0.1:9/feed.ics"));
        assert!(report.contains("user-agent: Wget/1.21.4"));
        assert!(!report.contains("Response code"));
    }

    #[test]
    fn wget_agent_has_expected_shape() {
        let agent = wget_user_agent();
        assert!(agent.starts_with("Wget/"));
        assert!(agent.len() > "Wget/".len());
    }
}
