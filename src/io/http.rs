// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP implementation of the remote annotation store.
//!
//! Wraps the store's JSON endpoints using a blocking [`reqwest`] client.
//! Calls are made from background threads, never from the UI thread.

use crate::io::remote::{
    AnnotationList, CreateResponse, DeleteResponse, ProgressReport, RemoteStore, StoreError,
};
use crate::models::annotation::{Annotation, AnnotationId, DatasetId, ImageId, NewAnnotation};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP request timeout for a single store call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Header the store reads the CSRF token from.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for one annotation store.
pub struct HttpStore {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
    cookies: Option<String>,
}

impl HttpStore {
    /// Create a client for the store at `base_url`, e.g. `http://host:8000`.
    pub fn new(
        base_url: &str,
        csrf_token: Option<String>,
        cookies: Option<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token,
            cookies,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_cookies(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookies {
            Some(cookies) => request.header(COOKIE, cookies),
            None => request,
        }
    }

    /// Attach the headers every mutating call must carry.
    fn mutating(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        let token = self.csrf_token.as_deref().ok_or(StoreError::MissingCsrfToken)?;
        Ok(self
            .with_cookies(request)
            .header(CSRF_HEADER, token)
            .header(CONTENT_TYPE, "application/json"))
    }

    fn parse<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl RemoteStore for HttpStore {
    fn fetch_annotations(&self, image: ImageId) -> Result<Vec<Annotation>, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("/detection/api/annotations/{image}/")));
        let list: AnnotationList = Self::parse(self.with_cookies(request).send()?)?;
        Ok(list.annotations)
    }

    fn create_annotation(
        &self,
        image: ImageId,
        annotation: &NewAnnotation,
    ) -> Result<CreateResponse, StoreError> {
        let request = self
            .client
            .post(self.url(&format!("/detection/api/annotation/{image}/save/")))
            .body(serde_json::to_vec(annotation)?);
        Self::parse(self.mutating(request)?.send()?)
    }

    fn delete_annotation(&self, id: AnnotationId) -> Result<DeleteResponse, StoreError> {
        let request = self
            .client
            .delete(self.url(&format!("/detection/api/annotation/{id}/delete/")));
        Self::parse(self.mutating(request)?.send()?)
    }

    fn fetch_progress(&self, dataset: DatasetId) -> Result<ProgressReport, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("/detection/api/progress/{dataset}/")));
        Self::parse(self.with_cookies(request).send()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::NormRect;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc::{channel, Receiver};

    /// A request as it arrived on the wire; header names are lowercased.
    #[derive(Debug)]
    struct Received {
        method: String,
        path: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Received {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }
    }

    fn read_request(stream: &mut TcpStream) -> Received {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        let head_end = loop {
            if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                break end;
            }
            let n = stream.read(&mut buf).unwrap();
            assert!(n > 0, "connection closed before headers ended");
            data.extend_from_slice(&buf[..n]);
        };

        let head = String::from_utf8(data[..head_end].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap().split(' ');
        let method = request_line.next().unwrap().to_string();
        let path = request_line.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let length = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .map(|(_, v)| v.parse::<usize>().unwrap())
            .unwrap_or(0);
        while data.len() < head_end + 4 + length {
            let n = stream.read(&mut buf).unwrap();
            assert!(n > 0, "connection closed before body ended");
            data.extend_from_slice(&buf[..n]);
        }
        let body = String::from_utf8(data[head_end + 4..head_end + 4 + length].to_vec()).unwrap();

        Received {
            method,
            path,
            headers,
            body,
        }
    }

    /// Accept one connection on a local port, answer it with `status` and a
    /// JSON `body`, and hand the request back to the test.
    fn serve_once(status: &'static str, body: &'static str) -> (String, Receiver<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (sender, receiver) = channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let received = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            let _ = sender.send(received);
        });
        (format!("http://{addr}"), receiver)
    }

    fn store_at(base_url: &str, csrf_token: Option<&str>, cookies: Option<&str>) -> HttpStore {
        // No proxy so the stub is reached directly whatever the environment says.
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        HttpStore {
            client,
            base_url: base_url.to_string(),
            csrf_token: csrf_token.map(str::to_string),
            cookies: cookies.map(str::to_string),
        }
    }

    fn received(receiver: &Receiver<Received>) -> Received {
        receiver.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let store = HttpStore::new("http://localhost:8000/", None, None).unwrap();
        assert_eq!(
            store.url("/detection/api/progress/3/"),
            "http://localhost:8000/detection/api/progress/3/"
        );
    }

    #[test]
    fn test_mutating_call_without_token_is_refused() {
        let store = HttpStore::new("http://127.0.0.1:9", None, None).unwrap();
        let new = NewAnnotation {
            label: "car".to_string(),
            rect: NormRect::new(0.1, 0.1, 0.2, 0.2),
        };
        let err = store.create_annotation(ImageId(1), &new).unwrap_err();
        assert!(matches!(err, StoreError::MissingCsrfToken));
    }

    #[test]
    fn test_create_sends_flat_body_with_csrf_headers() {
        let (url, receiver) = serve_once("200 OK", r#"{"success":true,"annotation_id":42}"#);
        let store = store_at(&url, Some("tok"), Some("sessionid=abc; csrftoken=tok"));
        let new = NewAnnotation {
            label: "bicycle".to_string(),
            rect: NormRect::new(0.125, 0.1667, 0.25, 0.2333),
        };

        let response = store.create_annotation(ImageId(11), &new).unwrap();
        assert!(response.success);
        assert_eq!(response.annotation_id, Some(AnnotationId(42)));

        let request = received(&receiver);
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/detection/api/annotation/11/save/");
        assert_eq!(request.header("x-csrftoken"), Some("tok"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("cookie"), Some("sessionid=abc; csrftoken=tok"));

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        let fields = body.as_object().unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(body["label"], "bicycle");
        assert_eq!(body["x"], 0.125);
        assert_eq!(body["y"], 0.1667);
        assert_eq!(body["width"], 0.25);
        assert_eq!(body["height"], 0.2333);
        assert!(body.get("rect").is_none());
    }

    #[test]
    fn test_delete_sends_csrf_headers() {
        let (url, receiver) = serve_once("200 OK", r#"{"success":true}"#);
        let store = store_at(&url, Some("tok"), Some("csrftoken=tok"));

        let response = store.delete_annotation(AnnotationId(7)).unwrap();
        assert!(response.success);

        let request = received(&receiver);
        assert_eq!(request.method, "DELETE");
        assert_eq!(request.path, "/detection/api/annotation/7/delete/");
        assert_eq!(request.header("x-csrftoken"), Some("tok"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("cookie"), Some("csrftoken=tok"));
    }

    #[test]
    fn test_fetch_needs_no_csrf_token() {
        let (url, receiver) = serve_once(
            "200 OK",
            r#"{"annotations":[{"id":3,"label":"car","x":0.1,"y":0.2,"width":0.3,"height":0.4}]}"#,
        );
        let store = store_at(&url, None, Some("sessionid=abc"));

        let annotations = store.fetch_annotations(ImageId(11)).unwrap();
        assert_eq!(
            annotations,
            vec![Annotation {
                id: AnnotationId(3),
                label: "car".to_string(),
                rect: NormRect::new(0.1, 0.2, 0.3, 0.4),
            }]
        );

        let request = received(&receiver);
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/detection/api/annotations/11/");
        assert_eq!(request.header("cookie"), Some("sessionid=abc"));
        assert_eq!(request.header("x-csrftoken"), None);
    }

    #[test]
    fn test_progress_path() {
        let (url, receiver) = serve_once(
            "200 OK",
            r#"{"total_images":10,"annotated_images":4,"progress":40}"#,
        );
        let store = store_at(&url, None, None);

        let report = store.fetch_progress(DatasetId(2)).unwrap();
        assert_eq!(report.annotated_images, Some(4));
        assert_eq!(report.progress, Some(40));

        let request = received(&receiver);
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/detection/api/progress/2/");
        assert_eq!(request.header("cookie"), None);
    }

    #[test]
    fn test_error_status_keeps_body() {
        let (url, receiver) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let store = store_at(&url, Some("tok"), None);

        let err = store.delete_annotation(AnnotationId(1)).unwrap_err();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"error":"boom"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        received(&receiver);
    }
}
