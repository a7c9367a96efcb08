use std::{cell::RefCell, collections::VecDeque, ops::Range};

use crate::{
    error::FetchError,
    http_client::HttpResponse,
    repository::{GithubAsset, GithubRelease},
    traits::Transport,
};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Scripted transport: hands out queued responses in order and records
/// every request it sees.
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, FetchError>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new(responses: Vec<Result<HttpResponse, FetchError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {url}"))
    }
}

pub fn release(id: u64) -> GithubRelease {
    GithubRelease {
        id,
        tag_name: format!("v1.0.{id}"),
        name: format!("Release {id}"),
        draft: false,
        prerelease: false,
        assets: vec![GithubAsset {
            id: id * 10,
            url: format!("https://api.github.com/repos/a/b/releases/assets/{}", id * 10),
            name: format!("b-{id}.tar.gz"),
            size: 1024,
        }],
    }
}

/// A 200 response whose body holds releases `ids`, advertising `last_page`
/// in the `link` header when given.
pub fn page_response(ids: Range<u64>, last_page: Option<u32>) -> HttpResponse {
    let releases: Vec<_> = ids.map(release).collect();
    let link = last_page.map(|last| {
        format!(
            "<https://api.github.com/repositories/1/releases?per_page=100&page=2>; rel=\"next\", \
             <https://api.github.com/repositories/1/releases?per_page=100&page={last}>; rel=\"last\""
        )
    });

    HttpResponse {
        status: 200,
        reason: "OK".into(),
        link,
        body: serde_json::to_vec(&releases).unwrap(),
    }
}

pub fn error_response(status: u16, reason: &str) -> HttpResponse {
    HttpResponse {
        status,
        reason: reason.into(),
        link: None,
        body: br#"{"message":"error"}"#.to_vec(),
    }
}
