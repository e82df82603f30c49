//! In-memory object store speaking just enough of the Cloud Files API for
//! end-to-end adapter tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use chrono::DateTime;
use rackfs_cloudfiles::{
    CloudFilesAdapter, Credentials, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
};
use rackfs_shared::StoreResult;
use serde_json::json;

pub const IDENTITY_URL: &str = "https://identity.test/v2.0";
pub const STORAGE_URL: &str = "https://storage.test/v1/acct";
pub const CDN_URL: &str = "https://cdn.test/v1/acct";
pub const CDN_URI: &str = "http://abc123.r1.cf1.test";
pub const CONTAINER: &str = "assets";
pub const TOKEN: &str = "tok-abc";

/// First modification time handed out by the store.
pub const EPOCH: i64 = 1_714_557_600;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
    modified: i64,
}

#[derive(Debug, Default)]
struct State {
    /// Objects keyed by their encoded location inside the container.
    objects: BTreeMap<String, StoredObject>,
    clock: i64,
    cdn_enabled: bool,
    fail_copy: bool,
    log: Vec<(HttpMethod, String)>,
}

/// Shared handle to the fake store; clones see the same objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent COPY fail with 500.
    pub fn fail_copies(&self) {
        self.with_state(|s| s.fail_copy = true);
    }

    /// Insert an object directly, bypassing the adapter.
    pub fn seed(&self, location: &str, data: &[u8], content_type: &str) {
        self.with_state(|s| {
            let modified = s.tick();
            s.objects.insert(
                location.to_string(),
                StoredObject {
                    data: Bytes::copy_from_slice(data),
                    content_type: content_type.to_string(),
                    modified,
                },
            );
        });
    }

    /// Encoded locations currently stored.
    pub fn locations(&self) -> Vec<String> {
        self.with_state(|s| s.objects.keys().cloned().collect())
    }

    /// Requests seen so far, excluding authentication.
    pub fn requests(&self) -> Vec<(HttpMethod, String)> {
        self.with_state(|s| s.log.clone())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl State {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        EPOCH + self.clock - 1
    }

    fn object_headers(response: HttpResponse, object: &StoredObject) -> HttpResponse {
        let modified = DateTime::from_timestamp(object.modified, 0).unwrap_or_default();
        response
            .with_header("Content-Type", object.content_type.clone())
            .with_header("Content-Length", object.data.len().to_string())
            .with_header("Last-Modified", modified.to_rfc2822())
    }

    fn handle_object(&mut self, request: &HttpRequest, location: &str) -> HttpResponse {
        match request.method {
            HttpMethod::Put => {
                let modified = self.tick();
                let object = StoredObject {
                    data: request.body.clone().unwrap_or_default(),
                    content_type: request
                        .header("Content-Type")
                        .unwrap_or("application/octet-stream")
                        .to_string(),
                    modified,
                };
                let response = State::object_headers(HttpResponse::new(201), &object)
                    .with_header("Content-Length", "0");
                self.objects.insert(location.to_string(), object);
                response
            }
            HttpMethod::Get | HttpMethod::Head => match self.objects.get(location) {
                Some(object) => {
                    let response = State::object_headers(HttpResponse::new(200), object);
                    if request.method == HttpMethod::Get {
                        response.with_body(object.data.clone())
                    } else {
                        response
                    }
                }
                None => HttpResponse::new(404),
            },
            HttpMethod::Delete => match self.objects.remove(location) {
                Some(_) => HttpResponse::new(204),
                None => HttpResponse::new(404),
            },
            HttpMethod::Copy => {
                if self.fail_copy {
                    return HttpResponse::new(500);
                }
                let destination = request
                    .header("Destination")
                    .and_then(|d| d.strip_prefix(&format!("{CONTAINER}/")))
                    .map(str::to_string);
                match (self.objects.get(location).cloned(), destination) {
                    (Some(mut object), Some(destination)) => {
                        object.modified = self.tick();
                        self.objects.insert(destination, object);
                        HttpResponse::new(201)
                    }
                    (None, _) => HttpResponse::new(404),
                    (_, None) => HttpResponse::new(400),
                }
            }
            HttpMethod::Post => HttpResponse::new(405),
        }
    }

    fn handle_listing(&self, directory: &str) -> HttpResponse {
        let directory = directory.trim_end_matches('/');
        let prefix = if directory.is_empty() {
            String::new()
        } else {
            format!("{directory}/")
        };

        let listing: Vec<_> = self
            .objects
            .iter()
            .filter_map(|(location, object)| {
                let relative = location.strip_prefix(&prefix)?;
                let name = relative
                    .split('/')
                    .map(|s| urlencoding::decode(s).map(|d| d.into_owned()))
                    .collect::<Result<Vec<_>, _>>()
                    .ok()?
                    .join("/");
                let modified = DateTime::from_timestamp(object.modified, 0).unwrap_or_default();
                Some(json!({
                    "name": name,
                    "content_type": object.content_type,
                    "bytes": object.data.len(),
                    "last_modified": modified.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
                    "hash": "d41d8cd98f00b204e9800998ecf8427e",
                }))
            })
            .collect();

        if listing.is_empty() {
            return HttpResponse::new(204);
        }
        HttpResponse::new(200).with_body(serde_json::Value::Array(listing).to_string())
    }

    fn handle_cdn(&mut self, request: &HttpRequest) -> HttpResponse {
        match request.method {
            HttpMethod::Put => {
                self.cdn_enabled = request.header("X-CDN-Enabled") == Some("True");
                HttpResponse::new(201)
            }
            HttpMethod::Head if self.cdn_enabled => {
                HttpResponse::new(204).with_header("X-Cdn-Uri", CDN_URI)
            }
            _ => HttpResponse::new(404),
        }
    }
}

fn auth_response() -> HttpResponse {
    let body = json!({
        "access": {
            "token": {"id": TOKEN, "expires": "2030-01-01T00:00:00Z"},
            "serviceCatalog": [
                {"name": "cloudFiles", "endpoints": [
                    {"region": "DFW", "publicURL": "https://storage.dfw.test/v1/acct"},
                    {"region": "ORD", "publicURL": STORAGE_URL}
                ]},
                {"name": "cloudFilesCDN", "endpoints": [
                    {"region": "ORD", "publicURL": CDN_URL}
                ]}
            ]
        }
    });
    HttpResponse::new(200).with_body(body.to_string())
}

impl HttpTransport for MemoryStore {
    fn send(&self, request: HttpRequest) -> StoreResult<HttpResponse> {
        if request.method == HttpMethod::Post && request.url == format!("{IDENTITY_URL}/tokens") {
            return Ok(auth_response());
        }

        self.with_state(|state| {
            state.log.push((request.method, request.url.clone()));

            if request.header("X-Auth-Token") != Some(TOKEN) {
                return Ok(HttpResponse::new(401));
            }

            let (path, query) = request
                .url
                .split_once('?')
                .unwrap_or((request.url.as_str(), ""));

            if let Some(rest) = path.strip_prefix(&format!("{CDN_URL}/")) {
                return Ok(if rest == CONTAINER {
                    state.handle_cdn(&request)
                } else {
                    HttpResponse::new(404)
                });
            }

            let Some(rest) = path.strip_prefix(&format!("{STORAGE_URL}/{CONTAINER}")) else {
                return Ok(HttpResponse::new(404));
            };
            let location = rest.strip_prefix('/').unwrap_or(rest);

            if request.method == HttpMethod::Get && query == "format=json" {
                return Ok(state.handle_listing(location));
            }
            Ok(state.handle_object(&request, location))
        })
    }
}

/// Adapter authenticated against a fresh store, in region ORD on `assets`.
pub fn connect(store: &MemoryStore) -> CloudFilesAdapter<MemoryStore> {
    let mut adapter = CloudFilesAdapter::connect(
        store.clone(),
        &Credentials::new("tester", "secret-key"),
        IDENTITY_URL,
    )
    .expect("authentication should succeed");
    adapter
        .object_store_service("cloudFiles", "ORD")
        .set_container_name(CONTAINER);
    adapter
}
