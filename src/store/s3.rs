//! S3-compatible object store gateway
//!
//! Talks to AWS S3, MinIO, Backblaze B2, Cloudflare R2 and friends against a
//! single fixed bucket. Uses reqwest with AWS Signature Version 4 signing,
//! avoiding the heavyweight aws-sdk-s3 dependency for better compile times
//! and smaller binaries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use secrecy::ExposeSecret;
use tracing::debug;

use super::{ObjectInfo, ObjectStore, StoreError};

/// Connection parameters for the backing bucket
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3-compatible endpoint URL (None for AWS S3)
    pub endpoint: Option<String>,
    /// AWS region (e.g. us-east-1)
    pub region: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key (SecretString for memory zeroization)
    pub secret_access_key: secrecy::SecretString,
    /// Bucket name
    pub bucket: String,
    /// Use path-style addressing (for MinIO, etc.)
    pub path_style: bool,
}

pub struct S3ObjectStore {
    config: S3Config,
    client: Client,
}

impl S3ObjectStore {
    pub fn new(config: S3Config) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn endpoint(&self) -> String {
        if let Some(ref endpoint) = self.config.endpoint {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("https://s3.{}.amazonaws.com", self.config.region)
        }
    }

    /// Build the request URL for a key ("" addresses the bucket itself)
    fn build_url(&self, key: &str) -> String {
        let endpoint = self.endpoint();
        let key = key.trim_start_matches('/');

        if self.config.path_style {
            // Path-style: https://endpoint/bucket/key
            if key.is_empty() {
                format!("{}/{}", endpoint, self.config.bucket)
            } else {
                format!("{}/{}/{}", endpoint, self.config.bucket, key)
            }
        } else {
            // Virtual-hosted style: https://bucket.endpoint/key
            let endpoint_without_scheme = endpoint
                .replace("https://", "")
                .replace("http://", "");
            let scheme = if endpoint.starts_with("http://") { "http" } else { "https" };

            if key.is_empty() {
                format!("{}://{}.{}", scheme, self.config.bucket, endpoint_without_scheme)
            } else {
                format!(
                    "{}://{}.{}/{}",
                    scheme, self.config.bucket, endpoint_without_scheme, key
                )
            }
        }
    }

    /// Sign a request using AWS Signature Version 4. Every header present in
    /// `headers` ends up in the signed set.
    fn sign_request(
        &self,
        method: &str,
        url: &str,
        headers: &mut HashMap<String, String>,
        payload_hash: &str,
    ) -> Result<String, StoreError> {
        use hmac::{Hmac, Mac};
        use sha2::{Digest, Sha256};

        type HmacSha256 = Hmac<Sha256>;

        let now: DateTime<Utc> = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        headers.insert("x-amz-date".to_string(), amz_date.clone());
        headers.insert("x-amz-content-sha256".to_string(), payload_hash.to_string());

        let parsed = url::Url::parse(url).map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

        let host = parsed.host_str().unwrap_or("");
        let path = parsed.path();
        let query = parsed.query().unwrap_or("");

        headers.insert("host".to_string(), host.to_string());

        let mut signed_headers: Vec<&str> = headers.keys().map(|s| s.as_str()).collect();
        signed_headers.sort();
        let signed_headers_str = signed_headers.join(";");

        let mut canonical_headers = String::new();
        for header in &signed_headers {
            if let Some(value) = headers.get(*header) {
                canonical_headers.push_str(&format!("{}:{}\n", header.to_lowercase(), value.trim()));
            }
        }

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method, path, query, canonical_headers, signed_headers_str, payload_hash
        );

        let canonical_request_hash = {
            let mut hasher = Sha256::new();
            hasher.update(canonical_request.as_bytes());
            hex::encode(hasher.finalize())
        };

        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.config.region);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date, credential_scope, canonical_request_hash
        );

        fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
            let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }

        let k_date = hmac_sha256(
            format!("AWS4{}", self.config.secret_access_key.expose_secret()).as_bytes(),
            date_stamp.as_bytes(),
        );
        let k_region = hmac_sha256(&k_date, self.config.region.as_bytes());
        let k_service = hmac_sha256(&k_region, b"s3");
        let k_signing = hmac_sha256(&k_service, b"aws4_request");
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes()));

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.config.access_key_id, credential_scope, signed_headers_str, signature
        );

        Ok(authorization)
    }

    /// Make a signed request to the bucket
    async fn s3_request(
        &self,
        method: Method,
        key: &str,
        query_params: Option<&[(&str, &str)]>,
        extra_headers: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, StoreError> {
        use sha2::{Digest, Sha256};

        let mut url = self.build_url(key);
        if let Some(params) = query_params {
            let query: String = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            if !query.is_empty() {
                url = format!("{}?{}", url, query);
            }
        }

        let payload = body.as_deref().unwrap_or(&[]);
        let payload_hash = {
            let mut hasher = Sha256::new();
            hasher.update(payload);
            hex::encode(hasher.finalize())
        };

        let mut headers = HashMap::new();
        for (name, value) in extra_headers {
            headers.insert(name.to_string(), value.clone());
        }
        let authorization = self.sign_request(method.as_str(), &url, &mut headers, &payload_hash)?;

        let mut request = self.client.request(method, &url);
        for (name, value) in headers {
            request = request.header(&name, &value);
        }
        request = request.header("Authorization", authorization);

        if let Some(body_data) = body {
            request = request.body(body_data);
        }

        request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))
    }

    /// Parse one page of a ListObjectsV2 XML response into object infos plus
    /// the continuation token, if any. Directory markers come back as regular
    /// keys ending in `/`; with a delimiter, deeper keys arrive collapsed as
    /// CommonPrefixes entries (size 0).
    fn parse_list_response(
        &self,
        xml: &str,
    ) -> Result<(Vec<ObjectInfo>, Option<String>), StoreError> {
        let mut entries = Vec::new();

        let contents_pattern = regex::Regex::new(r"(?s)<Contents>(.*?)</Contents>")
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        for cap in contents_pattern.captures_iter(xml) {
            if let Some(content) = cap.get(1) {
                let content_str = content.as_str();

                let key = match extract_xml_tag(content_str, "Key") {
                    Some(key) => key,
                    None => continue,
                };

                let size: u64 = extract_xml_tag(content_str, "Size")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);

                entries.push(ObjectInfo { key, size });
            }
        }

        let prefix_pattern =
            regex::Regex::new(r"<CommonPrefixes>.*?<Prefix>([^<]+)</Prefix>.*?</CommonPrefixes>")
                .map_err(|e| StoreError::Parse(e.to_string()))?;

        for cap in prefix_pattern.captures_iter(xml) {
            if let Some(prefix_match) = cap.get(1) {
                entries.push(ObjectInfo {
                    key: prefix_match.as_str().to_string(),
                    size: 0,
                });
            }
        }

        let continuation_token = extract_xml_tag(xml, "NextContinuationToken");

        Ok((entries, continuation_token))
    }
}

/// Extract content from an XML tag
fn extract_xml_tag(xml: &str, tag: &str) -> Option<String> {
    let pattern = format!(r"<{}[^>]*>([^<]*)</{}>", tag, tag);
    if let Ok(re) = regex::Regex::new(&pattern) {
        if let Some(cap) = re.captures(xml) {
            if let Some(content) = cap.get(1) {
                let text = content.as_str().trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn stat(&self, key: &str) -> Result<ObjectInfo, StoreError> {
        let response = self
            .s3_request(Method::HEAD, key, None, &[], None)
            .await?;

        match response.status() {
            StatusCode::OK => {
                let size = response
                    .headers()
                    .get("content-length")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);

                Ok(ObjectInfo {
                    key: key.to_string(),
                    size,
                })
            }
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchKey(key.to_string())),
            status => Err(StoreError::Server(format!(
                "HEAD failed with status: {}",
                status
            ))),
        }
    }

    async fn list(&self, prefix: &str, recursive: bool) -> Result<Vec<ObjectInfo>, StoreError> {
        let mut all_entries = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![("list-type", "2"), ("max-keys", "1000")];

            if !prefix.is_empty() {
                params.push(("prefix", prefix));
            }
            if !recursive {
                params.push(("delimiter", "/"));
            }

            let token_str: String;
            if let Some(ref token) = continuation_token {
                token_str = token.clone();
                params.push(("continuation-token", &token_str));
            }

            let response = self
                .s3_request(Method::GET, "", Some(&params), &[], None)
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let xml = response
                        .text()
                        .await
                        .map_err(|e| StoreError::Parse(e.to_string()))?;

                    let (entries, next_token) = self.parse_list_response(&xml)?;
                    all_entries.extend(entries);

                    if let Some(token) = next_token {
                        continuation_token = Some(token);
                    } else {
                        break;
                    }
                }
                status => {
                    return Err(StoreError::Server(format!(
                        "List failed with status: {}",
                        status
                    )));
                }
            }
        }

        debug!(prefix, recursive, count = all_entries.len(), "listed objects");
        Ok(all_entries)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let response = self.s3_request(Method::GET, key, None, &[], None).await?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| StoreError::Network(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchKey(key.to_string())),
            status => Err(StoreError::Server(format!(
                "GET failed with status: {}",
                status
            ))),
        }
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut extra_headers = Vec::new();
        if let Some(content_type) = content_type {
            extra_headers.push(("content-type", content_type.to_string()));
        }

        let response = self
            .s3_request(Method::PUT, key, None, &extra_headers, Some(data))
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Server(format!(
                    "PUT failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    async fn copy(&self, source_key: &str, dest_key: &str) -> Result<(), StoreError> {
        let copy_source = format!("/{}/{}", self.config.bucket, source_key.trim_start_matches('/'));
        let extra_headers = vec![("x-amz-copy-source", copy_source)];

        let response = self
            .s3_request(Method::PUT, dest_key, None, &extra_headers, None)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchKey(source_key.to_string())),
            status => Err(StoreError::Server(format!(
                "Copy failed with status: {}",
                status
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let response = self
            .s3_request(Method::DELETE, key, None, &[], None)
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT | StatusCode::ACCEPTED => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NoSuchKey(key.to_string())),
            status => Err(StoreError::Server(format!(
                "Delete failed with status: {}",
                status
            ))),
        }
    }
}
