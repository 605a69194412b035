// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Blob storage access via signed URLs.
//!
//! Audio payloads never pass through the catalog. Clients receive a
//! time-limited URL and talk to blob storage directly. The catalog only
//! depends on [`BlobSigner`]; [`KeyedUrlSigner`] is the bundled
//! implementation, signing with a keyed BLAKE3 hash.
//!
//! Signed URLs are capabilities. They are logged at debug level only.

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use thiserror::Error;
use url::{Url, form_urlencoded};

use crate::{config::BlobConfig, model::TrackKey};

const KEY_DERIVATION_CONTEXT: &str = "musify 2026 blob url signing";

#[derive(Debug, Error)]
pub enum SignError {
    #[error("blob signing secret is not configured")]
    MissingSecret,

    #[error("blob url signing is not configured")]
    NotConfigured,

    #[error("invalid blob base url")]
    BaseUrl(#[from] url::ParseError),

    #[error("blob base url {0} cannot carry a path")]
    CannotBeABase(String),

    #[error("signed url expiry is out of range")]
    Expiry(#[from] jiff::Error),

    #[error("blob key {0:?} has an empty, `.` or `..` segment")]
    UnsafeBlobKey(String),
}

/// A capability-bearing URL and the instant it stops working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedUrl {
    pub url: Url,
    pub expires_at: Timestamp,
}

pub trait BlobSigner {
    /// Short-lived URL permitting a single `PUT` of the payload.
    fn issue_upload_url(&self, blob_key: &str) -> Result<SignedUrl, SignError>;

    /// Longer-lived URL permitting `GET` of the payload.
    fn issue_download_url(&self, blob_key: &str) -> Result<SignedUrl, SignError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Put,
    Get,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Put => "PUT",
            Method::Get => "GET",
        }
    }
}

/// Derives the blob key under which the payload of a track is stored.
///
/// Each key component is form-url-encoded, so a `/` inside a name cannot
/// make two different tracks share a blob key. Names made only of dots are
/// escaped as well, otherwise they would read as relative path segments.
pub fn blob_key_for(key: &TrackKey) -> String {
    let artist = key_component(key.artist());
    let song = key_component(key.song());
    format!("tracks/{artist}/{song}.mp3")
}

fn key_component(name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    if is_dot_segment(&encoded) {
        encoded.replace('.', "%2E")
    } else {
        encoded
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Splits a blob key into URL path segments.
///
/// The URL parser collapses `.` and `..` segments, so such keys would be
/// signed for one object and point at another. They are refused, as are
/// empty segments.
fn path_segments(blob_key: &str) -> Result<Vec<&str>, SignError> {
    let segments: Vec<&str> = blob_key.split('/').collect();
    if segments.iter().any(|s| s.is_empty() || is_dot_segment(s)) {
        return Err(SignError::UnsafeBlobKey(blob_key.to_owned()));
    }
    Ok(segments)
}

pub struct KeyedUrlSigner {
    base_url: Url,
    bucket: String,
    key: [u8; 32],
    upload_ttl: SignedDuration,
    download_ttl: SignedDuration,
}

impl std::fmt::Debug for KeyedUrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedUrlSigner")
            .field("base_url", &self.base_url.as_str())
            .field("bucket", &self.bucket)
            .field("upload_ttl", &self.upload_ttl)
            .field("download_ttl", &self.download_ttl)
            .finish_non_exhaustive()
    }
}

impl KeyedUrlSigner {
    pub fn new(config: &BlobConfig) -> Result<Self, SignError> {
        if config.signing_secret.is_empty() {
            return Err(SignError::MissingSecret);
        }

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SignError::CannotBeABase(config.base_url.clone()));
        }

        Ok(Self {
            base_url,
            bucket: config.bucket.clone(),
            key: blake3::derive_key(KEY_DERIVATION_CONTEXT, config.signing_secret.as_bytes()),
            upload_ttl: SignedDuration::from_secs(i64::from(config.upload_ttl_secs)),
            download_ttl: SignedDuration::from_secs(i64::from(config.download_ttl_secs)),
        })
    }

    fn sign_at(&self, method: Method, blob_key: &str, now: Timestamp) -> Result<SignedUrl, SignError> {
        let ttl = match method {
            Method::Put => self.upload_ttl,
            Method::Get => self.download_ttl,
        };
        let segments = path_segments(blob_key)?;
        let expires_at = now.checked_add(ttl)?;
        let expires = expires_at.as_second();
        let signature = self.signature(method, blob_key, expires);

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SignError::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&self.bucket)
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("method", method.as_str())
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", signature.to_hex().as_str());

        log::debug!("Signed {} url for {blob_key}: {url}", method.as_str());

        Ok(SignedUrl { url, expires_at })
    }

    fn signature(&self, method: Method, blob_key: &str, expires: i64) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(method.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.bucket.as_bytes());
        hasher.update(b"\n");
        hasher.update(blob_key.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.to_string().as_bytes());
        hasher.finalize()
    }

    /// Checks a signature issued by this signer.
    ///
    /// Fails for foreign or tampered signatures and once `now` is past
    /// `expires`. The hash comparison is constant time.
    pub fn verify(
        &self,
        method: Method,
        blob_key: &str,
        expires: i64,
        signature: &str,
        now: Timestamp,
    ) -> bool {
        if now.as_second() > expires {
            return false;
        }

        let Ok(signature) = blake3::Hash::from_hex(signature) else {
            return false;
        };

        signature == self.signature(method, blob_key, expires)
    }
}

impl BlobSigner for KeyedUrlSigner {
    fn issue_upload_url(&self, blob_key: &str) -> Result<SignedUrl, SignError> {
        self.sign_at(Method::Put, blob_key, Timestamp::now())
    }

    fn issue_download_url(&self, blob_key: &str) -> Result<SignedUrl, SignError> {
        self.sign_at(Method::Get, blob_key, Timestamp::now())
    }
}

/// An absent signer refuses to sign, so catalog operations that never touch
/// blob storage keep working without signing configuration.
impl<B: BlobSigner> BlobSigner for Option<B> {
    fn issue_upload_url(&self, blob_key: &str) -> Result<SignedUrl, SignError> {
        self.as_ref()
            .ok_or(SignError::NotConfigured)?
            .issue_upload_url(blob_key)
    }

    fn issue_download_url(&self, blob_key: &str) -> Result<SignedUrl, SignError> {
        self.as_ref()
            .ok_or(SignError::NotConfigured)?
            .issue_download_url(blob_key)
    }
}
