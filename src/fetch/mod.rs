//! Remote image retrieval.
//!
//! Sessions hand the request line to [`ImageFetcher::fetch`], which validates
//! it as an `http`/`https` URL, performs a GET and returns the raw body.
//! Failures are never retried; the session reports them and closes.

mod client;

pub use client::{
    parse_image_url, FetchError, ImageFetcher, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_IMAGE_BYTES,
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
