use serde_json::{Map, Value};

use crate::prelude::*;

/// One entry of the request feed.
///
/// The feed doesn't promise a fixed set of keys, and records within a single page
/// don't even agree with each other, so keep them as plain JSON objects.
pub type RequestRecord = Map<String, Value>;

/// Response body of `GET /corps/{corp}/sites/{site}/feed/requests`.
///
/// Only `data` is read, paging fields like `next` are dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedPage {
    pub data: Vec<RequestRecord>,
}

impl FeedPage {
    pub fn from_body(body: &str) -> AppResult<Self> {
        let page = serde_json::from_str(body).map_err(crate::error::Error::MalformedResponse)?;

        Ok(page)
    }
}
