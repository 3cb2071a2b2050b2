pub mod client;
pub mod dtos;

pub use client::{FeedResponse, FeedSource, HttpFeedSource, fetch_with_retry};
pub use dtos::{FeedPage, RequestRecord};
