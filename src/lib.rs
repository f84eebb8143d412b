//! # sb-rs
//!
//! This crate fetches [SponsorBlock](https://sponsor.ajay.app) skip segments
//! for YouTube videos. It is meant to sit next to a player: ask for a video's
//! segments once when playback starts, then check the playback position
//! against them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sb_rs::{config::Config, fetcher::SegmentFetcher, util};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Instance URL and enabled categories, from SPONSORBLOCK_* variables
//!     let config = Config::from_env();
//!
//!     let client = util::HttpClient::new().unwrap();
//!     let fetcher = SegmentFetcher::new(client, &config.instance);
//!
//!     // Only the first call for a video hits the network
//!     fetcher.load_segments("dQw4w9WgXcQ", &config.categories).await;
//!
//!     for segment in fetcher.segments() {
//!         println!("{} -> {} ({})", segment.start, segment.end, segment.category);
//!     }
//! }
//! ```
//!
//! Failed requests are logged and leave the fetcher with an empty segment
//! list; they are not retried until a different video is loaded.

#![forbid(unsafe_code)]
#[macro_use]
extern crate log;

pub mod api;
pub mod category;
pub mod config;
pub mod fetcher;
pub mod segment;
pub mod util;
