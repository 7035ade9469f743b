pub mod api;
pub mod download;
pub mod extractor;
pub mod invidious;
pub mod piped;
pub mod resolver;
