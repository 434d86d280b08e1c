pub mod http;

pub use http::HttpSearchClient;
