pub mod http_client_factory;

pub use http_client_factory::{HttpClientFactory, build_url_with_query, get_json};
