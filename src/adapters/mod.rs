// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod storage;

pub use http::NbrbClient;
pub use storage::LocalStorage;
