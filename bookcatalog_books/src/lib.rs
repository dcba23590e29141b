pub mod api;
pub mod books_api;
pub mod client_config;
pub mod identity;

#[cfg(any(feature = "client", test))]
pub mod client;
