pub mod api;
pub mod review_panel;
pub mod reviews_api;

#[cfg(any(feature = "client", test))]
pub mod client;
