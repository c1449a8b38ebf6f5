pub mod aws;
pub mod axum_http;
pub mod gateway;
pub mod in_memory;
pub mod postgres;
