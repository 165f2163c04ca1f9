pub mod gateway;
pub mod http;

pub use gateway::{Gateway, GatewayError};
pub use http::HttpGateway;
