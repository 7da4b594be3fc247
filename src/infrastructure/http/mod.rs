//! HTTP transport and the authenticated gateway client

mod gateway_client;
mod request;
mod transport;

pub use gateway_client::{GatewayClient, error_message};
pub use request::{Access, RequestOptions, ShapeValidator};
pub use transport::{
    HttpMethod, HttpTransport, ReqwestTransport, TransportError, TransportRequest,
    TransportResponse,
};

#[cfg(test)]
pub use transport::mock;
