//! HTTP middleware

pub mod correlation;

pub use correlation::{
    correlation_middleware, request_id_layer, request_id_propagation_layer, with_correlation,
    CorrelationId, CorrelationLayerConfig, MakeCorrelationId, LOG_KEY, REQUEST_ID_HEADER,
};
