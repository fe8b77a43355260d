pub mod builder;
pub mod connector;
pub mod orders;
pub mod rest;
pub mod signer;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_deepwaters_connector, DeepwatersBuilder};
pub use connector::DeepwatersConnector;
pub use orders::{
    build_cancel_order, build_submit_order, deepwaters_domain, CancelOrderParams,
    SubmitOrderParams,
};
pub use rest::DeepwatersRest;
pub use signer::DeepwatersSigner;
pub use types::{CustomerInfo, SubmitOrderVariables};
