//! Remote adapters - clients for the entitlement server.

mod http_entitlement_client;

pub use http_entitlement_client::HttpEntitlementClient;
