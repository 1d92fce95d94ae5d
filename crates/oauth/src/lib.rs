//! Device-authorization flow against the Seedr OAuth endpoints.
//!
//! [`DeviceFlow::issue`] asks the provider for a device code and keeps it in a
//! [`DeviceCodeStore`]; [`DeviceFlow::poll`] exchanges the stored code once and
//! reports [`TokenExchangeResult::Pending`] or
//! [`TokenExchangeResult::Authorized`]. Nothing loops or retries: every call
//! is one upstream request triggered from outside.

pub mod device_flow;
pub mod error;
pub mod store;
pub mod types;

pub use {
    device_flow::{DeviceFlow, exchange_device_code, request_device_code},
    error::{Error, Result},
    store::{DeviceCodeStore, InMemoryDeviceCodeStore},
    types::{DeviceAuthorizationRequest, DeviceFlowConfig, TokenExchangeResult},
};
