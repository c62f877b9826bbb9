//! Re-export of used objects

pub use super::client as device;
pub use super::client::device_client::DeviceClient;
pub use super::{dish_state_name, get_status_request};
