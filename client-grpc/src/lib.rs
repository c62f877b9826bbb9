//! Exposes the Starlink `SpaceX.API.Device` gRPC client functions and
//! message types.
//!
//! The message and client definitions mirror `proto/device.proto` and are
//! kept in `src/grpc.rs`, so building this crate does not need `protoc`.

/// Client Library: Client Functions, Structs
pub mod client {
    #![allow(unused_qualifications, missing_docs)]
    include!("grpc.rs");
}

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prelude;

/// Builds the `get_status` request envelope.
///
/// Every other envelope field is left at its default.
pub fn get_status_request() -> client::Request {
    client::Request {
        request: Some(client::request::Request::GetStatus(
            client::GetStatusRequest {},
        )),
        ..Default::default()
    }
}

/// Renders a raw `DishState` value as its enum name, or as the number when
/// the dish reports a state this client does not know.
pub fn dish_state_name(state: i32) -> String {
    match client::DishState::from_i32(state) {
        Some(state) => state.as_str_name().to_owned(),
        None => state.to_string(),
    }
}
