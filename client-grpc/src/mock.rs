//! Canned device replies for tests and local development

use crate::client::{
    response, DeviceInfo, DeviceState, DishGetStatusResponse, DishObstructionStats, DishState,
    GetDeviceInfoResponse, Response,
};

/// Status of a connected dish with every optional group populated
pub fn dish_get_status() -> DishGetStatusResponse {
    DishGetStatusResponse {
        device_info: Some(DeviceInfo {
            id: "abc123".to_owned(),
            hardware_version: "rev2".to_owned(),
            software_version: "2024.01".to_owned(),
            country_code: "US".to_owned(),
        }),
        device_state: Some(DeviceState { uptime_s: 3600 }),
        state: DishState::Connected as i32,
        pop_ping_latency_ms: 25.5,
        pop_ping_drop_rate: 0.0012,
        downlink_throughput_bps: 1.5e8,
        uplink_throughput_bps: 1.2e7,
        obstruction_stats: Some(DishObstructionStats {
            currently_obstructed: false,
            fraction_obstructed: 0.0003,
        }),
    }
}

/// Wraps a status in the `dish_get_status` response variant
pub fn status_response(status: DishGetStatusResponse) -> Response {
    Response {
        response: Some(response::Response::DishGetStatus(status)),
        ..Default::default()
    }
}

/// Reply to `get_status` built from [`dish_get_status`]
pub fn dish_get_status_response() -> Response {
    status_response(dish_get_status())
}

/// Reply carrying a different variant than the one asked for
pub fn get_device_info_response() -> Response {
    Response {
        response: Some(response::Response::GetDeviceInfo(GetDeviceInfoResponse {
            device_info: dish_get_status().device_info,
        })),
        ..Default::default()
    }
}
