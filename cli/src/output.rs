//! Renders a `get_status` reply as labeled lines

use snafu::prelude::*;
use starlink_client_grpc::prelude::*;
use std::io::Write;

/// The reply could not be rendered
#[derive(Debug, Snafu)]
pub enum FormatError {
    /// Reply did not carry the `dish_get_status` variant
    #[snafu(display("unexpected response: dish_get_status is missing"))]
    MissingStatus,

    /// Output sink rejected a line
    #[snafu(display("could not write '{field}': {source}"))]
    Write {
        field: &'static str,
        source: std::io::Error,
    },
}

/// Writes the status summary to `out`, one line per field, in a fixed order.
///
/// Absent nested groups print as empty, zero or false. The two obstruction
/// lines only appear when the dish reports obstruction statistics. The first
/// failed write stops the output.
pub fn write_status<W: Write>(response: &device::Response, out: &mut W) -> Result<(), FormatError> {
    let Some(device::response::Response::DishGetStatus(status)) = &response.response else {
        return MissingStatusSnafu.fail();
    };

    let no_info = device::DeviceInfo::default();
    let info = status.device_info.as_ref().unwrap_or(&no_info);
    let uptime_s = status
        .device_state
        .as_ref()
        .map(|state| state.uptime_s)
        .unwrap_or_default();

    writeln!(out, "ID: {}", info.id).context(WriteSnafu { field: "ID" })?;
    writeln!(out, "HW: {}", info.hardware_version).context(WriteSnafu { field: "HW" })?;
    writeln!(out, "SW: {}", info.software_version).context(WriteSnafu { field: "SW" })?;
    writeln!(out, "State: {}", dish_state_name(status.state))
        .context(WriteSnafu { field: "State" })?;
    writeln!(out, "Uptime (s): {}", uptime_s).context(WriteSnafu { field: "Uptime" })?;
    writeln!(out, "Ping latency (ms): {:.2}", status.pop_ping_latency_ms)
        .context(WriteSnafu { field: "Ping latency" })?;
    writeln!(out, "Ping drop rate: {:.4}", status.pop_ping_drop_rate)
        .context(WriteSnafu { field: "Ping drop rate" })?;
    writeln!(out, "Downlink (bps): {:.0}", status.downlink_throughput_bps)
        .context(WriteSnafu { field: "Downlink" })?;
    writeln!(out, "Uplink (bps): {:.0}", status.uplink_throughput_bps)
        .context(WriteSnafu { field: "Uplink" })?;

    if let Some(obstruction) = &status.obstruction_stats {
        writeln!(out, "Obstructed now: {}", obstruction.currently_obstructed)
            .context(WriteSnafu { field: "Obstructed now" })?;
        writeln!(out, "Fraction obstructed: {:.4}", obstruction.fraction_obstructed)
            .context(WriteSnafu { field: "Fraction obstructed" })?;
    }

    Ok(())
}
