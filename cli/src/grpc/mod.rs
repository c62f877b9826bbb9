//! gRPC
//! provides the connection seam and the single `get_status` call made
//! against a dish

#[macro_use]
pub mod macros;
pub mod client;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

use snafu::prelude::*;
use starlink_client_grpc::prelude::*;
use std::time::Duration;
use tokio::time::Instant;
use tonic::{Code, Status};

/// Transport options applied when a connection is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// speak plaintext HTTP/2 instead of negotiating TLS
    pub plaintext: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions { plaintext: true }
    }
}

/// Connection object could not be created
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConnectionError {
    /// Address is not a usable endpoint URI
    #[snafu(display("invalid address '{address}': {source}"))]
    InvalidAddress {
        address: String,
        source: tonic::transport::Error,
    },

    /// Encrypted transport was asked for, this build only speaks plaintext
    #[snafu(display("TLS is not available for '{address}', only plaintext is supported"))]
    TlsUnavailable { address: String },
}

/// The status call did not produce a reply
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InvokeError {
    /// No reply before the deadline, including time spent waiting for readiness
    #[snafu(display("deadline of {timeout:?} exceeded"))]
    DeadlineExceeded { timeout: Duration },

    /// Transport or server reported a failure
    #[snafu(display("{source}"))]
    Rpc { source: Status },

    /// Deadline cannot be represented on this clock
    #[snafu(display("timeout of {timeout:?} is out of range"))]
    TimeoutOutOfRange { timeout: Duration },
}

impl InvokeError {
    /// True when the call failed because time ran out, locally or on the server
    pub fn is_timeout(&self) -> bool {
        match self {
            InvokeError::DeadlineExceeded { .. } => true,
            InvokeError::Rpc { source } => source.code() == Code::DeadlineExceeded,
            InvokeError::TimeoutOutOfRange { .. } => false,
        }
    }
}

/// Releasing a connection failed
#[derive(Debug, Snafu)]
#[snafu(display("could not close connection to '{address}': {reason}"))]
pub struct CloseError {
    /// address the connection was bound to
    pub address: String,
    /// what went wrong
    pub reason: String,
}

/// Creates connections to a device
pub trait Connector {
    /// Connection handle produced by this connector
    type Connection: DeviceConnection;

    /// Creates a logical connection to `address`.
    ///
    /// Dialing may be deferred until the connection is used; readiness is
    /// enforced by [`get_status`].
    fn connect(
        &self,
        address: &str,
        options: &ConnectOptions,
    ) -> Result<Self::Connection, ConnectionError>;
}

/// Logical connection able to carry `Handle` calls to one device
#[tonic::async_trait]
pub trait DeviceConnection: Send {
    /// Returns once the connection can carry a call without further setup.
    ///
    /// Does not give up on its own; callers bound it with a deadline.
    async fn wait_ready(&mut self);

    /// Issues one `Handle` call
    async fn handle(
        &mut self,
        request: tonic::Request<device::Request>,
    ) -> Result<tonic::Response<device::Response>, Status>;

    /// Releases the connection
    async fn close(self) -> Result<(), CloseError>;
}

/// Sends one `get_status` request and returns the reply envelope untouched.
///
/// Readiness wait and call share one deadline of `timeout` from now. Without
/// `wait_ready`, a connection that is not ready fails the call immediately.
pub async fn get_status<C>(
    connection: &mut C,
    timeout: Duration,
    wait_ready: bool,
) -> Result<device::Response, InvokeError>
where
    C: DeviceConnection,
{
    let Some(deadline) = Instant::now().checked_add(timeout) else {
        grpc_error!("(get_status) timeout {:?} out of range.", timeout);
        return TimeoutOutOfRangeSnafu { timeout }.fail();
    };
    grpc_debug!(
        "(get_status) entry, timeout {:?}, wait_ready {}.",
        timeout,
        wait_ready
    );

    let call = async {
        if wait_ready {
            connection.wait_ready().await;
            grpc_debug!("(get_status) connection ready.");
        }

        let mut request = tonic::Request::new(get_status_request());
        request.set_timeout(deadline.saturating_duration_since(Instant::now()));
        connection.handle(request).await
    };

    match tokio::time::timeout_at(deadline, call).await {
        Ok(Ok(response)) => Ok(response.into_inner()),
        Ok(Err(status)) if status.code() == Code::DeadlineExceeded => {
            grpc_warn!("(get_status) server reported deadline exceeded: {}.", status);
            DeadlineExceededSnafu { timeout }.fail()
        }
        Ok(Err(status)) => {
            grpc_warn!("(get_status) call failed: {}.", status);
            Err(status).context(RpcSnafu)
        }
        Err(_) => {
            grpc_warn!("(get_status) no reply within {:?}.", timeout);
            DeadlineExceededSnafu { timeout }.fail()
        }
    }
}
