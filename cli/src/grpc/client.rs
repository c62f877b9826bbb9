//! gRPC client helpers implementation

use super::{
    CloseError, ConnectOptions, ConnectionError, Connector, DeviceConnection,
    InvalidAddressSnafu, TlsUnavailableSnafu,
};
use snafu::prelude::*;
use starlink_client_grpc::prelude::*;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;

/// First pause between dial attempts while waiting for readiness
const READY_BACKOFF_MIN: Duration = Duration::from_millis(50);

/// Longest pause between dial attempts while waiting for readiness
const READY_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Endpoint URI for `address`, adding a scheme when it has none
fn endpoint_uri(address: &str) -> String {
    match address.contains("://") {
        true => address.to_owned(),
        false => format!("http://{address}"),
    }
}

/// Builds the plaintext endpoint for `address`.
pub fn endpoint(address: &str, options: &ConnectOptions) -> Result<Endpoint, ConnectionError> {
    ensure!(options.plaintext, TlsUnavailableSnafu { address });

    let uri = endpoint_uri(address);
    Endpoint::from_shared(uri).context(InvalidAddressSnafu { address })
}

/// Creates lazily connected tonic channels
#[derive(Debug, Default, Clone, Copy)]
pub struct GrpcConnector;

impl Connector for GrpcConnector {
    type Connection = GrpcConnection;

    fn connect(
        &self,
        address: &str,
        options: &ConnectOptions,
    ) -> Result<GrpcConnection, ConnectionError> {
        let endpoint = endpoint(address, options)?;
        grpc_info!("(connect) channel to {} created.", address);

        Ok(GrpcConnection {
            address: address.to_owned(),
            client: DeviceClient::new(endpoint.connect_lazy()),
            endpoint,
        })
    }
}

/// Device client over a tonic channel
#[allow(missing_debug_implementations)]
pub struct GrpcConnection {
    address: String,
    endpoint: Endpoint,
    client: DeviceClient<Channel>,
}

#[tonic::async_trait]
impl DeviceConnection for GrpcConnection {
    /// Dials until one attempt succeeds, then carries calls over that channel.
    async fn wait_ready(&mut self) {
        let mut backoff = READY_BACKOFF_MIN;
        loop {
            match self.endpoint.connect().await {
                Ok(channel) => {
                    self.client = DeviceClient::new(channel);
                    return;
                }
                Err(e) => {
                    grpc_debug!(
                        "(wait_ready) {} not ready, retrying in {:?}: {}.",
                        self.address,
                        backoff,
                        e
                    );
                }
            }

            tokio::time::sleep(backoff).await;
            backoff = std::cmp::min(backoff * 2, READY_BACKOFF_MAX);
        }
    }

    async fn handle(
        &mut self,
        request: tonic::Request<device::Request>,
    ) -> Result<tonic::Response<device::Response>, Status> {
        grpc_debug!("(handle) entry, {}.", self.address);
        self.client.handle(request).await
    }

    /// Dropping the last channel handle shuts the connection down.
    async fn close(self) -> Result<(), CloseError> {
        grpc_debug!("(close) {}.", self.address);
        drop(self.client);
        Ok(())
    }
}
