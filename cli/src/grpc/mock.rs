//! In-process connector for tests, no network involved

use super::{CloseError, ConnectOptions, ConnectionError, Connector, DeviceConnection};
use starlink_client_grpc::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tonic::Status;

/// What a mock connection answers to `Handle`
#[derive(Debug)]
pub enum MockReply {
    /// Reply with this envelope
    Respond(device::Response),
    /// Fail with a status carrying this code and message
    Fail(Status),
    /// Never reply
    Hang,
}

/// Counters shared between a [`MockConnector`] and its connections
#[derive(Debug, Default)]
pub struct MockStats {
    connects: AtomicUsize,
    calls: AtomicUsize,
    closes: AtomicUsize,
    last_request: Mutex<Option<device::Request>>,
    last_grpc_timeout: Mutex<Option<String>>,
}

impl MockStats {
    /// Connections created
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// `Handle` calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Connections closed, successfully or not
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Body of the most recent `Handle` call
    pub fn last_request(&self) -> Option<device::Request> {
        self.last_request.lock().ok()?.clone()
    }

    /// `grpc-timeout` header of the most recent `Handle` call
    pub fn last_grpc_timeout(&self) -> Option<String> {
        self.last_grpc_timeout.lock().ok()?.clone()
    }
}

/// Connector handing out [`MockConnection`]s that share one reply
#[derive(Debug)]
pub struct MockConnector {
    reply: Arc<MockReply>,
    not_ready_for: Duration,
    close_failure: Option<String>,
    stats: Arc<MockStats>,
}

impl MockConnector {
    /// Connections answer every call with `reply`
    pub fn new(reply: MockReply) -> Self {
        MockConnector {
            reply: Arc::new(reply),
            not_ready_for: Duration::ZERO,
            close_failure: None,
            stats: Arc::new(MockStats::default()),
        }
    }

    /// Connections stay unready for `period` after creation
    pub fn not_ready_for(mut self, period: Duration) -> Self {
        self.not_ready_for = period;
        self
    }

    /// Closing a connection fails with `reason`
    pub fn failing_close(mut self, reason: &str) -> Self {
        self.close_failure = Some(reason.to_owned());
        self
    }

    /// Counters for everything done through this connector
    pub fn stats(&self) -> Arc<MockStats> {
        Arc::clone(&self.stats)
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    /// Accepts the same addresses as the tonic connector
    fn connect(
        &self,
        address: &str,
        options: &ConnectOptions,
    ) -> Result<MockConnection, ConnectionError> {
        super::client::endpoint(address, options)?;
        self.stats.connects.fetch_add(1, Ordering::SeqCst);

        Ok(MockConnection {
            address: address.to_owned(),
            reply: Arc::clone(&self.reply),
            ready_at: Instant::now() + self.not_ready_for,
            close_failure: self.close_failure.clone(),
            stats: Arc::clone(&self.stats),
        })
    }
}

/// Connection produced by [`MockConnector`]
#[derive(Debug)]
pub struct MockConnection {
    address: String,
    reply: Arc<MockReply>,
    ready_at: Instant,
    close_failure: Option<String>,
    stats: Arc<MockStats>,
}

#[tonic::async_trait]
impl DeviceConnection for MockConnection {
    async fn wait_ready(&mut self) {
        tokio::time::sleep_until(self.ready_at).await;
    }

    async fn handle(
        &mut self,
        request: tonic::Request<device::Request>,
    ) -> Result<tonic::Response<device::Response>, Status> {
        self.stats.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.stats.last_grpc_timeout.lock() {
            *last = request
                .metadata()
                .get("grpc-timeout")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
        }
        if let Ok(mut last) = self.stats.last_request.lock() {
            *last = Some(request.into_inner());
        }

        if Instant::now() < self.ready_at {
            return Err(Status::unavailable(format!(
                "connection to {} not ready",
                self.address
            )));
        }

        match self.reply.as_ref() {
            MockReply::Respond(response) => Ok(tonic::Response::new(response.clone())),
            MockReply::Fail(status) => Err(Status::new(status.code(), status.message())),
            MockReply::Hang => std::future::pending().await,
        }
    }

    async fn close(self) -> Result<(), CloseError> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        match self.close_failure {
            Some(reason) => Err(CloseError {
                address: self.address,
                reason,
            }),
            None => Ok(()),
        }
    }
}
