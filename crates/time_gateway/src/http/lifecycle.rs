use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, extract::ConnectInfo};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::ServiceExt;

use crate::errors::{GatewayError, GatewayResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Serving,
    ShuttingDown,
    Stopped,
}

/// Drives one HTTP listener from bind to stop and publishes each transition.
///
/// `timeout` bounds how long a client may take to send request headers and
/// how long shutdown waits for in-flight requests.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<LifecycleState>,
    timeout: Duration,
}

impl Lifecycle {
    pub fn new(timeout: Duration) -> Self {
        let (state, _) = watch::channel(LifecycleState::Starting);
        Self { state, timeout }
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub async fn bind(&self, address: &str) -> GatewayResult<TcpListener> {
        TcpListener::bind(address)
            .await
            .map_err(|source| GatewayError::Bind {
                address: address.to_string(),
                source,
            })
    }

    /// Serves `app` until `shutdown` resolves or accepting fails.
    ///
    /// Each connection runs in a task owned by this call. On shutdown the
    /// listener is closed and every connection is asked to finish its current
    /// request; connections still open when the grace period ends are
    /// aborted. Per-connection failures (reset, refused, aborted) are
    /// skipped; any other accept error stops the listener and is returned as
    /// [`GatewayError::Listener`] once draining is done.
    pub async fn run<F>(&self, listener: TcpListener, app: Router, shutdown: F) -> GatewayResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        let local_addr = listener.local_addr()?;
        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new())
            .header_read_timeout(self.timeout);
        let (drain_tx, drain_rx) = watch::channel(false);
        let mut connections = JoinSet::new();

        self.transition(LifecycleState::Serving);
        tracing::info!("HTTP gateway listening on {}", local_addr);

        tokio::pin!(shutdown);
        let result = loop {
            tokio::select! {
                _ = &mut shutdown => break Ok(()),
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(serve_connection(
                            http.clone(),
                            stream,
                            peer,
                            app.clone(),
                            drain_rx.clone(),
                        ));
                    }
                    Err(e) if is_connection_error(&e) => {
                        tracing::debug!("Connection dropped before accept completed: {}", e);
                    }
                    Err(e) => {
                        tracing::error!("Accept failed on {}: {}", local_addr, e);
                        break Err(GatewayError::Listener(e));
                    }
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        };
        drop(listener);

        self.transition(LifecycleState::ShuttingDown);
        tracing::info!(
            "Shutting down, waiting up to {:?} for {} open connections",
            self.timeout,
            connections.len()
        );
        let _ = drain_tx.send(true);

        let drained = tokio::time::timeout(self.timeout, async {
            while connections.join_next().await.is_some() {}
        })
        .await
        .is_ok();
        if !drained {
            tracing::warn!(
                "Grace period elapsed, closing {} open connections",
                connections.len()
            );
            connections.abort_all();
            while connections.join_next().await.is_some() {}
        }

        self.transition(LifecycleState::Stopped);
        tracing::info!("HTTP gateway stopped");
        result
    }

    fn transition(&self, next: LifecycleState) {
        tracing::debug!("Lifecycle: {:?} -> {:?}", self.state(), next);
        self.state.send_replace(next);
    }
}

async fn serve_connection(
    http: http1::Builder,
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    drain: watch::Receiver<bool>,
) {
    let service = service_fn(move |mut request: hyper::Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(peer));
        app.clone().oneshot(request)
    });

    let connection = http.serve_connection(TokioIo::new(stream), service);
    let draining = draining(drain);
    tokio::pin!(connection, draining);

    let served = tokio::select! {
        served = connection.as_mut() => served,
        _ = &mut draining => {
            connection.as_mut().graceful_shutdown();
            connection.as_mut().await
        }
    };
    if let Err(e) = served {
        tracing::debug!("Connection from {} closed with error: {}", peer, e);
    }
}

async fn draining(mut drain: watch::Receiver<bool>) {
    let _ = drain.wait_for(|draining| *draining).await;
}

/// Errors that concern one incoming connection rather than the listener.
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C outside Unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
