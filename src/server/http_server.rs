use crate::app::Application;
use crate::server::{Request, Response};
use http::Method;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Largest request body read into form parameters.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Serves an [`Application`] over HTTP with `tiny_http`.
///
/// Requests are handled one at a time on each worker thread.
pub struct HttpServer {
    app: Arc<Application>,
    workers: usize,
}

/// Handle to a running HTTP server
///
/// Provides methods for waiting until the server is ready, stopping it, or
/// joining the worker threads.
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<tiny_http::Server>,
    workers: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server doesn't accept a connection within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop accepting requests and wait for the workers to finish.
    pub fn stop(self) {
        for _ in &self.workers {
            self.server.unblock();
        }
        for worker in self.workers {
            if worker.join().is_err() {
                warn!("HTTP worker panicked during shutdown");
            }
        }
        info!(addr = %self.addr, "HTTP server stopped");
    }

    /// Block until every worker exits.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker thread panicked.
    pub fn join(self) -> thread::Result<()> {
        for worker in self.workers {
            worker.join()?;
        }
        Ok(())
    }
}

impl HttpServer {
    #[must_use]
    pub fn new(app: Application) -> Self {
        Self::shared(Arc::new(app))
    }

    #[must_use]
    pub fn shared(app: Arc<Application>) -> Self {
        Self { app, workers: 1 }
    }

    /// Number of threads pulling requests from the listener (at least one).
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Bind `addr` and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let server = tiny_http::Server::http(addr)
            .map_err(|e| io::Error::new(io::ErrorKind::AddrNotAvailable, e.to_string()))?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);
        let server = Arc::new(server);

        let workers = (0..self.workers)
            .map(|index| {
                let server = Arc::clone(&server);
                let app = Arc::clone(&self.app);
                thread::Builder::new()
                    .name(format!("waymark-http-{index}"))
                    .spawn(move || serve(&server, &app))
            })
            .collect::<io::Result<Vec<_>>>()?;

        info!(addr = %addr, workers = workers.len(), "HTTP server listening");
        Ok(ServerHandle {
            addr,
            server,
            workers,
        })
    }
}

fn serve(server: &tiny_http::Server, app: &Application) {
    for mut incoming in server.incoming_requests() {
        let request = match to_request(&mut incoming) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to read request");
                write_response(incoming, Response::bad_request(None));
                continue;
            }
        };
        let response = app.handle(request);
        write_response(incoming, response);
    }
    debug!("HTTP worker exiting");
}

/// Translate a `tiny_http` request, reading an urlencoded body into form parameters.
///
/// Other bodies, multipart uploads included, are not read.
fn to_request(incoming: &mut tiny_http::Request) -> io::Result<Request> {
    let method = Method::from_bytes(incoming.method().to_string().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut request = Request::new(method, incoming.url());
    if let Some(peer) = incoming.remote_addr() {
        request = request.with_remote_addr(peer.to_string());
    }

    let mut is_form = false;
    for header in incoming.headers() {
        let name = header.field.as_str().as_str();
        let value = header.value.as_str();
        if name.eq_ignore_ascii_case("content-type") {
            if value.starts_with("application/x-www-form-urlencoded") {
                is_form = true;
            } else if value.starts_with("multipart/form-data") {
                debug!(
                    request_id = %request.request_id(),
                    "Multipart body ignored, file uploads are not supported"
                );
            }
        }
        request = request.with_header(name, value);
    }

    if is_form {
        let mut body = String::new();
        incoming
            .as_reader()
            .take(MAX_BODY_BYTES)
            .read_to_string(&mut body)?;
        request = request.with_form_body(&body);
    }
    Ok(request)
}

fn write_response(incoming: tiny_http::Request, response: Response) {
    let status = response.status().as_u16();
    let headers: Vec<tiny_http::Header> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
        })
        .collect();
    let body = response.into_content().unwrap_or_default().into_bytes();

    let mut out = tiny_http::Response::from_data(body).with_status_code(status);
    for header in headers {
        out.add_header(header);
    }
    if let Err(e) = incoming.respond(out) {
        error!(error = %e, status = status, "Failed to write response");
    }
}
