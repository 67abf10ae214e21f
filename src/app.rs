//! Application: configuration, router and dispatcher wired into one request handler.

use crate::config::{AppConfig, ConfigError};
use crate::dispatcher::{Controller, ControllerClass, ControllerRegistry, Dispatcher, Outcome};
use crate::ids::SessionId;
use crate::router::{Matcher, Router};
use crate::server::{HttpServer, Request, Response};
use crate::storage::{Session, SessionStore};
use anyhow::{anyhow, Context as _};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Debug body of the 404 returned when no matcher accepts the uri.
pub const NO_ROUTE_MESSAGE: &str = "No route matched the requested URI";
/// Error raised when dispatch completes without a result.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response";
/// Cookie carrying the [`SessionId`] between requests.
pub const SESSION_COOKIE: &str = "waymark_session";

/// Collects matchers and controllers before the application is frozen.
pub struct ApplicationBuilder {
    config: AppConfig,
    matchers: Vec<Matcher>,
    registry: ControllerRegistry,
}

impl ApplicationBuilder {
    /// Add a matcher after the ones from the `routes` configuration section.
    #[must_use]
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    #[must_use]
    pub fn controller<C: Controller>(
        mut self,
        module_name: &str,
        controller_name: &str,
        class: ControllerClass<C>,
    ) -> Self {
        self.registry.register(module_name, controller_name, class);
        self
    }

    /// Validate the configured routes and freeze router and registry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidRoute`] for the first invalid configured route.
    pub fn build(self) -> Result<Application, ConfigError> {
        let mut router = Router::new();
        for matcher in self.config.matchers()? {
            router.add_matcher(matcher);
        }
        for matcher in self.matchers {
            router.add_matcher(matcher);
        }

        let dispatcher = Dispatcher::new(
            Arc::new(self.registry),
            self.config.views.clone(),
            self.config.debug,
        );
        info!(
            matchers_count = router.len(),
            controllers_count = dispatcher.registry().len(),
            debug = self.config.debug,
            "Application built"
        );

        Ok(Application {
            router: router.freeze(),
            dispatcher,
            sessions: SessionStore::new(),
            config: self.config,
        })
    }
}

/// A built application. Shared read-only by every request thread.
#[derive(Debug)]
pub struct Application {
    config: AppConfig,
    router: Arc<Router>,
    dispatcher: Dispatcher,
    sessions: SessionStore,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Application {
    #[must_use]
    pub fn builder(config: AppConfig) -> ApplicationBuilder {
        ApplicationBuilder {
            config,
            matchers: Vec::new(),
            registry: ControllerRegistry::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    /// Route, dispatch and convert the result into a response.
    ///
    /// Never fails: every error and panic inside dispatch becomes a 500.
    ///
    /// The session named by the [`SESSION_COOKIE`] cookie is attached to the
    /// request. A new session is only stored, and its cookie sent, once an
    /// action has written to it; a stored session left empty is dropped.
    #[must_use]
    pub fn handle(&self, request: Request) -> Response {
        let start = Instant::now();
        let request_id = request.request_id();
        let method = request.method().clone();
        let uri = request.request_uri().to_string();

        let stored = request
            .cookie(SESSION_COOKIE)
            .and_then(|value| value.parse::<SessionId>().ok())
            .and_then(|id| self.sessions.get(id).map(|session| (id, session)));
        let (session_id, session, is_new) = match stored {
            Some((id, session)) => (id, session, false),
            None => (SessionId::new(), Session::new(), true),
        };

        let mut response = self.respond(request.with_session(session.clone()));
        self.persist_session(session_id, &session, is_new, &mut response);

        info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Request handled"
        );
        response
    }

    fn persist_session(
        &self,
        id: SessionId,
        session: &Session,
        is_new: bool,
        response: &mut Response,
    ) {
        match (is_new, session.is_empty()) {
            (true, false) => {
                self.sessions.insert(id, session.clone());
                response.set_header(
                    "Set-Cookie",
                    &format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly"),
                );
                debug!(session_id = %id, sessions = self.sessions.len(), "Session started");
            }
            (false, true) => {
                self.sessions.remove(id);
                response.set_header(
                    "Set-Cookie",
                    &format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0"),
                );
                debug!(session_id = %id, "Session destroyed");
            }
            _ => {}
        }
    }

    fn respond(&self, request: Request) -> Response {
        let Some(route) = self.router.get_route(request.request_uri()) else {
            warn!(request_id = %request.request_id(), uri = %request.request_uri(), "{NO_ROUTE_MESSAGE}");
            return Response::not_found(self.is_debug().then_some(NO_ROUTE_MESSAGE));
        };

        let request_id = request.request_id();
        let dispatched = panic::catch_unwind(AssertUnwindSafe(|| {
            self.dispatcher.execute(&route, request)
        }));

        let failure = match dispatched {
            Ok(Ok(Some(Outcome::Response(response)))) => return response,
            Ok(Ok(Some(Outcome::Content(content)))) => return Response::html(content),
            Ok(Ok(None)) => anyhow!(INVALID_RESPONSE_MESSAGE),
            Ok(Err(err)) => err,
            Err(payload) => anyhow!("Handler panicked: {}", panic_message(payload.as_ref())),
        };

        let content = format!("Internal server error.\n\n{failure:?}");
        error!(
            request_id = %request_id,
            route = %route,
            error = %format!("{failure:#}"),
            "{content}"
        );
        Response::internal_error(self.is_debug().then_some(content.as_str()))
    }

    /// Serve on `server.addr` until the server stops.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound or a worker panics.
    pub fn run(self) -> anyhow::Result<()> {
        let addr = self.config.server.addr.clone();
        let handle = HttpServer::new(self)
            .start(addr.as_str())
            .with_context(|| format!("Failed to bind {addr}"))?;
        handle
            .join()
            .map_err(|payload| anyhow!("HTTP worker panicked: {}", panic_message(payload.as_ref())))
    }
}
