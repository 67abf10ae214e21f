use super::context::Context;
use super::controller::ActionResult;
use super::naming::HandlerName;
use super::registry::ControllerRegistry;
use crate::config::ViewSettings;
use crate::router::Route;
use crate::server::{Request, Response};
use crate::view::View;
use anyhow::anyhow;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Forward chains longer than this fail instead of recursing further.
pub const MAX_FORWARD_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    PreExecute,
    Action,
    PostExecute,
}

impl Phase {
    const ORDER: [Phase; 3] = [Phase::PreExecute, Phase::Action, Phase::PostExecute];

    fn as_str(self) -> &'static str {
        match self {
            Phase::PreExecute => "pre_execute",
            Phase::Action => "action",
            Phase::PostExecute => "post_execute",
        }
    }
}

/// Resolves a [`Route`] to a controller action and runs it.
///
/// Cloning is cheap: the registry and settings are shared.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ControllerRegistry>,
    views: Arc<ViewSettings>,
    debug: bool,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: Arc<ControllerRegistry>, views: ViewSettings, debug: bool) -> Self {
        Self {
            registry,
            views: Arc::new(views),
            debug,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Dispatch `request` to the action `route` names.
    ///
    /// An unknown controller class or action method yields a 404 response,
    /// with the handler name as body in debug mode. Otherwise `pre_execute`,
    /// the action and `post_execute` run in that order and the first `Some`
    /// result is returned; `Ok(None)` when all three return `None`.
    ///
    /// # Errors
    ///
    /// Errors returned by a phase are propagated unchanged.
    pub fn execute(&self, route: &Route, request: Request) -> ActionResult {
        self.execute_forward(route, request, 0)
    }

    pub(crate) fn execute_forward(
        &self,
        route: &Route,
        request: Request,
        depth: usize,
    ) -> ActionResult {
        if depth > MAX_FORWARD_DEPTH {
            return Err(anyhow!(
                "Forward depth limit ({MAX_FORWARD_DEPTH}) exceeded at {route}"
            ));
        }

        let handler = HandlerName::for_route(route);
        let Some(mut instance) = self.registry.instantiate(&handler) else {
            let message = handler.not_found_message();
            warn!(
                request_id = %request.request_id(),
                route = %route,
                handler = %handler,
                "{message}"
            );
            let body = self.debug.then_some(message.as_str());
            return Ok(Some(Response::not_found(body).into()));
        };

        let request_id = request.request_id();
        let mut view = View::new(&self.views.directory);
        view.set_layout(self.views.layout.as_deref());
        view.set_script_from_route(route);
        let mut ctx = Context::new(request, route.clone(), view, self.clone(), depth);

        debug!(
            request_id = %request_id,
            handler = %handler,
            forward_depth = depth,
            "Dispatching"
        );

        let start = Instant::now();
        for phase in Phase::ORDER {
            let result = match phase {
                Phase::PreExecute => instance.pre_execute(&mut ctx),
                Phase::Action => instance.run_action(&mut ctx),
                Phase::PostExecute => instance.post_execute(&mut ctx),
            }?;
            if let Some(outcome) = result {
                debug!(
                    request_id = %request_id,
                    handler = %handler,
                    phase = phase.as_str(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Dispatch completed"
                );
                return Ok(Some(outcome));
            }
        }

        debug!(
            request_id = %request_id,
            handler = %handler,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Dispatch produced no result"
        );
        Ok(None)
    }
}
