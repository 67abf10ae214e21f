use super::controller::{ActionResult, Outcome};
use super::Dispatcher;
use crate::router::Route;
use crate::server::{Request, Response};
use crate::view::View;
use serde::Serialize;

/// Per-dispatch state handed to every controller phase.
///
/// Owns the request, the route it was dispatched for and the view whose
/// script defaults to `<module>/<controller>/<action>`. The response helpers
/// all return an [`ActionResult`] so an action can end with `ctx.ok(...)`.
pub struct Context {
    request: Request,
    route: Route,
    view: View,
    dispatcher: Dispatcher,
    depth: usize,
}

impl Context {
    pub(crate) fn new(
        request: Request,
        route: Route,
        view: View,
        dispatcher: Dispatcher,
        depth: usize,
    ) -> Self {
        Self {
            request,
            route,
            view,
            dispatcher,
            depth,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.dispatcher.is_debug()
    }

    /// Number of forwards that led to this dispatch, 0 for the original request.
    #[must_use]
    pub fn forward_depth(&self) -> usize {
        self.depth
    }

    /// 200 with `content`.
    pub fn ok(&self, content: impl Into<String>) -> ActionResult {
        Ok(Some(Response::ok(Some(content.into())).into()))
    }

    /// 301 to `url`.
    pub fn redirect(&self, url: &str) -> ActionResult {
        Ok(Some(Response::redirect(url).into()))
    }

    pub fn not_found(&self, message: Option<&str>) -> ActionResult {
        Ok(Some(Response::not_found(message).into()))
    }

    pub fn bad_request(&self, message: Option<&str>) -> ActionResult {
        Ok(Some(Response::bad_request(message).into()))
    }

    pub fn unauthorized(&self, message: Option<&str>) -> ActionResult {
        Ok(Some(Response::unauthorized(message).into()))
    }

    pub fn internal_error(&self, message: Option<&str>) -> ActionResult {
        Ok(Some(Response::internal_error(message).into()))
    }

    /// Pretty printed JSON response.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> ActionResult {
        Ok(Some(Response::json(value)?.into()))
    }

    /// Render the view as page content.
    pub fn render(&self) -> ActionResult {
        Ok(Some(Outcome::Content(self.view.render()?)))
    }

    /// Run another action within the same HTTP request.
    ///
    /// Missing `controller_name` and `module_name` default to the current
    /// route. The forwarded request is a copy of this one addressed to
    /// `/<module>/<controller>/<action>`; its result is returned as is.
    pub fn forward(
        &self,
        action_name: &str,
        controller_name: Option<&str>,
        module_name: Option<&str>,
    ) -> ActionResult {
        let route = Route::new(
            module_name.unwrap_or(self.route.module_name()),
            controller_name.unwrap_or(self.route.controller_name()),
            action_name,
        );
        let mut request = self.request.clone();
        request.set_request_uri(route.canonical_uri());
        self.dispatcher.execute_forward(&route, request, self.depth + 1)
    }
}
