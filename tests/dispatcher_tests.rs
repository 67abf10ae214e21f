//! Tests for handler resolution and the controller execution cycle
//!
//! # Test Coverage
//!
//! - Response helpers reachable from an action (ok, redirect, errors, json)
//! - Unresolvable handlers become 404 responses, detailed in debug mode
//! - Phase order: pre_execute, action, post_execute, first `Some` wins
//! - Forwarding: defaults from the current route, rewritten request uri
//! - Errors returned by a phase propagate to the caller

mod common;

use common::dispatcher;
use http::StatusCode;
use serde_json::json;
use waymark::dispatcher::{
    ActionResult, Context, Controller, ControllerClass, ControllerRegistry, HandlerName, Outcome,
    MAX_FORWARD_DEPTH,
};
use waymark::router::Route;
use waymark::server::{Request, Response};
use waymark::storage::Session;

fn execute(action: &str) -> ActionResult {
    execute_route(&Route::new("application", "dummy", action), false)
}

fn execute_route(route: &Route, debug: bool) -> ActionResult {
    dispatcher(debug).execute(route, Request::get(&route.canonical_uri()))
}

fn response(result: ActionResult) -> Response {
    match result.unwrap() {
        Some(Outcome::Response(response)) => response,
        other => panic!("expected a response, got {other:?}"),
    }
}

#[test]
fn test_execute() {
    let res = response(execute("index"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.content(), Some("index"));
}

#[test]
fn test_ok() {
    assert_eq!(response(execute("ok")).content(), Some("ok"));
}

#[test]
fn test_redirect() {
    let res = response(execute("redirect"));
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.header("Location"), Some("url"));
    assert_eq!(res.content(), None);
}

#[test]
fn test_error_helpers() {
    for (action, status, body) in [
        ("not-found", StatusCode::NOT_FOUND, "not_found"),
        ("bad-request", StatusCode::BAD_REQUEST, "bad_request"),
        ("unauthorized", StatusCode::UNAUTHORIZED, "unauthorized"),
        ("internal-error", StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    ] {
        let res = response(execute(action));
        assert_eq!(res.status(), status, "{action}");
        assert_eq!(res.content(), Some(body), "{action}");
        assert_eq!(
            res.header("Content-Type"),
            Some("text/plain; charset=utf-8"),
            "{action}"
        );
    }
}

#[test]
fn test_json() {
    let res = response(execute("json"));
    assert_eq!(res.content(), Some("{\n    \"key\": \"value\"\n}"));
    assert_eq!(
        res.header("Content-Type"),
        Some("application/json; charset=utf-8")
    );
}

#[test]
fn test_string_and_null_results() {
    assert_eq!(
        execute("output-string").unwrap(),
        Some(Outcome::Content("output_string".to_string()))
    );
    assert_eq!(execute("output-null").unwrap(), None);
}

#[test]
fn test_forward() {
    let res = response(execute("forward"));
    assert_eq!(res.content(), Some("forward_after /application/dummy/forwardAfter"));
}

#[test]
fn test_forward_dashed_name_reaches_same_method() {
    let res = response(execute("forward-after"));
    assert_eq!(res.content(), Some("forward_after /application/dummy/forward-after"));
}

#[test]
fn test_forward_to_other_module_and_controller() {
    let res = response(execute("forward-other"));
    assert_eq!(res.content(), Some("admin other admin/other/index"));
}

#[test]
fn test_forward_shares_session() {
    let res = response(execute("session-write"));
    assert_eq!(res.content(), Some("{\n    \"visited\": true\n}"));
}

#[test]
fn test_forward_loop_is_bounded() {
    let err = execute("forward-loop").unwrap_err();
    assert!(err
        .to_string()
        .contains(&format!("Forward depth limit ({MAX_FORWARD_DEPTH}) exceeded")));
}

#[test]
fn test_method_not_found() {
    let res = response(execute("does_not_exist"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.content(), Some("File not found."));
}

#[test]
fn test_method_not_found_debug() {
    let route = Route::new("application", "dummy", "does_not_exist");
    let res = response(execute_route(&route, true));
    assert_eq!(
        res.content(),
        Some("Not found: Controller::Application::DummyController::doesNotExistAction()")
    );
}

#[test]
fn test_class_not_found_debug() {
    let route = Route::new("shop", "cart", "show");
    let res = response(execute_route(&route, true));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.content(),
        Some("Not found: Controller::Shop::CartController::showAction()")
    );
}

#[test]
fn test_action_error_propagates() {
    let err = execute("fail").unwrap_err();
    assert_eq!(err.to_string(), "database unavailable");
}

/// Run the guarded controller and return the response with the phases it entered.
fn execute_guarded(target: &str) -> (Response, serde_json::Value) {
    let route = Route::new("application", "guarded", "show");
    let session = Session::new();
    let request = Request::get(target).with_session(session.clone());
    let res = response(dispatcher(false).execute(&route, request));
    (res, session.get("phases").unwrap_or_default())
}

#[test]
fn test_pre_execute_short_circuits() {
    let (res, phases) = execute_guarded("/application/guarded/show?deny=1");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(phases, json!(["pre_execute"]));
}

#[test]
fn test_action_result_skips_post_execute() {
    let (res, phases) = execute_guarded("/x");
    assert_eq!(res.content(), Some("show"));
    assert_eq!(phases, json!(["pre_execute", "action"]));
}

#[test]
fn test_post_execute_runs_when_action_returns_none() {
    let (res, phases) = execute_guarded("/x?silent=1");
    assert_eq!(res.content(), Some("post_execute"));
    assert_eq!(phases, json!(["pre_execute", "action", "post_execute"]));
}

#[test]
fn test_view_script_defaults_to_route() {
    #[derive(Default)]
    struct ScriptController;
    impl Controller for ScriptController {}
    impl ScriptController {
        fn show(&mut self, ctx: &mut Context) -> ActionResult {
            let script = ctx.view().script().unwrap_or_default().to_string();
            let layout = ctx
                .view()
                .layout()
                .and_then(|layout| layout.script())
                .unwrap_or_default()
                .to_string();
            ctx.ok(format!("{script} {layout}"))
        }
    }

    let mut registry = ControllerRegistry::new();
    registry.register(
        "blog",
        "post-list",
        ControllerClass::<ScriptController>::new().action("show", ScriptController::show),
    );
    assert!(registry.resolves(&HandlerName::for_route(&Route::new("blog", "post-list", "show"))));

    let dispatcher = waymark::dispatcher::Dispatcher::new(
        std::sync::Arc::new(registry),
        waymark::config::ViewSettings::default(),
        false,
    );
    let route = Route::new("blog", "post-list", "show");
    let res = response(dispatcher.execute(&route, Request::get("/blog/post-list/show")));
    assert_eq!(res.content(), Some("blog/post-list/show default"));
}

#[test]
fn test_fresh_controller_per_dispatch() {
    #[derive(Default)]
    struct CountingController {
        hits: u32,
    }
    impl Controller for CountingController {}
    impl CountingController {
        fn count(&mut self, ctx: &mut Context) -> ActionResult {
            self.hits += 1;
            ctx.ok(self.hits.to_string())
        }
    }

    let mut registry = ControllerRegistry::new();
    registry.register(
        "m",
        "c",
        ControllerClass::<CountingController>::new().action("count", CountingController::count),
    );
    let dispatcher = waymark::dispatcher::Dispatcher::new(
        std::sync::Arc::new(registry),
        waymark::config::ViewSettings::default(),
        false,
    );
    let route = Route::new("m", "c", "count");
    for _ in 0..3 {
        let res = response(dispatcher.execute(&route, Request::get("/m/c/count")));
        assert_eq!(res.content(), Some("1"));
    }
}

#[test]
fn test_registered_methods_are_listed() {
    let registry = common::registry();
    let handlers = registry.handlers();
    let (class, methods) = handlers
        .iter()
        .find(|(class, _)| class == "Controller::Application::DummyController")
        .unwrap();
    assert_eq!(class, "Controller::Application::DummyController");
    assert!(methods.iter().any(|m| m == "forwardAfterAction"));
    assert!(methods.iter().any(|m| m == "outputStringAction"));
}
