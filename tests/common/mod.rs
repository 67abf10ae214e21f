//! Shared fixtures: a dummy controller covering every response helper.

#![allow(dead_code)]

use anyhow::bail;
use serde_json::json;
use waymark::app::Application;
use waymark::config::AppConfig;
use waymark::dispatcher::{
    ActionResult, Context, Controller, ControllerClass, ControllerRegistry, Dispatcher,
};
use waymark::router::Matcher;
use std::sync::Arc;

#[derive(Default)]
pub struct DummyController;

impl Controller for DummyController {}

impl DummyController {
    pub fn index(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.ok("index")
    }

    pub fn output_string(&mut self, _ctx: &mut Context) -> ActionResult {
        Ok(Some("output_string".into()))
    }

    pub fn output_null(&mut self, _ctx: &mut Context) -> ActionResult {
        Ok(None)
    }

    pub fn ok(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.ok("ok")
    }

    pub fn redirect(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.redirect("url")
    }

    pub fn not_found(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.not_found(Some("not_found"))
    }

    pub fn bad_request(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.bad_request(Some("bad_request"))
    }

    pub fn unauthorized(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.unauthorized(Some("unauthorized"))
    }

    pub fn internal_error(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.internal_error(Some("internal_error"))
    }

    pub fn json(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.json(&json!({"key": "value"}))
    }

    pub fn forward(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.forward("forwardAfter", None, None)
    }

    pub fn forward_after(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.ok(format!("forward_after {}", ctx.request().request_uri()))
    }

    pub fn forward_other(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.forward("index", Some("other"), Some("admin"))
    }

    pub fn forward_loop(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.forward("forward-loop", None, None)
    }

    pub fn fail(&mut self, _ctx: &mut Context) -> ActionResult {
        bail!("database unavailable")
    }

    pub fn explode(&mut self, _ctx: &mut Context) -> ActionResult {
        panic!("kaboom")
    }

    pub fn session_write(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.request().session().set("visited", true);
        ctx.forward("session-read", None, None)
    }

    pub fn session_read(&mut self, ctx: &mut Context) -> ActionResult {
        let visited = ctx.request().session().get("visited");
        ctx.json(&json!({ "visited": visited }))
    }

    pub fn form_echo(&mut self, ctx: &mut Context) -> ActionResult {
        let value = ctx.request().post_param_or("file", "none").to_string();
        ctx.ok(value)
    }

    pub fn session_reset(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.request().session().reset();
        ctx.ok("reset")
    }
}

pub fn dummy_class() -> ControllerClass<DummyController> {
    ControllerClass::new()
        .action("index", DummyController::index)
        .action("output-string", DummyController::output_string)
        .action("output-null", DummyController::output_null)
        .action("ok", DummyController::ok)
        .action("redirect", DummyController::redirect)
        .action("not-found", DummyController::not_found)
        .action("bad-request", DummyController::bad_request)
        .action("unauthorized", DummyController::unauthorized)
        .action("internal-error", DummyController::internal_error)
        .action("json", DummyController::json)
        .action("forward", DummyController::forward)
        .action("forward-after", DummyController::forward_after)
        .action("forward-other", DummyController::forward_other)
        .action("forward-loop", DummyController::forward_loop)
        .action("fail", DummyController::fail)
        .action("explode", DummyController::explode)
        .action("session-write", DummyController::session_write)
        .action("session-read", DummyController::session_read)
        .action("session-reset", DummyController::session_reset)
        .action("form-echo", DummyController::form_echo)
}

#[derive(Default)]
pub struct OtherController;

impl Controller for OtherController {}

impl OtherController {
    pub fn index(&mut self, ctx: &mut Context) -> ActionResult {
        ctx.ok(format!("admin other {}", ctx.route()))
    }
}

/// Append `phase` to the `phases` list kept in the request session.
fn record_phase(ctx: &Context, phase: &str) {
    let session = ctx.request().session();
    let mut phases = session
        .get("phases")
        .and_then(|value| value.as_array().cloned())
        .unwrap_or_default();
    phases.push(json!(phase));
    session.set("phases", phases);
}

/// Controller whose hooks short-circuit depending on the query string.
/// Every phase it enters is recorded under `phases` in the session.
#[derive(Default)]
pub struct GuardedController;

impl Controller for GuardedController {
    fn pre_execute(&mut self, ctx: &mut Context) -> ActionResult {
        record_phase(ctx, "pre_execute");
        if ctx.request().query_param("deny").is_some() {
            return ctx.unauthorized(None);
        }
        Ok(None)
    }

    fn post_execute(&mut self, ctx: &mut Context) -> ActionResult {
        record_phase(ctx, "post_execute");
        ctx.ok("post_execute")
    }
}

impl GuardedController {
    pub fn show(&mut self, ctx: &mut Context) -> ActionResult {
        record_phase(ctx, "action");
        if ctx.request().query_param("silent").is_some() {
            return Ok(None);
        }
        ctx.ok("show")
    }
}

pub fn registry() -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    registry
        .register("application", "dummy", dummy_class())
        .register(
            "admin",
            "other",
            ControllerClass::<OtherController>::new().action("index", OtherController::index),
        )
        .register(
            "application",
            "guarded",
            ControllerClass::<GuardedController>::new().action("show", GuardedController::show),
        );
    registry
}

pub fn dispatcher(debug: bool) -> Dispatcher {
    let config = AppConfig::default();
    Dispatcher::new(Arc::new(registry()), config.views, debug)
}

/// Application with a generic matcher and every test controller.
pub fn application(config: AppConfig) -> Application {
    Application::builder(config)
        .matcher(Matcher::new("/:module/:controller/:action", None, None, None).unwrap())
        .controller("application", "dummy", dummy_class())
        .controller(
            "admin",
            "other",
            ControllerClass::<OtherController>::new().action("index", OtherController::index),
        )
        .controller(
            "application",
            "guarded",
            ControllerClass::<GuardedController>::new().action("show", GuardedController::show),
        )
        .build()
        .unwrap()
}

pub fn debug_config() -> AppConfig {
    AppConfig {
        debug: true,
        ..AppConfig::default()
    }
}
