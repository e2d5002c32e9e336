use lambda_workflow::{
    BoxError, Context, ErrorKind, Json, ProxyRequest, ProxyWorkflow,
    hooks::{BranchAction, ConditionalAction, LoggingAction},
    testing::{CallLog, FailingAction},
};
use std::sync::{Arc, Mutex};

mod common;
use common::{JsonReq, json_request, labelled};

#[test]
fn test_pre_actions_run_in_order_before_handler() {
    let log = CallLog::new();
    let workflow = ProxyWorkflow::builder()
        .add_pre_action(log.action("pre1"))
        .add_pre_action(log.action("pre2"))
        .add_get_handler("/", labelled(&log, "handler", 200))
        .build()
        .unwrap();

    workflow.handle(ProxyRequest::new("GET", "/")).unwrap();
    assert_eq!(log.joined(), "pre1pre2handler");
}

#[test]
fn test_post_actions_run_in_order_after_handler() {
    let log = CallLog::new();
    let workflow = ProxyWorkflow::builder()
        .add_post_action(log.action("post1"))
        .add_post_action(log.action("post2"))
        .add_get_handler("/", labelled(&log, "handler", 200))
        .build()
        .unwrap();

    workflow.handle(ProxyRequest::new("GET", "/")).unwrap();
    assert_eq!(log.joined(), "handlerpost1post2");
}

#[test]
fn test_global_and_local_actions_nest() {
    let log = CallLog::new();
    let workflow = ProxyWorkflow::builder()
        .add_pre_action(log.action("[global_pre]"))
        .add_post_action(log.action("[global_post]"))
        .add_get_handler("/", labelled(&log, "[handler]", 200))
        .with_pre_action(log.action("[local_pre1]"))
        .with_pre_action(log.action("[local_pre2]"))
        .with_post_action(log.action("[local_post]"))
        .build()
        .unwrap();

    workflow.handle(ProxyRequest::new("GET", "/")).unwrap();
    assert_eq!(
        log.joined(),
        "[global_pre][local_pre1][local_pre2][handler][local_post][global_post]"
    );
}

#[test]
fn test_local_actions_stay_on_their_route() {
    let log = CallLog::new();
    let workflow = ProxyWorkflow::builder()
        .add_get_handler("/a", labelled(&log, "a", 200))
        .with_post_action(log.action("a_post"))
        .add_get_handler("/b", labelled(&log, "b", 200))
        .with_post_action(log.action("b_post"))
        .build()
        .unwrap();

    workflow.handle(ProxyRequest::new("GET", "/b")).unwrap();
    assert_eq!(log.entries(), vec!["b", "b_post"]);
}

#[test]
fn test_post_actions_observe_handler_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let local_seen = seen.clone();
    let global_seen = seen.clone();
    let workflow = ProxyWorkflow::builder()
        .add_pre_action(|ctx: &mut Context| {
            assert!(ctx.handler_error().is_none());
        })
        .add_post_action(move |ctx: &mut Context| {
            let err = ctx.handler_error().map(ToString::to_string);
            global_seen.lock().unwrap().push(err);
        })
        .add_get_handler("/", |_: &mut Context| -> Result<(), BoxError> {
            Err("handler error".into())
        })
        .with_post_action(move |ctx: &mut Context| {
            let err = ctx.handler_error().map(ToString::to_string);
            local_seen.lock().unwrap().push(err);
        })
        .build()
        .unwrap();

    let err = workflow.handle(ProxyRequest::new("GET", "/")).unwrap_err();

    assert_eq!(err.to_string(), "handler error");
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("handler error".to_string()); 2]
    );
}

#[test]
fn test_failing_local_pre_action_skips_handler_and_rest() {
    let log = CallLog::new();
    let workflow = ProxyWorkflow::builder()
        .add_pre_action(log.action("global_pre"))
        .add_post_action(log.action("global_post"))
        .add_get_handler("/", labelled(&log, "handler", 200))
        .with_pre_action(FailingAction::new("local pre failed"))
        .with_pre_action(log.action("local_pre2"))
        .build()
        .unwrap();

    let err = workflow.handle(ProxyRequest::new("GET", "/")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Action);
    assert_eq!(err.to_string(), "local pre failed");
    // Side effects of actions that already ran are kept.
    assert_eq!(log.entries(), vec!["global_pre"]);
}

#[test]
fn test_failing_post_action_replaces_success() {
    let log = CallLog::new();
    let workflow = ProxyWorkflow::builder()
        .add_post_action(log.action("global_post"))
        .add_get_handler("/", labelled(&log, "handler", 200))
        .with_post_action(FailingAction::new("post failed"))
        .build()
        .unwrap();

    let err = workflow.handle(ProxyRequest::new("GET", "/")).unwrap_err();

    assert_eq!(err.to_string(), "post failed");
    assert_eq!(log.entries(), vec!["handler"]);
}

#[test]
fn test_pre_action_reads_decoded_request() {
    let seen = Arc::new(Mutex::new(None));
    let seen_in_action = seen.clone();
    let workflow = ProxyWorkflow::builder()
        .add_post_handler("/", |ctx: &mut Context, Json(req): Json<JsonReq>| {
            ctx.set_response(req).set_status_code(200);
        })
        .with_pre_action(move |ctx: &mut Context| -> Result<(), BoxError> {
            let code = ctx.request::<Json<JsonReq>>()?.map(|req| req.code);
            *seen_in_action.lock().unwrap() = code;
            Ok(())
        })
        .build()
        .unwrap();

    workflow
        .handle(json_request("POST", "/", &JsonReq::hello()))
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), Some(123));
}

#[test]
fn test_post_action_reads_decoded_request() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let local_seen = seen.clone();
    let global_seen = seen.clone();
    let workflow = ProxyWorkflow::builder()
        .add_post_action(move |ctx: &mut Context| -> Result<(), BoxError> {
            let message = ctx.request::<Json<JsonReq>>()?.map(|req| req.message.clone());
            global_seen.lock().unwrap().push(message);
            Ok(())
        })
        .add_post_handler("/", |ctx: &mut Context, Json(req): Json<JsonReq>| {
            ctx.set_response(req).set_status_code(200);
        })
        .with_post_action(move |ctx: &mut Context| -> Result<(), BoxError> {
            let message = ctx.request::<Json<JsonReq>>()?.map(|req| req.message.clone());
            local_seen.lock().unwrap().push(message);
            Ok(())
        })
        .build()
        .unwrap();

    workflow
        .handle(json_request("POST", "/", &JsonReq::hello()))
        .unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("Hello World!".to_string()); 2]
    );
}

#[test]
fn test_post_action_can_rewrite_response() {
    let workflow = ProxyWorkflow::builder()
        .add_get_handler("/", |ctx: &mut Context| {
            ctx.set_response("draft").set_status_code(200);
        })
        .with_post_action(|ctx: &mut Context| {
            ctx.set_response("final");
        })
        .build()
        .unwrap();

    let response = workflow.handle(ProxyRequest::new("GET", "/")).unwrap();
    assert_eq!(response.body, r#""final""#);
}

#[test]
fn test_standard_actions() {
    let log = CallLog::new();
    let is_admin = |ctx: &Context| {
        ctx.event::<ProxyRequest>()
            .is_ok_and(|req| req.headers.get("role").is_some_and(|r| r == "admin"))
    };
    let workflow = ProxyWorkflow::builder()
        .add_pre_action(LoggingAction::named("cars"))
        .add_pre_action(ConditionalAction::new(is_admin, log.action("audit")))
        .add_pre_action(BranchAction::new(
            is_admin,
            log.action("admin"),
            log.action("user"),
        ))
        .add_post_action(LoggingAction::new())
        .add_get_handler("/", labelled(&log, "handler", 200))
        .build()
        .unwrap();

    workflow
        .handle(ProxyRequest::new("GET", "/").with_header("role", "admin"))
        .unwrap();
    workflow.handle(ProxyRequest::new("GET", "/")).unwrap();

    assert_eq!(
        log.entries(),
        vec!["audit", "admin", "handler", "user", "handler"]
    );
}
