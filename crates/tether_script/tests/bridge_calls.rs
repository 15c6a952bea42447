use std::cell::Cell;
use std::rc::Rc;
use tether_core::{BridgeConfig, CallRequest, ErrorKind, HostRegistry, Scalar};
use tether_script::Bridge;

const CALL_MODULE: &str = r#"
let calls = 0;

export const answer = 42;

export function pass_integer(n) { return n; }
export function constant() { return 10; }
export function counter() { calls += 1; return calls; }
export function describe(...args) {
    return args.map((a) => typeof a + ":" + String(a)).join(",");
}
export function double_big(n) { return n * 2n; }
export function returns_object() { return { nested: true }; }

export function test_raise() { throw new Error("script_test_exception"); }
export function throw_string() { throw "plain failure"; }

export function test_call() { return host.call("pass_integer", 10); }
export function test_custom_exception() {
    try { host.call("test_raise", 0); } catch (e) { return 1; }
    return 0;
}
export function host_error_text() {
    try { host.call("test_raise", 0); } catch (e) { return e.message; }
    return "";
}
export function host_join() { return host.call("join", 1, 2, 3, 4, 5); }
export function host_kinds() { return host.call("kinds", true, 3, "x", 2.5, 7n); }
export function missing_host() {
    try { host.call("does_not_exist"); } catch (e) { return e.message; }
    return "";
}
export function malformed_host() {
    try { host.call(42); } catch (e) { return e.message; }
    return "";
}
export function object_argument() {
    try { host.call("count", {}); } catch (e) { return e.message; }
    return "";
}
export function nested_depth(n) { return n <= 0 ? 0 : host.call("descend", n - 1) + 1; }
export function order() {
    const log = [];
    Promise.resolve().then(() => log.push("microtask"));
    log.push("before");
    host.call("reenter");
    log.push("after");
    return log.join(",");
}
export function raise_through_host() {
    try { host.call("call_raising_script"); } catch (e) { return e.message; }
    return "";
}
"#;

struct Fixture {
    bridge: Bridge,
    host_calls: Rc<Cell<usize>>,
}

fn registry(host_calls: Rc<Cell<usize>>) -> HostRegistry {
    let mut registry = HostRegistry::new();
    registry
        .register("pass_integer", |_, args| {
            args.first()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("pass_integer expects one argument"))
        })
        .unwrap();
    registry
        .register("test_raise", |_, _| anyhow::bail!("host_test_exception"))
        .unwrap();
    registry
        .register("join", |_, args| {
            let parts: Vec<String> = args.iter().map(Scalar::to_string).collect();
            Ok(Scalar::Str(parts.join(",")))
        })
        .unwrap();
    registry
        .register("kinds", |_, args| {
            let kinds: Vec<&str> = args.iter().map(|arg| arg.kind().name()).collect();
            Ok(Scalar::Str(kinds.join(",")))
        })
        .unwrap();
    registry
        .register("count", move |_, _| {
            host_calls.set(host_calls.get() + 1);
            Ok(Scalar::Int(host_calls.get() as i32))
        })
        .unwrap();
    registry
        .register("descend", |script, args| {
            Ok(script.call_script(&CallRequest::new("nested_depth", args.to_vec()))?)
        })
        .unwrap();
    registry
        .register("test_call", |script, _| {
            Ok(script.call_script(&CallRequest::new("pass_integer", vec![Scalar::Int(10)]))?)
        })
        .unwrap();
    registry
        .register("reenter", |script, _| {
            Ok(script.call_script(&CallRequest::named("constant"))?)
        })
        .unwrap();
    registry
        .register("call_raising_script", |script, _| {
            Ok(script.call_script(&CallRequest::named("test_raise"))?)
        })
        .unwrap();
    registry
}

fn fixture() -> Fixture {
    let host_calls = Rc::new(Cell::new(0));
    let bridge = Bridge::builder(BridgeConfig::default())
        .module("call", CALL_MODULE)
        .with_registry(registry(Rc::clone(&host_calls)))
        .build()
        .unwrap();
    Fixture { bridge, host_calls }
}

fn call(bridge: &Bridge, function: &str, arguments: Vec<Scalar>) -> Scalar {
    bridge
        .call_script(&CallRequest::new(function, arguments))
        .unwrap()
}

#[test]
fn zero_argument_call_returns_the_scalar() {
    let fx = fixture();
    assert_eq!(call(&fx.bridge, "constant", vec![]), Scalar::Int(10));
}

#[test]
fn script_calls_host_by_registered_name() {
    let fx = fixture();
    assert_eq!(call(&fx.bridge, "test_call", vec![]), Scalar::Int(10));
}

#[test]
fn host_calls_script_from_host_function() {
    let fx = fixture();
    let value = fx.bridge.call_host(&CallRequest::named("test_call")).unwrap();
    assert_eq!(value, Scalar::Int(10));
}

#[test]
fn scalars_survive_a_script_round_trip() {
    let fx = fixture();
    let values = [
        Scalar::Bool(true),
        Scalar::Bool(false),
        Scalar::Int(0),
        Scalar::Int(-7),
        Scalar::Long(-(1 << 40)),
        Scalar::Str(String::new()),
        Scalar::from("pyml"),
        Scalar::Float(2.5),
        Scalar::Float(0.0),
        Scalar::Float(2.0),
        Scalar::Float(-1.0),
    ];
    for value in values {
        assert_eq!(call(&fx.bridge, "pass_integer", vec![value.clone()]), value);
    }
    assert_eq!(
        call(&fx.bridge, "double_big", vec![Scalar::Long(21)]),
        Scalar::Long(42)
    );
}

#[test]
fn argument_order_and_count_are_preserved_into_script() {
    let fx = fixture();
    assert_eq!(call(&fx.bridge, "describe", vec![]), Scalar::from(""));
    assert_eq!(
        call(&fx.bridge, "describe", vec![Scalar::Int(1)]),
        Scalar::from("number:1")
    );
    assert_eq!(
        call(
            &fx.bridge,
            "describe",
            vec![
                Scalar::Bool(true),
                Scalar::Int(3),
                Scalar::from("x"),
                Scalar::Float(2.5),
                Scalar::Long(7),
            ]
        ),
        Scalar::from("boolean:true,number:3,string:x,number:2.5,bigint:7")
    );
}

#[test]
fn argument_order_and_kinds_are_preserved_into_host() {
    let fx = fixture();
    assert_eq!(call(&fx.bridge, "host_join", vec![]), Scalar::from("1,2,3,4,5"));
    assert_eq!(
        call(&fx.bridge, "host_kinds", vec![]),
        Scalar::from("boolean,integer,string,float,long integer")
    );
}

#[test]
fn script_exception_becomes_foreign_exception_and_is_cleared() {
    let fx = fixture();
    let err = fx
        .bridge
        .call_script(&CallRequest::named("test_raise"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ForeignException);
    assert!(err.to_string().contains("script_test_exception"));

    // the next unrelated call is unaffected
    assert_eq!(call(&fx.bridge, "constant", vec![]), Scalar::Int(10));
}

#[test]
fn thrown_strings_keep_their_text() {
    let fx = fixture();
    let err = fx
        .bridge
        .call_script(&CallRequest::named("throw_string"))
        .unwrap_err();
    assert_eq!(err.to_string(), "plain failure");
}

#[test]
fn host_failure_is_raised_inside_the_script() {
    let fx = fixture();
    assert_eq!(call(&fx.bridge, "test_custom_exception", vec![]), Scalar::Int(1));
    assert_eq!(
        call(&fx.bridge, "host_error_text", vec![]),
        Scalar::from("host_test_exception")
    );
}

#[test]
fn host_failure_is_reported_when_called_from_host() {
    let fx = fixture();
    let err = fx
        .bridge
        .call_host(&CallRequest::named("test_raise"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ForeignException);
    assert_eq!(err.to_string(), "host_test_exception");
}

#[test]
fn script_failure_crosses_two_boundaries() {
    let fx = fixture();
    let message = call(&fx.bridge, "raise_through_host", vec![]);
    assert_eq!(message, Scalar::from("Error: script_test_exception"));
    assert_eq!(call(&fx.bridge, "constant", vec![]), Scalar::Int(10));
}

#[test]
fn nested_calls_recurse_through_both_runtimes() {
    let fx = fixture();
    assert_eq!(
        call(&fx.bridge, "nested_depth", vec![Scalar::Int(4)]),
        Scalar::Int(4)
    );
}

#[test]
fn nested_calls_leave_queued_promise_jobs_alone() {
    let fx = fixture();
    assert_eq!(call(&fx.bridge, "order", vec![]), Scalar::from("before,after"));
    assert_eq!(call(&fx.bridge, "constant", vec![]), Scalar::Int(10));
}

#[test]
fn module_body_runs_once_at_build_and_may_call_host() {
    let mut registry = HostRegistry::new();
    registry
        .register("seed", |_, _| Ok(Scalar::Int(7)))
        .unwrap();
    let bridge = Bridge::builder(BridgeConfig::default())
        .module(
            "call",
            r#"
            let loads = 0;
            loads += 1;
            export const seeded = host.call("seed");
            export function loaded() { return loads; }
            export function seed_value() { return seeded; }
            "#,
        )
        .with_registry(registry)
        .build()
        .unwrap();

    assert_eq!(call(&bridge, "seed_value", vec![]), Scalar::Int(7));
    assert_eq!(call(&bridge, "loaded", vec![]), Scalar::Int(1));
    assert_eq!(call(&bridge, "loaded", vec![]), Scalar::Int(1));
}

#[test]
fn missing_script_function_is_not_found_without_side_effects() {
    let fx = fixture();
    let err = fx
        .bridge
        .call_script(&CallRequest::named("does_not_exist"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(call(&fx.bridge, "counter", vec![]), Scalar::Int(1));
}

#[test]
fn missing_host_function_is_raised_as_not_found() {
    let fx = fixture();
    assert_eq!(
        call(&fx.bridge, "missing_host", vec![]),
        Scalar::from("function 'does_not_exist' does not exist")
    );
    let err = fx
        .bridge
        .call_host(&CallRequest::named("does_not_exist"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn non_function_export_is_not_callable() {
    let fx = fixture();
    let err = fx
        .bridge
        .call_script(&CallRequest::named("answer"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotCallable);
}

#[test]
fn missing_module_is_unavailable() {
    let config = BridgeConfig {
        module: "absent".to_string(),
        ..BridgeConfig::default()
    };
    let bridge = Bridge::builder(config).build().unwrap();
    let err = bridge
        .call_script(&CallRequest::named("constant"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModuleUnavailable);
    assert!(err.to_string().contains("absent"));
}

#[test]
fn broken_module_is_unavailable() {
    let bridge = Bridge::builder(BridgeConfig::default())
        .module("call", "export function broken( {")
        .build()
        .unwrap();
    let err = bridge
        .call_script(&CallRequest::named("broken"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModuleUnavailable);

    // the failed import left nothing pending
    assert_eq!(bridge.eval("'still' + ' alive'").unwrap(), Scalar::from("still alive"));
}

#[test]
fn malformed_requests_fail_before_any_call() {
    let fx = fixture();
    let err = fx.bridge.call_script(&CallRequest::named("")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedRequest);

    let message = call(&fx.bridge, "malformed_host", vec![]);
    assert!(message.as_str().unwrap().starts_with("malformed call request"));

    assert_eq!(call(&fx.bridge, "counter", vec![]), Scalar::Int(1));
}

#[test]
fn unsupported_script_argument_aborts_the_host_call() {
    let fx = fixture();
    let message = call(&fx.bridge, "object_argument", vec![]);
    let message = message.as_str().unwrap();
    assert!(message.contains("argument list could not be marshaled"), "{message}");
    assert!(message.contains("object"), "{message}");
    assert_eq!(fx.host_calls.get(), 0);
}

#[test]
fn unsupported_return_value_is_reported() {
    let fx = fixture();
    let err = fx
        .bridge
        .call_script(&CallRequest::named("returns_object"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
}

#[test]
fn eval_converts_completion_values() {
    let fx = fixture();
    assert_eq!(fx.bridge.eval("host.call('pass_integer', 5)").unwrap(), Scalar::Int(5));

    let err = fx.bridge.eval("undefinedFunction()").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ForeignException);
    assert!(err.to_string().starts_with("ReferenceError"));
}
