//! The four tool-registry shims, end to end

use ferrite_context::set_current;
use ferrite_drivers::{register_driver_tools, BytecodeAdapter};
use ferrite_host::{InMemoryDriverManager, InMemoryToolRegistry};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

static CTX_LOCK: Mutex<()> = Mutex::new(());

fn setup() -> (InMemoryToolRegistry, Arc<BytecodeAdapter>) {
    let adapter = Arc::new(BytecodeAdapter::new(
        Arc::new(InMemoryDriverManager::new()),
        None,
    ));
    let registry = InMemoryToolRegistry::new();
    register_driver_tools(&registry, adapter.clone()).unwrap();
    (registry, adapter)
}

fn description(id: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "category": category,
        "programs": {
            "read": [["PUSH_STR", "payload"], ["HALT"]],
            "write": [["PUSH_NUM", 0], ["HALT"]],
            "control": [["PUSH_NUM", 5], ["HALT"]]
        }
    })
}

#[test]
fn test_all_four_tools_are_registered() {
    let (registry, _) = setup();
    assert_eq!(
        registry.names(),
        vec!["driver_define", "driver_exec", "driver_list", "driver_remove"]
    );
}

#[test]
fn test_define_then_list() {
    let (registry, adapter) = setup();
    let result = registry
        .invoke("driver_define", &description("s0", "sensor"))
        .unwrap();
    assert_eq!(result, json!({"registered": "s0"}));
    assert_eq!(adapter.len(), 1);

    registry
        .invoke("driver_define", &description("a0", "actuator"))
        .unwrap();

    let all = registry.invoke("driver_list", &json!({})).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let sensors = registry
        .invoke("driver_list", &json!({"category": "sensor"}))
        .unwrap();
    let sensors = sensors.as_array().unwrap();
    assert_eq!(sensors.len(), 1);
    assert_eq!(sensors[0]["id"], json!("s0"));
}

#[test]
fn test_define_surfaces_adapter_error_as_string() {
    let (registry, adapter) = setup();
    let err = registry
        .invoke("driver_define", &json!({"name": "anonymous"}))
        .unwrap_err();
    assert!(err.contains("invalid driver description"));
    assert_eq!(adapter.len(), 0);
}

#[test]
fn test_remove() {
    let (registry, adapter) = setup();
    registry
        .invoke("driver_define", &description("s0", "sensor"))
        .unwrap();
    let result = registry
        .invoke("driver_remove", &json!({"id": "s0"}))
        .unwrap();
    assert_eq!(result, json!({"removed": "s0"}));
    assert_eq!(adapter.len(), 0);

    let err = registry
        .invoke("driver_remove", &json!({"id": "s0"}))
        .unwrap_err();
    assert!(err.contains("not found"));
}

#[test]
fn test_exec_read_targets_the_named_driver() {
    let _g = CTX_LOCK.lock();
    set_current(None);
    let (registry, _) = setup();
    registry
        .invoke("driver_define", &description("first", "sensor"))
        .unwrap();
    let mut other = description("second", "sensor");
    other["programs"]["read"] = json!([["PUSH_STR", "second-payload"], ["HALT"]]);
    registry.invoke("driver_define", &other).unwrap();

    // exec pins driver_id in a scoped context, so the second driver is
    // reachable even though it did not register first
    let result = registry
        .invoke("driver_exec", &json!({"id": "second", "function": "read"}))
        .unwrap();
    assert_eq!(result["data"], json!("second-payload"));
    assert_eq!(result["size"], json!("second-payload".len()));
}

#[test]
fn test_exec_control_and_write() {
    let _g = CTX_LOCK.lock();
    set_current(None);
    let (registry, _) = setup();
    registry
        .invoke("driver_define", &description("s0", "sensor"))
        .unwrap();

    let result = registry
        .invoke(
            "driver_exec",
            &json!({"id": "s0", "function": "control", "params": {"command": 1}}),
        )
        .unwrap();
    assert_eq!(result, json!({"code": 5}));

    let result = registry
        .invoke(
            "driver_exec",
            &json!({"id": "s0", "function": "write", "params": {"data": "{\"v\":1}"}}),
        )
        .unwrap();
    assert_eq!(result, json!({"code": 0}));
}

#[test]
fn test_exec_rejects_unknown_id_and_function() {
    let _g = CTX_LOCK.lock();
    set_current(None);
    let (registry, _) = setup();
    registry
        .invoke("driver_define", &description("s0", "sensor"))
        .unwrap();

    let err = registry
        .invoke("driver_exec", &json!({"id": "ghost", "function": "read"}))
        .unwrap_err();
    assert!(err.contains("not found"));

    let err = registry
        .invoke("driver_exec", &json!({"id": "s0", "function": "reboot"}))
        .unwrap_err();
    assert!(err.contains("unknown driver function"));
}
