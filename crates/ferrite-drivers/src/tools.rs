//! Tool-registry shims
//!
//! Four JSON operations exposed to the agent's tool registry: define a
//! driver, list drivers (optionally by category), remove a driver, and
//! execute a named lifecycle function on a driver. Each is a thin
//! unwrap-JSON / call-primitive / wrap-result layer over the bytecode
//! adapter; adapter errors surface as structured error strings.

use crate::bytecode::BytecodeAdapter;
use crate::DRIVER_ID_VAR;
use ferrite_context::{CurrentScope, ExecutionContext, Variable};
use ferrite_host::{json, DriverCategory, HostError, Tool, ToolRegistry};
use serde_json::{json as jsonv, Value as Json};
use std::sync::Arc;

/// Register the four driver tools
pub fn register_driver_tools(
    registry: &dyn ToolRegistry,
    adapter: Arc<BytecodeAdapter>,
) -> Result<(), HostError> {
    registry.register_tool(Tool::new(
        "driver_define",
        "Register a virtual driver from its JSON description",
        {
            let adapter = adapter.clone();
            Box::new(move |params| {
                adapter.register_json(params).map_err(|e| e.to_string())?;
                let id = json::get_str(params, "id").unwrap_or_default();
                Ok(jsonv!({ "registered": id }))
            })
        },
    ))?;

    registry.register_tool(Tool::new(
        "driver_list",
        "List registered drivers, optionally filtered by category",
        {
            let adapter = adapter.clone();
            Box::new(move |params| {
                let filter = match json::get_str(params, "category") {
                    Some(raw) => Some(raw.parse::<DriverCategory>()?),
                    None => None,
                };
                let drivers: Vec<Json> = adapter
                    .list()
                    .iter()
                    .filter(|d| filter.map_or(true, |c| d.meta.category == c))
                    .map(|d| {
                        jsonv!({
                            "id": d.meta.id,
                            "name": d.meta.name,
                            "version": d.meta.version,
                            "category": d.meta.category.as_str(),
                        })
                    })
                    .collect();
                Ok(Json::Array(drivers))
            })
        },
    ))?;

    registry.register_tool(Tool::new(
        "driver_remove",
        "Unregister a driver by id",
        {
            let adapter = adapter.clone();
            Box::new(move |params| {
                let id = json::get_str(params, "id").ok_or("missing `id`")?;
                adapter.unregister(id).map_err(|e| e.to_string())?;
                Ok(jsonv!({ "removed": id }))
            })
        },
    ))?;

    registry.register_tool(Tool::new(
        "driver_exec",
        "Execute a named lifecycle function on a driver",
        Box::new(move |params| {
            let id = json::get_str(params, "id").ok_or("missing `id`")?;
            let function = json::get_str(params, "function").ok_or("missing `function`")?;
            exec_function(&adapter, id, function, params)
        }),
    ))?;

    Ok(())
}

/// Dispatch through the driver manager's installed operations with the
/// target id set in a scoped execution context, the same identity channel
/// every other caller uses.
fn exec_function(
    adapter: &BytecodeAdapter,
    id: &str,
    function: &str,
    params: &Json,
) -> Result<Json, String> {
    let info = adapter
        .manager()
        .find(id)
        .ok_or_else(|| format!("driver `{}` not found", id))?;

    let ctx = ExecutionContext::new("tool-call", None, 8);
    ctx.set_variable(DRIVER_ID_VAR, Variable::from(id))
        .map_err(|e| e.to_string())?;
    let _scope = CurrentScope::enter(ctx);

    match function {
        "init" => wrap_code(function, info.ops.init()),
        "deinit" => wrap_code(function, info.ops.deinit()),
        "read" => {
            let max_size = json::get_i64_or(params, "params.maxSize", 256).max(0) as usize;
            let mut buf = Vec::new();
            let n = info.ops.read(&mut buf, max_size);
            if n < 0 {
                return Err(format!("read failed with code {}", n));
            }
            Ok(jsonv!({
                "size": n,
                "data": String::from_utf8_lossy(&buf),
            }))
        }
        "write" => {
            let data = json::get_str(params, "params.data").ok_or("missing `params.data`")?;
            wrap_code(function, info.ops.write(data.as_bytes()))
        }
        "control" => {
            let command = json::get_i64(params, "params.command")
                .ok_or("missing `params.command`")? as i32;
            let arg = json::get_str(params, "params.arg");
            wrap_code(function, info.ops.control(command, arg))
        }
        "getStatus" => {
            let mut buf = String::new();
            let n = info.ops.get_status(&mut buf, 512);
            if n < 0 {
                return Err(format!("getStatus failed with code {}", n));
            }
            // Status text is usually JSON; fall back to the raw string
            Ok(serde_json::from_str(&buf).unwrap_or(Json::String(buf)))
        }
        other => Err(format!("unknown driver function `{}`", other)),
    }
}

fn wrap_code(function: &str, code: i32) -> Result<Json, String> {
    if code < 0 {
        Err(format!("{} failed with code {}", function, code))
    } else {
        Ok(jsonv!({ "code": code }))
    }
}
