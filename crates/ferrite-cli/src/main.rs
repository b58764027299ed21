use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ferrite_drivers::{register_driver_tools, BytecodeAdapter};
use ferrite_host::{FsStore, InMemoryDriverManager, InMemoryToolRegistry};
use ferrite_vm::{assemble, disassemble, Vm};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Ferrite - Driver Virtualization Toolkit
#[derive(Parser)]
#[command(name = "ferrite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Virtualized device drivers backed by bytecode programs", long_about = "Ferrite Driver Toolkit\n\nManage JSON-declared virtual drivers and run their bytecode programs:\n  - Define, list and remove drivers\n  - Execute driver lifecycle functions\n  - Run and disassemble standalone programs")]
#[command(author = "Ferrite Team")]
struct Cli {
    /// Directory holding persisted driver descriptors
    #[arg(long, value_name = "DIR", default_value = ".ferrite")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a driver from a JSON description file
    Define {
        /// Path to the description file
        file: String,
    },
    /// List registered drivers
    List {
        /// Only show drivers of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Unregister a driver
    Remove {
        /// Driver id
        id: String,
    },
    /// Execute a lifecycle function on a driver
    Exec {
        /// Driver id
        id: String,
        /// Function name (init, deinit, read, write, control, getStatus)
        function: String,
        /// Function parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        params: Option<String>,
    },
    /// Run a standalone bytecode program file
    Run {
        /// Path to the program file
        file: String,
        /// Show the disassembled program before running
        #[arg(long)]
        disasm: bool,
    },
    /// Disassemble a bytecode program file
    Disassemble {
        /// Path to the program file
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Define { file } => {
            let tools = open_tools(&cli.state_dir)?;
            let description = read_json(&file)?;
            let result = invoke(&tools, "driver_define", &description)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::List { category } => {
            let tools = open_tools(&cli.state_dir)?;
            let params = match category {
                Some(c) => json!({ "category": c }),
                None => json!({}),
            };
            let result = invoke(&tools, "driver_list", &params)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Remove { id } => {
            let tools = open_tools(&cli.state_dir)?;
            let result = invoke(&tools, "driver_remove", &json!({ "id": id }))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Exec {
            id,
            function,
            params,
        } => {
            let tools = open_tools(&cli.state_dir)?;
            let params = match params {
                Some(raw) => serde_json::from_str(&raw).context("--params is not valid JSON")?,
                None => json!({}),
            };
            let request = json!({ "id": id, "function": function, "params": params });
            let result = invoke(&tools, "driver_exec", &request)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Run { file, disasm } => {
            let program = load_program(&file)?;
            if disasm {
                print!("{}", disassemble(&program));
            }
            let result = Vm::new()
                .execute(&program)
                .with_context(|| format!("program `{}` failed", file))?;
            println!("{}", result);
        }
        Commands::Disassemble { file } => {
            let program = load_program(&file)?;
            print!("{}", disassemble(&program));
        }
    }

    Ok(())
}

/// Registry wired to a bytecode adapter over the on-disk store, with every
/// persisted driver re-registered
fn open_tools(state_dir: &Path) -> Result<InMemoryToolRegistry> {
    let store = FsStore::open(state_dir)
        .with_context(|| format!("cannot open state directory {}", state_dir.display()))?;
    let adapter = Arc::new(BytecodeAdapter::new(
        Arc::new(InMemoryDriverManager::new()),
        Some(Arc::new(store)),
    ));
    adapter
        .load_all()
        .map_err(|e| anyhow::anyhow!("loading persisted drivers: {}", e))?;

    let registry = InMemoryToolRegistry::new();
    register_driver_tools(&registry, adapter)?;
    Ok(registry)
}

fn invoke(
    tools: &InMemoryToolRegistry,
    name: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value> {
    match tools.invoke(name, params) {
        Ok(result) => Ok(result),
        Err(message) => bail!("{}", message),
    }
}

fn read_json(path: &str) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path))
}

fn load_program(path: &str) -> Result<ferrite_vm::Program> {
    let source = read_json(path)?;
    let program = assemble(&source).with_context(|| format!("assembling {}", path))?;
    program
        .validate()
        .with_context(|| format!("validating {}", path))?;
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> serde_json::Value {
        json!({
            "id": "t0",
            "category": "sensor",
            "persistent": true,
            "programs": {
                "read": [["PUSH_STR", "21.5"], ["HALT"]],
                "write": [["PUSH_NUM", 0], ["HALT"]]
            }
        })
    }

    #[test]
    fn test_state_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        {
            let tools = open_tools(dir.path()).unwrap();
            let result = invoke(&tools, "driver_define", &description()).unwrap();
            assert_eq!(result, json!({"registered": "t0"}));
        }

        // A fresh invocation over the same state dir sees the driver again
        let tools = open_tools(dir.path()).unwrap();
        let listed = invoke(&tools, "driver_list", &json!({})).unwrap();
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], json!("t0"));

        let result = invoke(
            &tools,
            "driver_exec",
            &json!({"id": "t0", "function": "read"}),
        )
        .unwrap();
        assert_eq!(result["data"], json!("21.5"));
    }

    #[test]
    fn test_remove_does_not_drop_persisted_state() {
        let dir = tempfile::tempdir().unwrap();

        {
            let tools = open_tools(dir.path()).unwrap();
            invoke(&tools, "driver_define", &description()).unwrap();
            invoke(&tools, "driver_remove", &json!({"id": "t0"})).unwrap();
        }

        // The store has no delete, so a restart resurrects the driver
        let tools = open_tools(dir.path()).unwrap();
        let listed = invoke(&tools, "driver_list", &json!({})).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_load_program_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.json");
        fs::write(
            &path,
            r#"{"code": [["PUSH_NUM", 3], ["PUSH_NUM", 4], ["ADD"], ["HALT"]]}"#,
        )
        .unwrap();

        let program = load_program(path.to_str().unwrap()).unwrap();
        let result = Vm::new().execute(&program).unwrap();
        assert_eq!(result.to_string(), "7");
    }

    #[test]
    fn test_load_program_rejects_invalid_bytecode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[["PUSH_NUM", 1], ["NOT"], ["HALT"]]"#).unwrap();
        assert!(load_program(path.to_str().unwrap()).is_err());
    }
}
