//! External MCP servers — configure external MCP server connections.
//!
//! This example demonstrates the `.mcp_servers()` configuration for connecting
//! to external MCP servers (filesystem, database, API servers, etc.) launched
//! as subprocesses by the CLI.
//!
//! For SDK-hosted MCP tools (Rust functions), see the `custom_tool` example instead.
//!
//! ## Run
//! ```sh
//! cargo run -p examples --example external_mcp
//! ```

use rusty_claw::options::McpServerConfig;
use rusty_claw::prelude::*;
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_claw=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    println!("=== External MCP Server Configuration ===\n");

    let mut mcp_servers = HashMap::new();

    mcp_servers.insert(
        "filesystem".to_string(),
        McpServerConfig {
            command: "npx".to_string(),
            args: vec![
                "-y".to_string(),
                "@modelcontextprotocol/server-filesystem".to_string(),
                "/tmp".to_string(),
            ],
            env: HashMap::new(),
        },
    );

    let mut database_env = HashMap::new();
    database_env.insert("DATABASE_URL".to_string(), "postgres://localhost/app".to_string());
    mcp_servers.insert(
        "database".to_string(),
        McpServerConfig {
            command: "mcp-server-postgres".to_string(),
            args: vec!["--read-only".to_string()],
            env: database_env,
        },
    );

    let options = ClaudeAgentOptions::builder()
        .permission_mode(PermissionMode::AcceptEdits)
        .mcp_servers(mcp_servers)
        .build();

    println!(
        "Configured {} external MCP server(s):",
        options.mcp_servers.len()
    );
    for (name, config) in &options.mcp_servers {
        println!("  - {}: {} {}", name, config.command, config.args.join(" "));
    }

    // --- SDK-hosted MCP tools (alternate path) ---
    println!("\n=== SDK-Hosted MCP Comparison ===\n");
    println!("For Rust-native tools hosted in-process instead of as a subprocess:");
    println!();
    println!("  let mut server = SdkMcpServerImpl::new(\"my_tools\", \"1.0.0\");");
    println!("  server.register_tool(my_tool);");
    println!("  let mut registry = SdkMcpServerRegistry::new();");
    println!("  registry.register(server);");
    println!("  client.register_mcp_message_handler(Arc::new(registry));");
    println!();
    println!("See the `custom_tool` example for a complete working demo.\n");

    println!("Done — configured external MCP server subprocess launches.");
    Ok(())
}
