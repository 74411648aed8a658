//! Advanced configuration — setting sources and beta features.
//!
//! This example demonstrates lesser-used configuration options:
//! - `.setting_sources()` — control which settings files the CLI reads
//! - `.betas()` — enable beta/experimental features
//!
//! ## Run
//! ```sh
//! cargo run -p examples --example advanced_config
//! ```

use rusty_claw::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_claw=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    println!("=== Advanced Configuration ===\n");

    // --- 1. Setting Sources ---
    // Control which settings files the CLI reads. Left unset (None), the CLI
    // uses its own defaults; set it to isolate the agent from user/project settings.

    println!("--- Setting Sources ---\n");

    // Default: None — the CLI decides which settings files apply
    let default_sources = ClaudeAgentOptions::builder().model("claude-sonnet-4-5").build();
    println!("Default setting_sources: {:?}", default_sources.setting_sources);

    // Custom: only read local project settings
    let local_only = ClaudeAgentOptions::builder()
        .model("claude-sonnet-4-5")
        .setting_sources(vec!["local".to_string(), "project".to_string()])
        .build();
    println!("Custom setting_sources: {:?}", local_only.setting_sources);

    // Show how it affects CLI args
    let args = local_only.to_cli_args();
    let settings_args: Vec<_> = args.iter().filter(|a| a.contains("setting")).collect();
    println!("CLI args: {:?}\n", settings_args);

    // --- 2. Betas ---
    // Enable experimental CLI features by name.
    // These are passed as --beta flags to the CLI.

    println!("--- Beta Features ---\n");

    let with_betas = ClaudeAgentOptions::builder()
        .model("claude-sonnet-4-5")
        .betas(vec![
            "extended-thinking".to_string(),
            "tool-streaming".to_string(),
        ])
        .build();
    println!("Enabled betas: {:?}", with_betas.betas);

    let args = with_betas.to_cli_args();
    let beta_args: Vec<_> = args.iter().filter(|a| a.contains("beta")).collect();
    println!("CLI args: {:?}\n", beta_args);

    // --- 3. Combined advanced configuration ---
    println!("--- Combined Configuration ---\n");

    let advanced = ClaudeAgentOptions::builder()
        .model("claude-sonnet-4-5")
        .permission_mode(PermissionMode::AcceptEdits)
        .setting_sources(vec!["local".to_string()])
        .betas(vec!["extended-thinking".to_string()])
        .allowed_tools(vec!["Read".to_string(), "Grep".to_string()])
        .build();

    println!("Combined options:");
    println!("  model:            {:?}", advanced.model);
    println!("  permission_mode:  {:?}", advanced.permission_mode);
    println!("  setting_sources:  {:?}", advanced.setting_sources);
    println!("  betas:            {:?}", advanced.betas);
    println!("  allowed_tools:    {:?}", advanced.allowed_tools);
    println!();

    let all_args = advanced.to_cli_args();
    println!("Full CLI args:");
    for arg in &all_args {
        println!("  {}", arg);
    }

    println!("\nDone — demonstrated setting_sources and betas.");
    Ok(())
}
