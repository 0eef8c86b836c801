//! `maitred agent` — Interactive or single-message chat mode.

use maitred_config::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.reasoner.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No reasoner API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export MISTRAL_API_KEY='...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let concierge = maitred_gateway::build_concierge(&config)?;
    let thread_id = config.agent.default_thread.clone();

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = concierge.handle(&thread_id, &msg).await?;
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Maitred — front desk, at your service.");
    println!("  Model:  {}", config.reasoner.model);
    println!("  Thread: {thread_id}");
    println!();
    println!("  Type your message and press Enter. Type 'exit' to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    use std::io::Write;
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if !line.is_empty() {
            match concierge.handle(&thread_id, line).await {
                Ok(reply) => println!("  Desk > {reply}"),
                Err(e) => eprintln!("  [receptionist unavailable: {e}]"),
            }
        }
        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!("  Goodbye!");
    Ok(())
}
