use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use bot::{Config, Router};
use storage::MemoryStore;

#[derive(Parser)]
#[command(name = "event bot", version, about = "Thai event/contact chat bot core", long_about = None)]
struct Cli {
    /// Sender id to impersonate on this console
    #[arg(short, long, default_value = "U1")]
    sender: String,
    /// Sender ids granted the admin role (repeatable)
    #[arg(short, long)]
    admin: Vec<String>,
    /// Print replies as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    // config
    let cli = Cli::parse();
    let config = Config::with_admins(cli.admin.iter().cloned());
    let role = config.role_of(&cli.sender);

    // core
    let store = Arc::new(MemoryStore::new());
    let router = Router::new(config, store.clone());
    tracing::info!(sender = %cli.sender, %role, "🚀 starting console bot");

    // console loop: one line in, one reply out
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();
    out.write_all("พิมพ์ข้อความ (Ctrl-D เพื่อออก)\n> ".as_bytes())
        .await?;
    out.flush().await?;
    while let Some(line) = lines.next_line().await? {
        let reply = router.handle(&cli.sender, role, &line).await;
        let rendered = if cli.json {
            serde_json::to_string_pretty(&reply)?
        } else {
            reply.text.clone()
        };
        out.write_all(format!("{rendered}\n> ").as_bytes()).await?;
        out.flush().await?;
    }

    // anything queued by broadcasts during the session
    for (recipient, message) in store.outbox().await {
        tracing::info!(%recipient, %message, "queued outbound message");
    }
    Ok(())
}
