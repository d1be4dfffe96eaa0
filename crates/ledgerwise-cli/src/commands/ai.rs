//! Text-generation backend command implementations

use anyhow::Result;
use ledgerwise_core::insights::InsightStrategy;
use ledgerwise_core::{demo_stats, AIClient, Config, RemoteInsightStrategy, TextGenerator};

/// Test the configured backend: reachability, then one insight request
pub async fn cmd_ai_test(config: &Config) -> Result<()> {
    println!("🔍 Testing text-generation backend...\n");
    println!("  Backend: {}", config.ai.backend);
    println!("  Timeout: {}s", config.ai.timeout_secs);

    let Some(client) = AIClient::from_config(&config.ai) else {
        println!("\n⚠️  No credential configured: reports will use local insights.");
        println!("\nTo enable AI insights:");
        println!("  Gemini:            export GEMINI_API_KEY=<your key>");
        println!("  OpenAI-compatible: export AI_BACKEND=openai_compatible");
        println!("                     export OPENAI_COMPATIBLE_HOST=http://localhost:8000");
        return Ok(());
    };

    println!("  Model:   {}", client.model());
    println!("  Host:    {}\n", client.host());

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        return Ok(());
    }

    println!("\n📋 Requesting insights for the demo month...\n");
    let strategy = RemoteInsightStrategy::new(client).with_currency_symbol(config.currency_symbol.as_str());
    match strategy.insights(&demo_stats()).await {
        Ok(insights) => {
            for (i, insight) in insights.iter().enumerate() {
                println!("  {}. {}", i + 1, insight);
            }
            println!("\n✅ Backend returned {} insights", insights.len());
        }
        Err(e) => {
            println!("  ❌ Error: {}", e);
            println!("\n⚠️  Reports will fall back to the default insight list.");
        }
    }

    Ok(())
}
