//! AI coaching command implementations

use anyhow::{bail, Context, Result};
use nestegg_core::analytics::coaching_data;
use nestegg_core::{
    is_visible, AIBackend, AIClient, Coach, Config, Feature, FinanceStore, PromptLibrary,
    Sentiment,
};

use super::session::{print_json, Session};

/// Bail unless the account tier may use `feature`
fn require_feature(session: &Session, feature: Feature) -> Result<()> {
    let tier = session.store.account_tier()?;
    if !is_visible(tier, feature) {
        bail!(
            "{} requires a premium account (this ledger is {})",
            feature,
            tier
        );
    }
    Ok(())
}

pub async fn cmd_coach(
    session: &Session,
    client: AIClient,
    prompts: PromptLibrary,
    focus: Option<&str>,
    json: bool,
) -> Result<()> {
    require_feature(session, Feature::AiInsights)?;
    let data = coaching_data(&session.store, &session.options())?;

    if !json {
        println!("🤖 Asking the coach ({})...", client.model());
    }

    let mut coach = Coach::new(client).with_prompts(prompts);
    let insight = coach
        .generate_insight(&data.prompt_input(focus))
        .await
        .context("AI coaching failed")?;

    if json {
        return print_json(&insight);
    }

    let icon = match insight.sentiment {
        Sentiment::Positive => "🎉",
        Sentiment::Neutral => "💬",
        Sentiment::Warning => "⚠️ ",
    };

    println!();
    println!("{} {}", icon, insight.insight);
    if !insight.suggestions.is_empty() {
        println!();
        for suggestion in &insight.suggestions {
            println!("   • {}", suggestion);
        }
    }

    Ok(())
}

pub async fn cmd_recommend(
    session: &Session,
    client: AIClient,
    prompts: PromptLibrary,
    focus: Option<&str>,
    json: bool,
) -> Result<()> {
    require_feature(session, Feature::SavingsRecommendations)?;
    let data = coaching_data(&session.store, &session.options())?;

    if !json {
        println!("🤖 Asking the coach for savings ideas ({})...", client.model());
    }

    let mut coach = Coach::new(client).with_prompts(prompts);
    let recommendations = coach
        .recommend_savings(&data.prompt_input(focus))
        .await
        .context("AI coaching failed")?;

    if json {
        return print_json(&recommendations);
    }

    println!();
    println!("💡 Savings Recommendations");
    println!("   ─────────────────────────────────────────────────────────────");

    let mut total = 0.0;
    for (i, rec) in recommendations.iter().enumerate() {
        println!("   {}. {}", i + 1, rec.action);

        let mut details = Vec::new();
        if let Some(savings) = rec.estimated_savings {
            total += savings;
            details.push(format!("~${:.2}/month", savings));
        }
        if let Some(difficulty) = rec.difficulty {
            details.push(difficulty.to_string());
        }
        if !details.is_empty() {
            println!("      {}", details.join(" │ "));
        }
    }

    if total > 0.0 {
        println!();
        println!("   Potential savings: ${:.2}/month", total);
    }

    Ok(())
}

/// Show the configured backend and whether it answers
pub async fn cmd_ai_status(config: &Config) -> Result<()> {
    let Some(client) = AIClient::from_config(&config.ai) else {
        println!("AI: not configured");
        println!();
        println!("Set a host to enable coaching:");
        println!("  [ai] host = \"https://api.openai.com\"   (config file)");
        println!("  NESTEGG_AI_HOST=http://localhost:8080   (environment)");
        return Ok(());
    };

    println!("AI backend: {}", client.host());
    println!("Model:      {}", client.model());
    println!(
        "API key:    {}",
        if config.ai.api_key().is_some() {
            format!("set (${})", config.ai.api_key_env)
        } else {
            format!("not set (${})", config.ai.api_key_env)
        }
    );

    if client.health_check().await {
        println!("Status:     ✅ reachable");
    } else {
        println!("Status:     ❌ unreachable");
    }

    Ok(())
}
