use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use wellness_advisor::validation::OTHER_GOAL;
use wellness_advisor::{Config, GenerationClient, SessionStore, WellnessService};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: wellness-advisor <age> <gender> <goal...|Others custom goal...>");
    }
    let (selected_goal, custom_goal) = if args[2] == OTHER_GOAL {
        (OTHER_GOAL.to_string(), args[3..].join(" "))
    } else {
        (args[2..].join(" "), String::new())
    };

    let config = Config::load();
    let client =
        GenerationClient::from_config(&config).context("failed to build Gemini client")?;
    let mut service = WellnessService::new(client, SessionStore::new());

    let tips = service
        .submit_selection(&args[0], &args[1], &selected_goal, &custom_goal)
        .await
        .context("Failed to generate tips. Please try again.")?
        .to_vec();

    for tip in &tips {
        println!("{} {} - {}", tip.icon, tip.title, tip.short);
    }

    let Some(first) = tips.first().cloned() else {
        tracing::warn!("Model returned no tips");
        return Ok(());
    };

    let detail = service
        .open_tip(first.clone())
        .await
        .context("Failed to load tip details. Please try again.")?;

    println!("\n{} {}\n\n{}\n", first.icon, first.title, detail.explanation);
    for (i, step) in detail.steps.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }

    Ok(())
}
