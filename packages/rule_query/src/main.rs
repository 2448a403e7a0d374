use clap::Parser;
use rule_query::application::cli::Cli;
use rule_query::application::runner::{load_cases, load_rules_text, run_cases, settle_run};
use rule_query::application::transcript::{OutputMode, Transcript};
use rule_query::domain::services::{OpenAiClient, RuleQuerySession, SwiplEngine};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rule_query=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Every step awaits the previous one; a single thread is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> anyhow::Result<()> {
    let transcript = Transcript::new(if cli.json {
        OutputMode::JsonLines
    } else {
        OutputMode::Transcript
    });

    let rules_text = load_rules_text(cli.rules_file.as_deref()).await?;
    let cases = load_cases(cli.cases_file.as_deref()).await?;

    let llm = OpenAiClient::new(cli.llm_config())?;
    let engine = SwiplEngine::new(cli.engine_config());
    if !engine.is_available().await {
        anyhow::bail!(
            "SWI-Prolog executable '{}' is not available; install it or pass --swipl",
            cli.swipl.display()
        );
    }

    let mut session = RuleQuerySession::new(llm, engine, cli.session_config())?;

    let outcome = tokio::select! {
        result = run_cases(&mut session, &rules_text, &cases, &transcript) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    let cleanup = session.clean_up().await;
    match settle_run(outcome, cleanup)? {
        Some(reports) => tracing::info!(cases = reports.len(), "run complete"),
        None => tracing::warn!("interrupted; scratch file removed"),
    }
    Ok(())
}
