use anyhow::{Result, bail};
use harvest::{
    ContentAcquirer, ContentSource,
    config::Config,
    generation::{
        CANDIDATE_DELIMITER, DEFAULT_CANDIDATE_COUNT, GeminiEngine, generate_candidates,
    },
};
use tracing::{info, warn};

const USAGE: &str = "usage: harvest <text|website|video> <value> [instruction]";

fn parse_source(kind: &str, value: String) -> Result<ContentSource> {
    Ok(match kind {
        "text" => ContentSource::Text(value),
        "website" => ContentSource::Website(value),
        "video" => ContentSource::Video(value),
        other => bail!("unknown source kind {other:?}\n{USAGE}"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; HARVEST_LOG_FORMAT=json for machine-readable logs
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if std::env::var("HARVEST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let mut args = std::env::args().skip(1);
    let (Some(kind), Some(value)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let instruction = args.next();
    let source = parse_source(&kind, value)?;

    let config = Config::from_env()?;
    let acquirer = ContentAcquirer::from_config(&config);

    let content = match acquirer.acquire(&source).await {
        Ok(content) => content,
        Err(err) if err.needs_manual_input() => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };
    info!(kind = source.kind(), chars = content.chars().count(), "acquired content");

    let Some(instruction) = instruction else {
        println!("{content}");
        return Ok(());
    };

    if config.gemini_api_key().is_none() {
        warn!("GEMINI_API_KEY not set; printing acquired content only");
        println!("{content}");
        return Ok(());
    }

    let engine = GeminiEngine::from_config(&config)?;
    let prompt = format!(
        "{instruction}\n\nSeparate each option with {CANDIDATE_DELIMITER}.\n\nSource material:\n{content}"
    );
    let candidates = generate_candidates(
        &engine,
        &prompt,
        None,
        config.retry_policy(),
        DEFAULT_CANDIDATE_COUNT,
    )
    .await?;

    for (index, candidate) in candidates.iter().enumerate() {
        println!("--- option {} ---\n{candidate}", index + 1);
    }

    Ok(())
}
