//! paygate CLI entry point.

mod cli;

use clap::Parser;
use cli::Cli;
use color_eyre::eyre::eyre;
use paygate::evidence::{EvidenceForm, Screenshot};
use paygate::verify::VerificationRequest;
use paygate::{Gateway, GatewayBuilder, Network};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("paygate v{}", env!("CARGO_PKG_VERSION"));

    // Build configuration and gateway
    let config = cli.into_config()?;
    let mut gateway = GatewayBuilder::new(config).build()?;

    // Print gateway events as they happen
    if let Some(mut events) = gateway.events() {
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                info!(?event, "gateway event");
            }
        });
    }
    let ticker = gateway.spawn_cooldown_ticker();

    let network: Network = cli.network.into();
    let selected = gateway
        .select_network(network)
        .await?
        .ok_or_else(|| eyre!("address selection superseded"))?;
    println!("Receiving address ({network}): {}", selected.address);

    if let Some(ref screenshot_path) = cli.evidence_screenshot {
        let hash = cli
            .tx_hash
            .clone()
            .ok_or_else(|| eyre!("--tx-hash is required for an evidence upload"))?;
        let bytes = tokio::fs::read(screenshot_path).await?;
        let form = EvidenceForm {
            transaction_reference: hash,
            network,
            screenshot: Screenshot {
                file_name: screenshot_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "screenshot".to_string()),
                content_type: content_type_for(screenshot_path),
                bytes: bytes.into(),
            },
        };
        let outcome = gateway.submit_evidence(form).await;
        println!("Evidence outcome: {outcome:?}");
    } else if let (Some(amount), Some(platform), Some(payer), Some(hash)) = (
        cli.amount.clone(),
        cli.platform_account.clone(),
        cli.payer_account.clone(),
        cli.tx_hash.clone(),
    ) {
        let request = VerificationRequest {
            amount,
            platform_account: platform,
            payer_account: payer,
            transaction_reference: hash,
            network,
        };
        report(&gateway, gateway.submit_verification(&request).await?);
    } else {
        info!("No verification fields supplied; address selection only");
    }

    gateway.shutdown();
    let _ = ticker.await;
    Ok(())
}

fn report(gateway: &Gateway, outcome: paygate::SubmitOutcome) {
    use paygate::SubmitOutcome;
    match outcome {
        SubmitOutcome::Succeeded => println!("Verification accepted"),
        SubmitOutcome::Invalid(errors) => {
            for error in errors {
                warn!("Invalid field: {error}");
            }
        }
        SubmitOutcome::CoolingDown { remaining } => {
            println!(
                "Please wait {}s before the next attempt",
                remaining.as_millis().div_ceil(1000)
            );
        }
        SubmitOutcome::Failed(reason) => {
            println!("Verification failed ({reason}); state {:?}", gateway.verification_state());
        }
        SubmitOutcome::Ignored => println!("A verification attempt is already in flight"),
    }
}

fn content_type_for(path: &std::path::Path) -> String {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png".to_string(),
        Some("jpg" | "jpeg") => "image/jpeg".to_string(),
        Some("gif") => "image/gif".to_string(),
        Some("webp") => "image/webp".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}
