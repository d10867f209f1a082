//! Tariff checkout CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Context;
use tracing::info;

use tariff::{config::CheckoutConfig, loader, logging};

/// Tariff CLI entry point
fn main() -> ExitCode {
    let config = match CheckoutConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // Let clap print help and version output the usual way.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the user, not just the log"
            )]
            {
                eprintln!("Error: {error:#}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(config: &CheckoutConfig) -> anyhow::Result<()> {
    let repository = loader::load_repository(&config.rules)
        .with_context(|| format!("loading pricing rules from {}", config.rules.display()))?
        .with_unknown_customer_policy(config.unknown_customer_policy());

    let mut checkout = repository
        .checkout(&config.customer)
        .with_context(|| format!("resolving pricing rules for '{}'", config.customer))?;

    checkout.extend(config.products.iter().cloned());

    let receipt = checkout.receipt()?;

    info!(customer = %config.customer, total = %receipt.total(), "priced checkout");

    let items = config
        .products
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = io::stdout().lock();

    writeln!(out, "Customer: {}", config.customer)?;
    writeln!(out, "Items: {items}")?;
    receipt.write_to(&mut out)?;

    Ok(())
}
