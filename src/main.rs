//! Famin Store - Binary Entry Point
//!
//! Opens the data directory, loads every table and prints a summary.
//! The interactive menus drive the same [`famin_store::Store`] API.
//!
//! Usage: `famin-store [config.toml]`

use std::path::PathBuf;
use std::process::ExitCode;

use famin_store::{Store, StoreConfig, StoreError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match StoreConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match Store::open(config) {
        Ok(store) => store,
        Err(e @ StoreError::DataDirUnwritable { .. }) => {
            error!(error = %e, "Fatal error: cannot initialize directories. Exiting...");
            return ExitCode::from(1);
        }
        Err(e) => {
            error!(error = %e, "Failed to open store");
            return ExitCode::FAILURE;
        }
    };

    println!("===========================================");
    println!("  FAMIN E-Commerce Store");
    println!("===========================================");
    println!();

    println!("Products ({}):", store.products().len());
    for product in store.list_products() {
        println!("  {}", product);
    }
    println!();

    println!("Customers: {}", store.customers().len());
    println!("Orders:    {}", store.orders().len());
    if let Some(top) = store.orders().peek_max() {
        println!("Largest:   {} (${})", top.order_id, top.total_price.normalize());
    }

    let tally = store.shipment_tally();
    println!("Shipments: {} delivered, {} in progress", tally.delivered, tally.in_progress);

    info!(
        next_order = store.id_counters().next_order(),
        next_tracking = store.id_counters().next_tracking(),
        "Ready"
    );

    ExitCode::SUCCESS
}
