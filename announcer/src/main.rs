// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Symbol Announcer
//!
//! Entry point for the `symbol-announcer` binary. Parses CLI arguments,
//! initializes logging, then runs one subcommand:
//!
//! - `properties`           print the node's network parameters
//! - `import-key`           encrypt a private key into the key directory
//! - `address`              print the stored signer's address
//! - `transfer`, `aggregate-transfer`, `mosaic-definition`,
//!   `mosaic-supply-change`, `mosaic-metadata`
//!                          build, sign and announce one transaction
//! - `version`              print build version information
//!
//! Announcing subcommands print the transaction hash, the node's status code
//! and an explorer link on stdout. Errors propagate to `main`.

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use symbol_protocol::config::{Network, NetworkProfile};
use symbol_protocol::crypto::KeyPair;
use symbol_protocol::identity::{Address, KeyStore};
use symbol_protocol::network::{
    HttpTransport, NetworkProperties, NetworkPropertiesClient, NodeTransport,
    TransactionSubmitter,
};
use symbol_protocol::transaction::{
    sign_transaction, Mosaic, MosaicFlags, MosaicId, MosaicNonce, Transaction, TransactionBuilder,
};

use cli::{AnnouncerCli, Commands, GlobalArgs, TransferTarget};
use logging::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = AnnouncerCli::parse();
    logging::init_logging(
        logging::DEFAULT_DIRECTIVE,
        LogFormat::from_str_lossy(&cli.global.log_format),
    );

    let global = cli.global;
    match cli.command {
        Commands::Properties => print_properties(&global).await,
        Commands::ImportKey(args) => import_key(&global, &args),
        Commands::Address => print_address(&global),
        Commands::Version => {
            print_version();
            Ok(())
        }
        command => announce(&global, command).await,
    }
}

// ---------------------------------------------------------------------------
// Key handling
// ---------------------------------------------------------------------------

fn key_store(global: &GlobalArgs) -> Result<KeyStore> {
    let password = global
        .password
        .clone()
        .context("a key password is required (--password or SYMBOL_KEY_PASSWORD)")?;
    Ok(KeyStore::new(&global.key_dir, password))
}

fn load_signer(global: &GlobalArgs) -> Result<KeyPair> {
    key_store(global)?
        .load(&global.key_name)
        .with_context(|| {
            format!(
                "failed to load key {:?} from {}",
                global.key_name,
                global.key_dir.display()
            )
        })
}

fn parse_network(global: &GlobalArgs) -> Result<Network> {
    global
        .network
        .parse()
        .with_context(|| format!("invalid --network {:?}", global.network))
}

fn import_key(global: &GlobalArgs, args: &cli::ImportKeyArgs) -> Result<()> {
    let network = parse_network(global)?;
    let store = key_store(global)?;
    if store.contains(&global.key_name) && !args.force {
        bail!(
            "key {:?} already exists in {} (use --force to replace it)",
            global.key_name,
            global.key_dir.display()
        );
    }

    let key_pair = KeyPair::from_private_key_hex(args.private_key.trim())
        .context("invalid private key")?;
    let path = store
        .save(&global.key_name, &key_pair)
        .context("failed to store key")?;

    tracing::info!(path = %path.display(), "key stored");
    println!("address: {}", Address::from_public_key(network, &key_pair.public_key()));
    Ok(())
}

fn print_address(global: &GlobalArgs) -> Result<()> {
    let network = parse_network(global)?;
    let key_pair = load_signer(global)?;
    println!("address:    {}", Address::from_public_key(network, &key_pair.public_key()));
    println!("public key: {}", key_pair.public_key());
    Ok(())
}

// ---------------------------------------------------------------------------
// Node queries
// ---------------------------------------------------------------------------

fn transport(global: &GlobalArgs) -> Result<Arc<dyn NodeTransport>> {
    let transport = HttpTransport::new(global.node_url.as_str())
        .with_context(|| format!("invalid --node-url {:?}", global.node_url))?;
    Ok(Arc::new(transport))
}

async fn fetch_properties(transport: Arc<dyn NodeTransport>) -> Result<NetworkProperties> {
    NetworkPropertiesClient::new(transport)
        .fetch()
        .await
        .context("failed to query network properties")
}

async fn print_properties(global: &GlobalArgs) -> Result<()> {
    let properties = fetch_properties(transport(global)?).await?;
    let report = serde_json::json!({
        "epochAdjustment": properties.epoch_adjustment,
        "currencyMosaicId": properties.currency_mosaic_id.to_string(),
        "generationHashSeed": properties.generation_hash_seed.map(|seed| seed.to_hex()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Announcing
// ---------------------------------------------------------------------------

async fn announce(global: &GlobalArgs, command: Commands) -> Result<()> {
    // Network name is checked before any I/O.
    parse_network(global)?;
    let signer = load_signer(global)?;

    let transport = transport(global)?;
    let properties = fetch_properties(transport.clone()).await?;
    tracing::info!(
        epoch_adjustment = properties.epoch_adjustment,
        currency_mosaic_id = %properties.currency_mosaic_id,
        "network properties"
    );

    let builder = TransactionBuilder::new(
        &global.network,
        global.node_url.as_str(),
        properties.epoch_adjustment,
        global.max_fee,
        global.expiration_hours,
    )?;
    let tx = build(&builder, &signer, &properties, command)?;

    let mut profile = NetworkProfile::new(builder.network());
    if let Some(seed) = properties.generation_hash_seed {
        profile = profile.with_generation_hash_seed(seed);
    }
    let signed = sign_transaction(&profile, &tx, &signer).context("cannot encode transaction")?;
    let response = TransactionSubmitter::new(transport, profile)
        .announce(&signed)
        .await
        .context("announce failed")?;

    let hash = signed.hash();
    println!("transaction hash: {}", hash);
    println!("status code: {}", response.status);
    if let Some(url) = builder.explorer_url(hash) {
        println!("explorer: {}", url);
    }
    Ok(())
}

fn build(
    builder: &TransactionBuilder,
    signer: &KeyPair,
    properties: &NetworkProperties,
    command: Commands,
) -> Result<Transaction> {
    let public_key = signer.public_key();
    let tx = match command {
        Commands::Transfer(args) => {
            let (recipient, mosaics) = transfer_target(&args.target, properties)?;
            builder.create_transfer(&public_key, &recipient, &mosaics, &args.message)
        }
        Commands::AggregateTransfer(args) => {
            let (recipient, mosaics) = transfer_target(&args.target, properties)?;
            builder.create_aggregate_transfer(
                &public_key,
                &recipient,
                &mosaics,
                args.messages.as_slice(),
            )?
        }
        Commands::MosaicDefinition(args) => {
            let flags = MosaicFlags::from_options(
                args.transferable,
                args.supply_mutable,
                args.restrictable,
                args.revokable,
            );
            match args.nonce {
                Some(nonce) => builder.create_mosaic_definition_with_nonce(
                    &public_key,
                    MosaicNonce(nonce),
                    flags,
                    args.divisibility,
                    args.duration,
                ),
                None => builder.create_mosaic_definition(
                    &public_key,
                    flags,
                    args.divisibility,
                    args.duration,
                ),
            }
        }
        Commands::MosaicSupplyChange(args) => {
            let mosaic_id = parse_mosaic_id(&args.mosaic_id)?;
            builder.create_mosaic_supply_change(&public_key, mosaic_id, args.delta)
        }
        Commands::MosaicMetadata(args) => {
            let mosaic_id = parse_mosaic_id(&args.mosaic_id)?;
            let target = match &args.target_address {
                Some(raw) => parse_address(raw)?,
                None => Address::from_public_key(builder.network(), &public_key),
            };
            builder.create_mosaic_metadata(
                &public_key,
                &target,
                mosaic_id,
                &args.key,
                &args.value,
            )?
        }
        other => bail!("{:?} does not announce a transaction", other),
    };
    Ok(tx)
}

fn transfer_target(
    target: &TransferTarget,
    properties: &NetworkProperties,
) -> Result<(Address, Vec<Mosaic>)> {
    let recipient = parse_address(&target.recipient)?;
    let mosaic_id = match &target.mosaic_id {
        Some(raw) => parse_mosaic_id(raw)?,
        None => properties.currency_mosaic_id,
    };
    Ok((recipient, vec![Mosaic::new(mosaic_id, target.amount)]))
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.parse()
        .with_context(|| format!("invalid address {:?}", raw))
}

fn parse_mosaic_id(raw: &str) -> Result<MosaicId> {
    raw.parse()
        .with_context(|| format!("invalid mosaic id {:?}", raw))
}

fn print_version() {
    println!("symbol-announcer {}", env!("CARGO_PKG_VERSION"));
    println!("rustc            {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
