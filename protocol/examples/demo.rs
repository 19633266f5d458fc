//! Offline walkthrough of the transaction lifecycle.
//!
//! Builds every supported transaction kind for a throwaway testnet account,
//! signs it and prints the hash, size and explorer link. Nothing is sent;
//! use the `symbol-announcer` binary to talk to a node.
//!
//! Run with:
//!   cargo run --example demo

use std::error::Error;

use symbol_protocol::config::{Network, NetworkProfile};
use symbol_protocol::crypto::KeyPair;
use symbol_protocol::identity::Address;
use symbol_protocol::transaction::{
    sign_transaction, verify_signed_transaction, Mosaic, MosaicFlags, Transaction,
    TransactionBody, TransactionBuilder,
};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

/// Published testnet values; a live run should query them from the node.
const EPOCH_ADJUSTMENT: u32 = 1_637_848_847;
const CURRENCY_MOSAIC_ID: u64 = 0x72C0212E67A08BCE;

fn section(title: &str) {
    println!();
    println!("{BOLD}{CYAN}== {title} {RESET}");
}

fn report(
    builder: &TransactionBuilder,
    profile: &NetworkProfile,
    signer: &KeyPair,
    tx: &Transaction,
) -> Result<(), Box<dyn Error>> {
    let signed = sign_transaction(profile, tx, signer)?;
    let inner = tx.inner_transactions().map_or(0, |inner| inner.len());

    println!("  type        {}", signed.transaction_type());
    println!("  size        {} bytes", signed.payload().len());
    if inner > 0 {
        println!("  inner       {}", inner);
    }
    println!("  hash        {GREEN}{}{RESET}", signed.hash());
    println!("  verified    {}", verify_signed_transaction(profile, &signed));
    if let Some(url) = builder.explorer_url(signed.hash()) {
        println!("  {DIM}{url}{RESET}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let builder = TransactionBuilder::new(
        "testnet",
        "http://localhost:3000",
        EPOCH_ADJUSTMENT,
        2_000_000,
        2,
    )?;
    let profile = NetworkProfile::new(Network::Testnet);

    let alice = KeyPair::generate();
    let bob = KeyPair::generate();
    let alice_address = Address::from_public_key(Network::Testnet, &alice.public_key());
    let bob_address = Address::from_public_key(Network::Testnet, &bob.public_key());

    section("Accounts");
    println!("  alice       {alice_address}");
    println!("  bob         {bob_address}");
    println!("  deadline    {}", builder.deadline());

    section("Transfer");
    let transfer = builder.create_transfer(
        &alice.public_key(),
        &bob_address,
        &[Mosaic::new(CURRENCY_MOSAIC_ID, 18_000_000)],
        "hello symbol",
    );
    report(&builder, &profile, &alice, &transfer)?;

    section("Aggregate transfer");
    let aggregate = builder.create_aggregate_transfer(
        &alice.public_key(),
        &bob_address,
        &[Mosaic::new(CURRENCY_MOSAIC_ID, 1)],
        &["first", "second", "third"],
    )?;
    report(&builder, &profile, &alice, &aggregate)?;

    section("Mosaic definition");
    let definition = builder.create_mosaic_definition(
        &alice.public_key(),
        MosaicFlags::from_options(true, true, false, false),
        2,
        0,
    );
    let mosaic_id = match &definition.body {
        TransactionBody::MosaicDefinition(body) => body.id,
        _ => unreachable!("create_mosaic_definition returns a mosaic definition"),
    };
    println!("  mosaic id   {mosaic_id}");
    report(&builder, &profile, &alice, &definition)?;

    section("Mosaic supply change");
    let supply = builder.create_mosaic_supply_change(&alice.public_key(), mosaic_id, 1_000_000);
    report(&builder, &profile, &alice, &supply)?;

    section("Mosaic metadata");
    let metadata = builder.create_mosaic_metadata(
        &alice.public_key(),
        &alice_address,
        mosaic_id,
        "name",
        "demo token",
    )?;
    report(&builder, &profile, &alice, &metadata)?;

    println!();
    Ok(())
}
