//! # CLI Interface
//!
//! `clap` derive definition for `symbol-announcer`. Global flags select the
//! node, network, fee policy and signing key; each subcommand builds and
//! announces one kind of transaction.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use symbol_protocol::config::{DEFAULT_EXPIRATION_HOURS, DEFAULT_MAX_FEE};

/// Builds, signs and announces Symbol transactions.
#[derive(Parser, Debug)]
#[command(
    name = "symbol-announcer",
    about = "Build, sign and announce Symbol transactions",
    version,
    propagate_version = true
)]
pub struct AnnouncerCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL of the node's REST interface.
    #[arg(
        long,
        global = true,
        env = "SYMBOL_NODE_URL",
        default_value = "http://localhost:3000"
    )]
    pub node_url: String,

    /// Network name: mainnet or testnet.
    #[arg(long, global = true, env = "SYMBOL_NETWORK", default_value = "testnet")]
    pub network: String,

    /// Fee ceiling in atomic units.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FEE)]
    pub max_fee: u64,

    /// Hours until the transaction expires.
    #[arg(long, global = true, default_value_t = DEFAULT_EXPIRATION_HOURS)]
    pub expiration_hours: u32,

    /// Directory holding encrypted key files.
    #[arg(long, global = true, env = "SYMBOL_KEY_DIR", default_value = ".symbol-keys")]
    pub key_dir: PathBuf,

    /// Key file name inside `--key-dir`, without extension.
    #[arg(long, global = true, default_value = "signer")]
    pub key_name: String,

    /// Password for the key file.
    #[arg(long, global = true, env = "SYMBOL_KEY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log output format: pretty or json.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the node's epoch adjustment, currency mosaic id and generation
    /// hash seed.
    Properties,
    /// Encrypt a hex private key into the key directory.
    ImportKey(ImportKeyArgs),
    /// Print the address of the stored signer.
    Address,
    /// Announce a transfer.
    Transfer(TransferArgs),
    /// Announce one aggregate carrying a transfer per message.
    AggregateTransfer(AggregateTransferArgs),
    /// Announce a new mosaic definition.
    MosaicDefinition(MosaicDefinitionArgs),
    /// Announce a supply increase for a mosaic.
    MosaicSupplyChange(MosaicSupplyChangeArgs),
    /// Announce a metadata entry on a mosaic (wrapped in an aggregate).
    MosaicMetadata(MosaicMetadataArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct ImportKeyArgs {
    /// Hex-encoded 32-byte private key. Read from the environment so it
    /// stays out of shell history.
    #[arg(long, env = "SYMBOL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Replace an existing key file of the same name.
    #[arg(long)]
    pub force: bool,
}

/// Recipient and mosaic list shared by both transfer subcommands.
#[derive(Args, Debug)]
pub struct TransferTarget {
    /// Recipient address (39 characters, with or without dashes).
    #[arg(long)]
    pub recipient: String,

    /// Mosaic id in hex. Defaults to the network currency.
    #[arg(long)]
    pub mosaic_id: Option<String>,

    /// Amount in atomic units.
    #[arg(long, default_value_t = 0)]
    pub amount: u64,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub target: TransferTarget,

    /// Plain-text message.
    #[arg(long, default_value = "")]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct AggregateTransferArgs {
    #[command(flatten)]
    pub target: TransferTarget,

    /// One inner transfer per occurrence, in order.
    #[arg(long = "message", required = true)]
    pub messages: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MosaicDefinitionArgs {
    #[arg(long)]
    pub transferable: bool,

    #[arg(long)]
    pub supply_mutable: bool,

    #[arg(long)]
    pub restrictable: bool,

    #[arg(long)]
    pub revokable: bool,

    /// Decimal places, 0 to 6.
    #[arg(long, default_value_t = 0)]
    pub divisibility: u8,

    /// Lifetime in blocks; 0 means it never expires.
    #[arg(long, default_value_t = 0)]
    pub duration: u64,

    /// Explicit nonce instead of one derived from the clock.
    #[arg(long)]
    pub nonce: Option<u32>,
}

#[derive(Args, Debug)]
pub struct MosaicSupplyChangeArgs {
    /// Mosaic id in hex.
    #[arg(long)]
    pub mosaic_id: String,

    /// Units to add.
    #[arg(long)]
    pub delta: i64,
}

#[derive(Args, Debug)]
pub struct MosaicMetadataArgs {
    /// Mosaic id in hex.
    #[arg(long)]
    pub mosaic_id: String,

    /// Human-readable key, hashed to a 64-bit scoped key.
    #[arg(long)]
    pub key: String,

    #[arg(long)]
    pub value: String,

    /// Account the entry is attached to. Defaults to the signer.
    #[arg(long)]
    pub target_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        AnnouncerCli::command().debug_assert();
    }

    #[test]
    fn parses_transfer_with_defaults() {
        let cli = AnnouncerCli::try_parse_from([
            "symbol-announcer",
            "--password",
            "secret",
            "transfer",
            "--recipient",
            "TA3HQR6NPMXK7W6EP3AO6X5S4OSHVBU3ZEWBTNQ",
            "--amount",
            "18000000",
            "--message",
            "hello symbol",
        ])
        .unwrap();

        assert_eq!(cli.global.max_fee, DEFAULT_MAX_FEE);
        assert_eq!(cli.global.expiration_hours, DEFAULT_EXPIRATION_HOURS);
        match cli.command {
            Commands::Transfer(args) => {
                assert_eq!(args.target.amount, 18_000_000);
                assert_eq!(args.message, "hello symbol");
                assert!(args.target.mosaic_id.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn aggregate_keeps_message_order() {
        let cli = AnnouncerCli::try_parse_from([
            "symbol-announcer",
            "aggregate-transfer",
            "--recipient",
            "TA3HQR6NPMXK7W6EP3AO6X5S4OSHVBU3ZEWBTNQ",
            "--message",
            "first",
            "--message",
            "second",
        ])
        .unwrap();

        let Commands::AggregateTransfer(args) = cli.command else {
            panic!("expected aggregate-transfer");
        };
        assert_eq!(args.messages, vec!["first", "second"]);
    }
}
