//! Command-line configuration for the payment QR toolkit.
//!
//! Every option that makes sense as a deployment default can also come from the
//! environment (or a `.env` file loaded at startup):
//!
//! - `EIP681_EXPECTED_CHAIN_ID` - chain id or network name `validate` enforces
//! - `EIP681_DISPLAY_DECIMALS` - fractional digits printed by `wei-to-eth`
//! - `POCKETBROKER_PRETTY` - pretty-print JSON output

use clap::{Args, Parser, Subcommand};
use pocketbroker_eip681::chain::{Eip155ChainReference, chain_id_by_network_name};
use pocketbroker_eip681::units::{DEFAULT_ETH_DISPLAY_DECIMALS, MAX_ETH_DISPLAY_DECIMALS};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "pocketbroker-qr", version)]
#[command(about = "Validate, generate and convert EIP-681 Ethereum payment requests")]
pub struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true, env = "POCKETBROKER_PRETTY")]
    pub pretty: bool,
    /// Debug logging on stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate an `ethereum:` payment URI
    Validate {
        /// The scanned or pasted payload
        payload: String,
        /// Reject payloads naming a different chain (id or network name)
        #[arg(long, env = "EIP681_EXPECTED_CHAIN_ID", value_parser = parse_chain_selector)]
        expected_chain_id: Option<Eip155ChainReference>,
    },
    /// Build an `ethereum:` payment URI
    Generate(GenerateArgs),
    /// Extract a bare address from an address or URI
    Address {
        input: String,
    },
    /// Format a wei amount as ether
    WeiToEth {
        #[arg(allow_hyphen_values = true)]
        wei: String,
        /// Fractional digits to print
        #[arg(
            long,
            env = "EIP681_DISPLAY_DECIMALS",
            default_value_t = DEFAULT_ETH_DISPLAY_DECIMALS,
            value_parser = clap::value_parser!(u32).range(0..=MAX_ETH_DISPLAY_DECIMALS as i64)
        )]
        decimals: u32,
    },
    /// Convert an ether amount to wei
    EthToWei {
        #[arg(allow_hyphen_values = true)]
        eth: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Recipient address
    pub address: String,
    /// JSON options bag, e.g. '{"value":"1000","chainId":8453}'. Flags override it.
    #[arg(long)]
    pub options: Option<String>,
    /// Chain id, or a known network name such as `base`
    #[arg(long, value_parser = parse_chain_selector)]
    pub chain_id: Option<Eip155ChainReference>,
    /// Amount in wei
    #[arg(long, conflicts_with = "eth")]
    pub value: Option<String>,
    /// Amount in ether, converted to wei
    #[arg(long)]
    pub eth: Option<String>,
    /// Hex call data (0x...)
    #[arg(long)]
    pub data: Option<String>,
    #[arg(long)]
    pub gas: Option<String>,
    #[arg(long)]
    pub gas_limit: Option<String>,
    #[arg(long)]
    pub gas_price: Option<String>,
    /// Extra `key=value` query parameter; repeatable
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

/// Accepts a decimal chain id or a known network name.
fn parse_chain_selector(input: &str) -> Result<Eip155ChainReference, String> {
    input
        .parse::<Eip155ChainReference>()
        .ok()
        .or_else(|| chain_id_by_network_name(input))
        .ok_or_else(|| format!("unknown chain {input:?}: expected a chain id or network name"))
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {input:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_with_network_name() {
        let cli = Cli::try_parse_from([
            "pocketbroker-qr",
            "validate",
            "ethereum:0x0",
            "--expected-chain-id",
            "base",
        ])
        .unwrap();
        match cli.command {
            Command::Validate {
                payload,
                expected_chain_id,
            } => {
                assert_eq!(payload, "ethereum:0x0");
                assert_eq!(expected_chain_id, Some(Eip155ChainReference::new(8453)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "pocketbroker-qr",
            "--pretty",
            "generate",
            "0xabc",
            "--chain-id",
            "137",
            "--value",
            "1000",
            "--param",
            "label=tip=1",
            "--param",
            "memo=",
        ])
        .unwrap();
        assert!(cli.pretty);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.address, "0xabc");
        assert_eq!(args.chain_id, Some(Eip155ChainReference::new(137)));
        assert_eq!(args.value.as_deref(), Some("1000"));
        assert_eq!(
            args.params,
            vec![
                ("label".to_string(), "tip=1".to_string()),
                ("memo".to_string(), String::new())
            ]
        );
    }

    #[test]
    fn test_value_conflicts_with_eth() {
        let result = Cli::try_parse_from([
            "pocketbroker-qr",
            "generate",
            "0xabc",
            "--value",
            "1",
            "--eth",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_network_rejected() {
        let result = Cli::try_parse_from([
            "pocketbroker-qr",
            "generate",
            "0xabc",
            "--chain-id",
            "narnia",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_param_rejected() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_wei_to_eth_accepts_negative_amount() {
        let cli = Cli::try_parse_from(["pocketbroker-qr", "wei-to-eth", "-5", "--decimals", "2"])
            .unwrap();
        match cli.command {
            Command::WeiToEth { wei, decimals } => {
                assert_eq!(wei, "-5");
                assert_eq!(decimals, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_decimals_out_of_range_rejected() {
        for decimals in ["78", "4294967295"] {
            let result =
                Cli::try_parse_from(["pocketbroker-qr", "wei-to-eth", "1", "--decimals", decimals]);
            assert!(result.is_err(), "{decimals}");
        }
        assert!(
            Cli::try_parse_from(["pocketbroker-qr", "wei-to-eth", "1", "--decimals", "77"]).is_ok()
        );
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
