//! Subcommand execution. Every command produces one JSON document with an
//! `ok` flag; `ok: false` maps to a failing exit status.

use pocketbroker_eip681::chain::Eip155ChainReference;
use pocketbroker_eip681::units::{UnitsError, format_eth_to_wei, format_wei_to_eth};
use pocketbroker_eip681::{
    Eip681Error, PaymentParams, QrValidation, generate_ethereum_qr, parse_ethereum_address,
    validate_ethereum_qr,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::{Command, GenerateArgs};

/// Errors in the command line itself, as opposed to a rejected payload.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid --options JSON: {0}")]
    InvalidOptions(serde_json::Error),
    #[error(transparent)]
    Units(#[from] UnitsError),
    #[error("Failed to render output: {0}")]
    Output(serde_json::Error),
}

/// Result document of one command.
#[derive(Debug, PartialEq)]
pub struct Outcome {
    pub ok: bool,
    pub document: Value,
}

impl Outcome {
    fn new<T: Serialize>(ok: bool, document: T) -> Result<Self, CliError> {
        Ok(Self {
            ok,
            document: serde_json::to_value(document).map_err(CliError::Output)?,
        })
    }
}

#[derive(Serialize)]
struct ValidateOutput {
    #[serde(flatten)]
    validation: QrValidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'static str>,
}

pub fn run(command: Command) -> Result<Outcome, CliError> {
    match command {
        Command::Validate {
            payload,
            expected_chain_id,
        } => validate(&payload, expected_chain_id.map(u64::from)),
        Command::Generate(args) => generate(args),
        Command::Address { input } => {
            let address = parse_ethereum_address(&input);
            tracing::debug!(found = address.is_some(), "address lookup");
            match address {
                Some(address) => Outcome::new(true, json!({ "ok": true, "address": address })),
                None => Outcome::new(
                    false,
                    json!({ "ok": false, "error": Eip681Error::InvalidAddress.to_string() }),
                ),
            }
        }
        Command::WeiToEth { wei, decimals } => match format_wei_to_eth(&wei, decimals) {
            Ok(eth) => Outcome::new(true, json!({ "ok": true, "eth": eth })),
            Err(e) => Outcome::new(false, json!({ "ok": false, "error": e.to_string() })),
        },
        Command::EthToWei { eth } => match format_eth_to_wei(&eth) {
            Ok(wei) => Outcome::new(true, json!({ "ok": true, "wei": wei })),
            Err(e) => Outcome::new(false, json!({ "ok": false, "error": e.to_string() })),
        },
    }
}

fn validate(payload: &str, expected_chain_id: Option<u64>) -> Result<Outcome, CliError> {
    let result = validate_ethereum_qr(payload, expected_chain_id);
    let network = result
        .as_ref()
        .ok()
        .and_then(|request| request.params.chain_id.as_deref())
        .and_then(|chain_id| chain_id.parse::<Eip155ChainReference>().ok())
        .and_then(|chain_id| chain_id.as_network_name());
    match &result {
        Ok(request) => tracing::info!(address = %request.address, network, "payload accepted"),
        Err(e) => tracing::info!(error = %e, "payload rejected"),
    }
    let validation = QrValidation::from(result);
    Outcome::new(validation.ok, ValidateOutput { validation, network })
}

fn generate(args: GenerateArgs) -> Result<Outcome, CliError> {
    let params = build_params(&args)?;
    match generate_ethereum_qr(&args.address, &params) {
        Some(uri) => Outcome::new(true, json!({ "ok": true, "uri": uri })),
        None => Outcome::new(
            false,
            json!({ "ok": false, "error": Eip681Error::InvalidAddress.to_string() }),
        ),
    }
}

/// Merges the JSON options bag with the individual flags; flags win.
fn build_params(args: &GenerateArgs) -> Result<PaymentParams, CliError> {
    let mut params = match &args.options {
        Some(json) => {
            serde_json::from_str::<PaymentParams>(json).map_err(CliError::InvalidOptions)?
        }
        None => PaymentParams::new(),
    };
    if let Some(chain_id) = args.chain_id {
        params.chain_id = Some(chain_id.to_string());
    }
    if let Some(eth) = &args.eth {
        params.value = Some(format_eth_to_wei(eth)?);
    }
    let overrides = [
        (&mut params.value, &args.value),
        (&mut params.data, &args.data),
        (&mut params.gas, &args.gas),
        (&mut params.gas_limit, &args.gas_limit),
        (&mut params.gas_price, &args.gas_price),
    ];
    for (slot, flag) in overrides {
        if let Some(flag) = flag {
            *slot = Some(flag.clone());
        }
    }
    for (key, value) in &args.params {
        params.extra.insert(key.as_str(), value.as_str());
    }
    Ok(params)
}
