//! Curated extension catalogue shipped with Stratum.
//!
//! The list is the source of truth; [`manifest_json`] regenerates the JSON
//! manifest other tooling consumes.

use stratum_core::domain::{ExtensionCatalog, ExtensionDescriptor};

const CREATE_ETH_EXTENSIONS: &str = "https://github.com/scaffold-eth/create-eth-extensions";
const CHALLENGES: &str = "https://github.com/scaffold-eth/se-2-challenges";

/// `(flag value, description)` of extensions kept on a branch of the
/// extensions monorepo. The branch is the flag value.
const MONOREPO_EXTENSIONS: &[(&str, &str)] = &[
    ("subgraph", "Build, test and deploy subgraphs locally, with front-end integration and deployment to Subgraph Studio."),
    ("eip-712", "EIP-712 typed message signing, sending and verification."),
    ("ponder", "A pre-configured ponder.sh setup for event indexing."),
    ("erc-20", "ERC-20 token contracts with balance checks and transfers."),
    ("eip-5792", "EIP-5792 wallet capabilities: batched calls and status checks."),
    ("randao", "On-chain randomness from RANDAO."),
    ("erc-721", "ERC-721 NFT contracts with supply, balance, listing and transfer."),
    ("porto", "The porto.sh SDK."),
    ("envio", "Envio Indexer for deployed contracts."),
    ("drizzle-neon", "A local database with Drizzle ORM, tuned for Neon."),
];

/// `(flag value, description)` of SpeedRunEthereum challenges.
const CHALLENGE_EXTENSIONS: &[(&str, &str)] = &[
    ("challenge-tokenization", "SpeedRunEthereum Challenge: Tokenization."),
    ("challenge-decentralized-staking", "SpeedRunEthereum Challenge: Decentralized Staking App."),
    ("challenge-token-vendor", "SpeedRunEthereum Challenge: Token Vendor."),
    ("challenge-dice-game", "SpeedRunEthereum Challenge: Dice Game."),
    ("challenge-dex", "SpeedRunEthereum Challenge: Build a DEX."),
    ("challenge-state-channels", "SpeedRunEthereum Challenge: A State Channel Application."),
    ("challenge-multisig", "SpeedRunEthereum Challenge: Multisig Wallet."),
    ("challenge-svg-nft", "SpeedRunEthereum Challenge: SVG NFT."),
    ("challenge-over-collateralized-lending", "SpeedRunEthereum Challenge: Over-collateralized Lending."),
    ("challenge-prediction-markets", "SpeedRunEthereum Challenge: Prediction Markets."),
    ("challenge-stablecoins", "SpeedRunEthereum Challenge: Stablecoins."),
];

fn branch_entry(repository: &str, flag: &str, description: &str) -> ExtensionDescriptor {
    ExtensionDescriptor {
        extension_flag_value: flag.to_string(),
        repository: repository.to_string(),
        branch: Some(flag.to_string()),
        description: description.to_string(),
        name: None,
    }
}

/// Every curated extension, monorepo entries first.
pub fn curated_extensions() -> Vec<ExtensionDescriptor> {
    let mut entries: Vec<ExtensionDescriptor> = MONOREPO_EXTENSIONS
        .iter()
        .map(|(flag, description)| branch_entry(CREATE_ETH_EXTENSIONS, flag, description))
        .collect();
    entries.extend(
        CHALLENGE_EXTENSIONS
            .iter()
            .map(|(flag, description)| branch_entry(CHALLENGES, flag, description)),
    );
    entries.push(ExtensionDescriptor {
        extension_flag_value: "gator".into(),
        repository: "https://github.com/MetaMask/gator-extension".into(),
        branch: None,
        description: "MetaMask Delegation Toolkit: embedded smart accounts and ERC-7710 delegations."
            .into(),
        name: Some("Delegation Toolkit Extension".into()),
    });
    entries
}

pub fn curated_catalog() -> ExtensionCatalog {
    ExtensionCatalog::new(curated_extensions())
}

/// The catalogue as a pretty-printed JSON array.
pub fn manifest_json(catalog: &ExtensionCatalog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(catalog.entries())
}
