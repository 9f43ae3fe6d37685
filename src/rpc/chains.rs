use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    Evm,
    Solana,
}

/// One routable backend behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainDescriptor {
    pub id: &'static str,
    pub chain_id: &'static str,
    pub display_name: &'static str,
    pub rpc_method_prefix: &'static str,
    pub family: ChainFamily,
    pub symbol: &'static str,
}

pub const SUPPORTED_CHAINS: [ChainDescriptor; 7] = [
    ChainDescriptor {
        id: "ethereum",
        chain_id: "1",
        display_name: "Ethereum Mainnet",
        rpc_method_prefix: "eth",
        family: ChainFamily::Evm,
        symbol: "ETH",
    },
    ChainDescriptor {
        id: "polygon",
        chain_id: "137",
        display_name: "Polygon",
        rpc_method_prefix: "polygon",
        family: ChainFamily::Evm,
        symbol: "MATIC",
    },
    ChainDescriptor {
        id: "bsc",
        chain_id: "56",
        display_name: "BSC",
        rpc_method_prefix: "bsc",
        family: ChainFamily::Evm,
        symbol: "BNB",
    },
    ChainDescriptor {
        id: "arbitrum",
        chain_id: "42161",
        display_name: "Arbitrum",
        rpc_method_prefix: "arbitrum",
        family: ChainFamily::Evm,
        symbol: "ETH",
    },
    ChainDescriptor {
        id: "optimism",
        chain_id: "10",
        display_name: "Optimism",
        rpc_method_prefix: "optimism",
        family: ChainFamily::Evm,
        symbol: "ETH",
    },
    ChainDescriptor {
        id: "base",
        chain_id: "8453",
        display_name: "Base",
        rpc_method_prefix: "base",
        family: ChainFamily::Evm,
        symbol: "ETH",
    },
    ChainDescriptor {
        id: "solana",
        chain_id: "solana",
        display_name: "Solana",
        rpc_method_prefix: "solana",
        family: ChainFamily::Solana,
        symbol: "SOL",
    },
];

/// Case-insensitive lookup against the fixed table. Surrounding whitespace
/// is not stripped, so a padded id is unknown.
pub fn lookup_chain(id: &str) -> Option<&'static ChainDescriptor> {
    let id = id.to_ascii_lowercase();
    SUPPORTED_CHAINS.iter().find(|chain| chain.id == id)
}

pub fn is_chain_supported(id: &str) -> bool {
    lookup_chain(id).is_some()
}

pub fn supported_chains() -> &'static [ChainDescriptor] {
    &SUPPORTED_CHAINS
}

pub fn supported_chain_ids() -> Vec<&'static str> {
    SUPPORTED_CHAINS.iter().map(|chain| chain.id).collect()
}

#[cfg(test)]
mod tests {
    use super::{ChainFamily, is_chain_supported, lookup_chain, supported_chain_ids};

    #[test]
    fn table_matches_gateway_chain_ids() {
        let pairs = [
            ("ethereum", "1"),
            ("polygon", "137"),
            ("bsc", "56"),
            ("arbitrum", "42161"),
            ("optimism", "10"),
            ("base", "8453"),
            ("solana", "solana"),
        ];
        for (id, chain_id) in pairs {
            let chain = lookup_chain(id).expect("known chain");
            assert_eq!(chain.chain_id, chain_id, "chain id for {id}");
        }
        assert_eq!(supported_chain_ids().len(), pairs.len());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let chain = lookup_chain("Polygon").expect("polygon");
        assert_eq!(chain.id, "polygon");
        assert!(is_chain_supported("SOLANA"));
    }

    #[test]
    fn padded_chain_id_is_rejected() {
        assert!(lookup_chain("  Polygon ").is_none());
        assert!(lookup_chain("base\n").is_none());
        assert!(!is_chain_supported(" solana"));
    }

    #[test]
    fn unknown_chain_is_rejected() {
        assert!(lookup_chain("dogecoin").is_none());
        assert!(!is_chain_supported(""));
    }

    #[test]
    fn only_solana_uses_solana_family() {
        let solana: Vec<_> = super::SUPPORTED_CHAINS
            .iter()
            .filter(|chain| chain.family == ChainFamily::Solana)
            .map(|chain| chain.id)
            .collect();
        assert_eq!(solana, vec!["solana"]);
    }
}
