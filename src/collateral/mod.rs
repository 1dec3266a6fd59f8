pub mod store;

pub use store::CollateralStore;

/// Tickers accepted as collateral by default; stored as `PF_{ticker}USD`.
pub const DEFAULT_COLLATERAL: &[&str] = &[
    "AAVE", "ALGO", "ARB", "FET", "AVAX", "BTC", "TAO", "TIA", "ADA", "LINK", "ATOM", "CRV", "DAI",
    "MANA", "DOGE", "WIF", "ENA", "ETH", "FARTCOIN", "FIL", "INJ", "KAS", "KSM", "LTC", "MINA",
    "NEAR", "ONDO", "PAXG", "PEPE", "DOT", "RENDER", "SEI", "SHIB", "SOL", "SPX", "XLM", "STX",
    "SUI", "USDT", "XTZ", "GRT", "RUNE", "TRX", "UNI", "USDC", "XRP",
];

/// Upper-cases a symbol and checks it is a perpetual of the form
/// `PF_<ALNUM>USD`.
pub fn normalize_symbol(symbol: &str) -> Option<String> {
    let normalized = symbol.trim().to_uppercase();
    let base = normalized.strip_prefix("PF_")?.strip_suffix("USD")?;

    if base.is_empty() || !base.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return None;
    }

    Some(normalized)
}
