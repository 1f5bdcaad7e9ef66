//! Built-in feature catalogue

use super::types::{FeatureSpec, ProviderKind, Sleeve, TargetFreq};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const DAILY_SLA: i64 = 1_440;
const WEEKLY_SLA: i64 = 10_080;
const MONTHLY_SLA: i64 = 43_200;
const QUARTERLY_SLA: i64 = 131_400;
const QUOTE_SLA: i64 = 60;

fn fred(symbol: &str, sleeve: Sleeve, label: &str, weight: Decimal, freq: TargetFreq) -> FeatureSpec {
    let sla = match freq {
        TargetFreq::Intraday => QUOTE_SLA,
        TargetFreq::Daily => DAILY_SLA,
        TargetFreq::Weekly => WEEKLY_SLA,
        TargetFreq::Monthly => MONTHLY_SLA,
        TargetFreq::Quarterly => QUARTERLY_SLA,
    };
    FeatureSpec::new(symbol, sleeve, label, weight, freq, sla, ProviderKind::Fred)
}

fn quote(symbol: &str, label: &str, weight: Decimal, provider: ProviderKind) -> FeatureSpec {
    // GLOBAL_QUOTE reports only the trading day
    let (freq, sla) = match provider {
        ProviderKind::AlphaVantage => (TargetFreq::Daily, DAILY_SLA),
        _ => (TargetFreq::Intraday, QUOTE_SLA),
    };
    FeatureSpec::new(symbol, Sleeve::Equities, label, weight, freq, sla, provider)
}

/// Every tracked feature, grouped by sleeve
pub fn default_features() -> Vec<FeatureSpec> {
    use Sleeve::*;
    use TargetFreq::*;

    vec![
        // Rates
        fred("FEDFUNDS", Rates, "Effective fed funds rate", dec!(1.0), Monthly),
        fred("DGS2", Rates, "2Y Treasury yield", dec!(0.8), Daily),
        fred("DGS10", Rates, "10Y Treasury yield", dec!(0.9), Daily),
        fred("DGS30", Rates, "30Y Treasury yield", dec!(0.5), Daily),
        fred("T10Y2Y", Rates, "10Y-2Y curve spread", dec!(0.9), Daily),
        fred("DFII10", Rates, "10Y real yield", dec!(0.6), Daily),
        // FX
        fred("DTWEXBGS", Fx, "Broad trade-weighted dollar", dec!(0.9), Daily),
        fred("DEXUSEU", Fx, "USD per EUR", dec!(0.6), Daily),
        fred("DEXJPUS", Fx, "JPY per USD", dec!(0.6), Daily),
        fred("DEXCHUS", Fx, "CNY per USD", dec!(0.4), Daily),
        // Credit
        fred("BAMLH0A0HYM2", Credit, "High yield OAS", dec!(1.0), Daily),
        fred("BAMLC0A0CM", Credit, "Investment grade OAS", dec!(0.8), Daily),
        fred("BAMLH0A3HYC", Credit, "CCC and lower OAS", dec!(0.6), Daily),
        fred("NFCI", Credit, "Chicago Fed financial conditions", dec!(0.7), Weekly),
        // Volatility
        fred("VIXCLS", Volatility, "CBOE VIX", dec!(1.0), Daily),
        fred("OVXCLS", Volatility, "CBOE crude oil volatility", dec!(0.4), Daily),
        fred("GVZCLS", Volatility, "CBOE gold volatility", dec!(0.3), Daily),
        // Commodities
        fred("DCOILWTICO", Commodities, "WTI crude oil", dec!(0.8), Daily),
        fred("DCOILBRENTEU", Commodities, "Brent crude oil", dec!(0.6), Daily),
        fred("DHHNGSP", Commodities, "Henry Hub natural gas", dec!(0.4), Daily),
        fred("PCOPPUSDM", Commodities, "Global copper price", dec!(0.5), Monthly),
        // Macro
        fred("UNRATE", Macro, "Unemployment rate", dec!(1.0), Monthly),
        fred("CPIAUCSL", Macro, "Consumer price index", dec!(0.9), Monthly),
        fred("PCEPILFE", Macro, "Core PCE price index", dec!(0.8), Monthly),
        fred("PAYEMS", Macro, "Nonfarm payrolls", dec!(0.8), Monthly),
        fred("INDPRO", Macro, "Industrial production", dec!(0.5), Monthly),
        fred("ICSA", Macro, "Initial jobless claims", dec!(0.6), Weekly),
        fred("UMCSENT", Macro, "Consumer sentiment", dec!(0.4), Monthly),
        fred("GDPC1", Macro, "Real GDP", dec!(0.7), Quarterly),
        // Equities and risk proxies
        quote("SPY", "S&P 500 daily change", dec!(1.0), ProviderKind::AlphaVantage),
        quote("QQQ", "Nasdaq 100 daily change", dec!(0.8), ProviderKind::AlphaVantage),
        quote("DIA", "Dow Jones daily change", dec!(0.6), ProviderKind::AlphaVantage),
        quote("bitcoin", "Bitcoin 24h change", dec!(0.3), ProviderKind::CoinGecko),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_size() {
        assert_eq!(default_features().len(), 33);
    }

    #[test]
    fn test_sla_follows_frequency() {
        let features = default_features();
        let unrate = features.iter().find(|f| f.symbol == "UNRATE").unwrap();
        assert_eq!(unrate.sla_minutes, MONTHLY_SLA);
        let dgs10 = features.iter().find(|f| f.symbol == "DGS10").unwrap();
        assert_eq!(dgs10.sla_minutes, DAILY_SLA);
        let bitcoin = features.iter().find(|f| f.symbol == "bitcoin").unwrap();
        assert_eq!(bitcoin.sla_minutes, QUOTE_SLA);
    }

    #[test]
    fn test_date_only_quotes_use_daily_sla() {
        let features = default_features();
        for symbol in ["SPY", "QQQ", "DIA"] {
            let spec = features.iter().find(|f| f.symbol == symbol).unwrap();
            assert_eq!(spec.sla_minutes, DAILY_SLA);
            assert_eq!(spec.target_freq, TargetFreq::Daily);
        }
    }

    #[test]
    fn test_feature_ids() {
        let features = default_features();
        assert_eq!(features[0].feature_id, "rates.fedfunds");
        assert!(features.iter().any(|f| f.feature_id == "equities.bitcoin"));
    }
}
