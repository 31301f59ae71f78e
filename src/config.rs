use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::catalog::PaymentCatalog;
use crate::filter::ListingFilter;
use crate::htx::QueryParams;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub scan_interval_sec: u64,
    pub request_timeout_ms: u64,
    pub max_pages: u32,

    pub coin_id: String,
    pub currency: String,

    // Filters
    pub min_trade_limit: String,
    pub excluded_users: String,

    // Catalog: comma separated target names, optional `code=name` overrides
    pub target_methods: String,
    pub payment_methods: Option<String>,

    // Stats / output
    pub stats_log_sec: u64,
    pub snapshot_jsonl_path: Option<String>,
}

impl Settings {
    /// Reads `HTX_*` environment variables (and `.env`) over built-in defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let c = config::Config::builder()
            .set_default("base_url", "https://otc-api.trygofast.com/v1/data/trade-market")?
            .set_default("scan_interval_sec", 20_i64)?
            .set_default("request_timeout_ms", 5000_i64)?
            .set_default("max_pages", 10_i64)?
            .set_default("coin_id", "2")?
            .set_default("currency", "11")?
            .set_default("min_trade_limit", "10000")?
            .set_default("excluded_users", "PAXBID,RushRubleMini-A")?
            .set_default("target_methods", "Сбербанк,Тинькофф,Райффайзенбанк,СБП")?
            .set_default("stats_log_sec", 300_i64)?
            .add_source(config::Environment::with_prefix("HTX"))
            .build()?;
        let s: Settings = c.try_deserialize()?;
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scan_interval_sec < 1 {
            bail!("scan_interval_sec must be a positive integer");
        }
        if self.max_pages < 1 {
            bail!("max_pages must be at least 1");
        }
        if split_list(&self.target_methods).is_empty() {
            bail!("target_methods must name at least one payment method");
        }
        self.min_trade_limit_dec()?;
        self.catalog_names()?;
        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_sec)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            coin_id: self.coin_id.clone(),
            currency: self.currency.clone(),
        }
    }

    fn min_trade_limit_dec(&self) -> anyhow::Result<Decimal> {
        self.min_trade_limit
            .trim()
            .parse::<Decimal>()
            .with_context(|| format!("invalid min_trade_limit {:?}", self.min_trade_limit))
    }

    pub fn listing_filter(&self) -> anyhow::Result<ListingFilter> {
        Ok(ListingFilter::new(self.min_trade_limit_dec()?, split_list(&self.excluded_users)))
    }

    fn catalog_names(&self) -> anyhow::Result<HashMap<String, String>> {
        let raw = match self.payment_methods.as_deref() {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(PaymentCatalog::default_names()),
        };
        let mut names = HashMap::new();
        for entry in split_list(raw) {
            let (code, name) = entry
                .split_once('=')
                .map(|(c, n)| (c.trim(), n.trim()))
                .filter(|(c, n)| !c.is_empty() && !n.is_empty())
                .with_context(|| format!("payment_methods entry {:?} is not code=name", entry))?;
            names.insert(code.to_string(), name.to_string());
        }
        Ok(names)
    }

    pub fn catalog(&self) -> anyhow::Result<PaymentCatalog> {
        Ok(PaymentCatalog::new(self.catalog_names()?, split_list(&self.target_methods)))
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(String::from)
        .collect()
}
