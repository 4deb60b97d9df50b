//! Sources of deal data.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use crate::deal::{Deal, DealId};

/// Request/response access to deals.
///
/// Implementations own transport, retries and error mapping; the navigation core only sees the
/// final result of each call.
pub trait DealsProvider {
    fn fetch_initial_deals(&self) -> anyhow::Result<Vec<Deal>>;
    fn fetch_deals_by_search_term(&self, term: &str) -> anyhow::Result<Vec<Deal>>;
    fn fetch_deal_detail(&self, id: &DealId) -> anyhow::Result<Deal>;
}

/// Serves deals from a JSON file of full records.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    deals: Vec<Deal>,
}

impl FixtureProvider {
    pub fn new(deals: Vec<Deal>) -> Self {
        let deals = deals
            .into_iter()
            .filter(|deal| {
                if deal.media.is_empty() {
                    warn!("ignoring deal {} without media", deal.key);
                    false
                } else {
                    true
                }
            })
            .collect();

        Self { deals }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let _span = tracy_client::span!("FixtureProvider::load");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("error reading {}", path.display()))?;
        let deals: Vec<Deal> = serde_json::from_str(&contents)
            .with_context(|| format!("error parsing deals from {}", path.display()))?;

        let provider = Self::new(deals);
        debug!(
            "loaded {} deals from {}",
            provider.deals.len(),
            path.display()
        );
        Ok(provider)
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }
}

impl DealsProvider for FixtureProvider {
    fn fetch_initial_deals(&self) -> anyhow::Result<Vec<Deal>> {
        Ok(self.deals.iter().map(Deal::summary).collect())
    }

    fn fetch_deals_by_search_term(&self, term: &str) -> anyhow::Result<Vec<Deal>> {
        let term = term.to_lowercase();
        Ok(self
            .deals
            .iter()
            .filter(|deal| {
                deal.title.to_lowercase().contains(&term)
                    || deal.cause.name.to_lowercase().contains(&term)
            })
            .map(Deal::summary)
            .collect())
    }

    fn fetch_deal_detail(&self, id: &DealId) -> anyhow::Result<Deal> {
        match self.deals.iter().find(|deal| &deal.key == id) {
            Some(deal) => Ok(deal.clone()),
            None => bail!("no deal with key {id}"),
        }
    }
}
