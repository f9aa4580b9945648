use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockbook_catalog::{Catalog, Product};
use stockbook_core::ProductCode;
use stockbook_sales::{Channel, Ledger, SaleEvent};

use crate::series::Series;

/// Product attribute used to group sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Family,
    Size,
    Color,
}

impl Dimension {
    fn value_of(self, product: &Product) -> &str {
        match self {
            Dimension::Family => product.family(),
            Dimension::Size => product.size(),
            Dimension::Color => product.color(),
        }
    }
}

/// Units sold for one group of a [`Dimension`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub group: String,
    pub quantity: u64,
}

/// Units sold through one channel and its share of all units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelShare {
    pub channel: Channel,
    pub quantity: u64,
    /// Percentage of `total_units_sold`, unrounded.
    pub percent: Decimal,
}

/// Every metric in one serializable bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub total_units_sold: u64,
    pub total_profit: Option<Decimal>,
    pub margin_percent: Option<Decimal>,
    pub top_family: Option<GroupTotal>,
    pub top_size: Option<GroupTotal>,
    pub top_color: Option<GroupTotal>,
    pub daily: Series<NaiveDate>,
    pub hourly: Series<u32>,
    pub channels: Vec<ChannelShare>,
    /// Distinct codes of sales that reference no catalog product.
    pub unmatched_codes: Vec<ProductCode>,
    pub unmatched_units: u64,
}

impl StatisticsReport {
    pub fn has_data(&self) -> bool {
        self.total_units_sold > 0
    }
}

/// Read-only view joining the ledger to the catalog by product code.
///
/// Sales whose code is missing from the catalog count towards units sold and
/// the time/channel series, but are excluded from anything that needs product
/// attributes (profit, margin, top groups). They are listed by
/// [`Statistics::unmatched_sales`].
#[derive(Debug, Clone, Copy)]
pub struct Statistics<'a> {
    catalog: &'a Catalog,
    ledger: &'a Ledger,
}

impl<'a> Statistics<'a> {
    pub fn new(catalog: &'a Catalog, ledger: &'a Ledger) -> Self {
        Self { catalog, ledger }
    }

    fn matched(&self) -> impl Iterator<Item = (&'a SaleEvent, &'a Product)> + 'a {
        let catalog = self.catalog;
        self.ledger
            .iter()
            .filter_map(move |sale| catalog.get(sale.product_code.as_str()).map(|p| (sale, p)))
    }

    /// Σ quantity over every sale; 0 for an empty ledger. Saturates at
    /// `u64::MAX`.
    pub fn total_units_sold(&self) -> u64 {
        sum_units(self.ledger.iter().map(|s| s.quantity))
    }

    /// Σ price × quantity over matched sales; `None` when nothing matches or
    /// the sum does not fit in a `Decimal`.
    pub fn total_revenue(&self) -> Option<Decimal> {
        self.sum_matched(|sale, product| product.price().checked_mul(Decimal::from(sale.quantity)))
    }

    /// Σ (price − cost) × quantity over matched sales; `None` when nothing
    /// matches or the sum does not fit in a `Decimal`.
    pub fn total_profit(&self) -> Option<Decimal> {
        self.sum_matched(|sale, product| {
            product
                .unit_profit()
                .checked_mul(Decimal::from(sale.quantity))
        })
    }

    /// Profit as a percentage of revenue; `None` without matched sales or
    /// when revenue is zero.
    pub fn margin_percent(&self) -> Option<Decimal> {
        let revenue = self.total_revenue()?;
        let profit = self.total_profit()?;
        profit
            .checked_div(revenue)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }

    fn sum_matched(
        &self,
        f: impl Fn(&SaleEvent, &Product) -> Option<Decimal>,
    ) -> Option<Decimal> {
        let mut matched = self.matched().peekable();
        matched.peek()?;
        matched.try_fold(Decimal::ZERO, |acc, (sale, product)| {
            acc.checked_add(f(sale, product)?)
        })
    }

    /// Units sold per group of `dimension`, ascending by group name.
    pub fn totals_by_dimension(&self, dimension: Dimension) -> Vec<GroupTotal> {
        let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
        for (sale, product) in self.matched() {
            add_units(groups.entry(dimension.value_of(product)).or_default(), sale.quantity);
        }
        groups
            .into_iter()
            .map(|(group, quantity)| GroupTotal {
                group: group.to_string(),
                quantity,
            })
            .collect()
    }

    /// Best-selling group of `dimension`. Ties go to the lexically smallest
    /// group name.
    pub fn top_by_dimension(&self, dimension: Dimension) -> Option<GroupTotal> {
        self.totals_by_dimension(dimension)
            .into_iter()
            .reduce(|best, next| if next.quantity > best.quantity { next } else { best })
    }

    /// Units sold per calendar day, ascending.
    pub fn daily_series(&self) -> Series<NaiveDate> {
        let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for sale in self.ledger.iter() {
            add_units(days.entry(sale.timestamp.date()).or_default(), sale.quantity);
        }
        Series::from_buckets(days)
    }

    /// Units sold per hour of day (0–23) across all dates; only hours with sales.
    pub fn hourly_series(&self) -> Series<u32> {
        let mut hours: BTreeMap<u32, u64> = BTreeMap::new();
        for sale in self.ledger.iter() {
            add_units(hours.entry(sale.timestamp.hour()).or_default(), sale.quantity);
        }
        Series::from_buckets(hours)
    }

    /// Units and percentage share per channel, in channel order. Channels
    /// without sales are omitted.
    pub fn channel_distribution(&self) -> Vec<ChannelShare> {
        let total = self.total_units_sold();
        if total == 0 {
            return Vec::new();
        }

        let mut channels: BTreeMap<Channel, u64> = BTreeMap::new();
        for sale in self.ledger.iter() {
            add_units(channels.entry(sale.channel).or_default(), sale.quantity);
        }

        let total = Decimal::from(total);
        channels
            .into_iter()
            .map(|(channel, quantity)| ChannelShare {
                channel,
                quantity,
                percent: Decimal::from(quantity) * Decimal::ONE_HUNDRED / total,
            })
            .collect()
    }

    /// Sales that reference a code missing from the catalog.
    pub fn unmatched_sales(&self) -> Vec<&'a SaleEvent> {
        let catalog = self.catalog;
        self.ledger
            .iter()
            .filter(|sale| !catalog.contains(sale.product_code.as_str()))
            .collect()
    }

    pub fn report(&self) -> StatisticsReport {
        let unmatched = self.unmatched_sales();
        let mut unmatched_codes: Vec<ProductCode> =
            unmatched.iter().map(|s| s.product_code.clone()).collect();
        unmatched_codes.sort();
        unmatched_codes.dedup();

        StatisticsReport {
            total_units_sold: self.total_units_sold(),
            total_profit: self.total_profit(),
            margin_percent: self.margin_percent(),
            top_family: self.top_by_dimension(Dimension::Family),
            top_size: self.top_by_dimension(Dimension::Size),
            top_color: self.top_by_dimension(Dimension::Color),
            daily: self.daily_series(),
            hourly: self.hourly_series(),
            channels: self.channel_distribution(),
            unmatched_codes,
            unmatched_units: sum_units(unmatched.iter().map(|s| s.quantity)),
        }
    }
}

/// Unit counts saturate instead of overflowing: the ledger accepts any `u64`
/// quantity, so totals over several rows may not fit.
pub(crate) fn sum_units(quantities: impl IntoIterator<Item = u64>) -> u64 {
    quantities.into_iter().fold(0, u64::saturating_add)
}

fn add_units(slot: &mut u64, quantity: u64) {
    *slot = slot.saturating_add(quantity);
}
