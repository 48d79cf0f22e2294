//! Market model: per-station commodity classification used by the trade
//! optimizer. [`crate::model::MarketInfo`] holds the two derived views;
//! this module supplies the cross-station query the optimizer needs.

use crate::model::{CommodityEntry, ExclusionSet, MarketInfo};

/// The commodity maximizing `to.demand_list[c].sell_price -
/// from.available_stock[c].buy_price` among commodities present in both
/// stations' derived maps and not already in `excluded`. Profit must be
/// strictly positive. Returns the buy-side (`from`) entry, since manifest
/// picking needs its stock, plus the per-unit profit.
pub fn highest_profit_commodity(
    from: &MarketInfo,
    to: &MarketInfo,
    excluded: &ExclusionSet,
) -> Option<(CommodityEntry, i64)> {
    let mut best: Option<(CommodityEntry, i64)> = None;
    for (id, demand_entry) in &to.demand_list {
        if excluded.contains(id) {
            continue;
        }
        let Some(stock_entry) = from.available_stock.get(id) else {
            continue;
        };
        let per_unit_profit = demand_entry.sell_price - stock_entry.buy_price;
        if per_unit_profit <= 0 {
            continue;
        }
        let better = match &best {
            None => true,
            Some((_, best_profit)) => per_unit_profit > *best_profit,
        };
        if better {
            best = Some((stock_entry.clone(), per_unit_profit));
        }
    }
    best
}
