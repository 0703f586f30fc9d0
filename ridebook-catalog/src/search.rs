use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::catalog::RouteCatalog;
use crate::route::{Route, VehicleKind};

/// Price bands shown on the route listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceBand {
    #[default]
    All,
    /// Below 200
    Budget,
    /// 200 up to (not including) 500
    Mid,
    /// 500 and above
    Premium,
}

impl PriceBand {
    pub fn contains(&self, price: u32) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Budget => price < 200,
            PriceBand::Mid => (200..500).contains(&price),
            PriceBand::Premium => price >= 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Bus,
    Train,
}

impl KindFilter {
    fn matches(&self, kind: VehicleKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Bus => kind == VehicleKind::Bus,
            KindFilter::Train => kind == VehicleKind::Train,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteSort {
    /// Highest rated first
    #[default]
    Rating,
    /// Cheapest first
    Price,
    /// Shortest first
    Duration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteQuery {
    #[serde(default, rename = "q")]
    pub text: Option<String>,
    #[serde(default)]
    pub kind: KindFilter,
    #[serde(default)]
    pub price: PriceBand,
    #[serde(default)]
    pub sort: RouteSort,
}

impl RouteQuery {
    /// Free text matches the route name, its vehicle kind, or any stop (case-insensitive)
    fn matches_text(&self, route: &Route) -> bool {
        let needle = match self.text.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };

        route.name.to_lowercase().contains(&needle)
            || route.kind.as_str().contains(&needle)
            || route.stops.iter().any(|s| s.to_lowercase().contains(&needle))
    }

    pub fn matches(&self, route: &Route) -> bool {
        self.matches_text(route) && self.kind.matches(route.kind) && self.price.contains(route.price)
    }
}

impl RouteCatalog {
    pub fn search(&self, query: &RouteQuery) -> Vec<&Route> {
        let mut found: Vec<&Route> = self.list().iter().filter(|r| query.matches(r)).collect();

        match query.sort {
            RouteSort::Rating => found.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)),
            RouteSort::Price => found.sort_by_key(|r| r.price),
            RouteSort::Duration => found.sort_by_key(|r| r.duration_minutes()),
        }

        found
    }
}
