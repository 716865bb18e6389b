//! # View Router
//!
//! Turns the session state into the read-only model of the current screen.
//!
//! ## Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         select_view()                                   │
//! │                                                                         │
//! │   ViewState.view ──┬── Dashboard ──► balance, owned count,             │
//! │                    │                 total spent, 3 newest purchases    │
//! │                    │                                                    │
//! │                    ├── Store ──────► catalog rows filtered by search   │
//! │                    │                 text + category, owned/affordable  │
//! │                    │                                                    │
//! │                    ├── History ────► transactions filtered by kind,    │
//! │                    │                 income / spent / net totals        │
//! │                    │                                                    │
//! │                    └── Profile ────► account, tier, next threshold,    │
//! │                                      progress, achievements             │
//! │                                                                         │
//! │   Pure: reads its arguments, mutates nothing, same input → same output │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::account::AccountState;
use crate::catalog::Catalog;
use crate::coins::Coins;
use crate::history::{HistoryTotals, TransactionHistory};
use crate::types::{Account, AccountTier, CatalogItem, Transaction, TransactionKind, View};
use crate::RECENT_PURCHASES_LIMIT;

/// Balance that unlocks "RofloCoin Collector".
const COLLECTOR_BALANCE: Coins = Coins::new(1000);
/// Projects owned that unlock "Project Enthusiast".
const ENTHUSIAST_PROJECTS: usize = 5;

// =============================================================================
// View Selector
// =============================================================================

/// Store screen filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreFilter {
    /// Free-text search over name and description; empty matches all.
    pub search: String,
    /// Exact category; `None` means all categories.
    pub category: Option<String>,
}

impl StoreFilter {
    fn matches(&self, item: &CatalogItem, needle: &str) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| item.category == category);
        category_ok && item.matches_search(needle)
    }
}

/// Which screen is showing, plus the per-screen filters.
///
/// Filters survive navigation, so returning to the store keeps the search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ViewState {
    pub view: View,
    pub store: StoreFilter,
    pub history_kind: Option<TransactionKind>,
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardView {
    pub display_name: String,
    pub balance: Coins,
    pub owned_count: usize,
    pub total_spent: Coins,
    /// Newest first, at most three.
    pub recent_purchases: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreRow {
    pub item: CatalogItem,
    pub owned: bool,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoreView {
    pub filter: StoreFilter,
    pub categories: Vec<String>,
    pub rows: Vec<StoreRow>,
    pub shown: usize,
    pub total: usize,
    pub balance: Coins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryView {
    pub kind: Option<TransactionKind>,
    pub transactions: Vec<Transaction>,
    pub totals: HistoryTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfileView {
    pub account: Account,
    pub tier: AccountTier,
    /// Balance at which the next tier starts; `None` for Premium.
    pub next_tier_at: Option<Coins>,
    /// Coins still missing for the next tier.
    pub coins_to_next_tier: Option<Coins>,
    /// Percent of the way to the next tier (0..=99).
    pub tier_progress: Option<u8>,
    pub owned_count: usize,
    pub achievements: Vec<Achievement>,
}

/// A profile badge, shown locked until its condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub unlocked: bool,
}

impl Achievement {
    fn new(title: &str, description: &str, unlocked: bool) -> Self {
        Achievement {
            title: title.to_string(),
            description: description.to_string(),
            unlocked,
        }
    }
}

/// The projection of one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "view", content = "model", rename_all = "snake_case")]
#[ts(export)]
pub enum ViewModel {
    Dashboard(DashboardView),
    Store(StoreView),
    History(HistoryView),
    Profile(ProfileView),
}

// =============================================================================
// Router
// =============================================================================

/// Builds the model for `current.view`.
///
/// ## Example
/// ```rust
/// use roflo_core::view::{select_view, ViewModel, ViewState};
/// use roflo_core::{AccountState, Catalog, Coins, TransactionHistory, View};
///
/// let catalog = Catalog::sample();
/// let state = AccountState::new("RofloUser", Coins::new(1000));
/// let history = TransactionHistory::new();
///
/// let current = ViewState { view: View::Store, ..Default::default() };
/// match select_view(&current, &state, &catalog, &history) {
///     ViewModel::Store(store) => assert_eq!(store.shown, 4),
///     other => panic!("unexpected view: {:?}", other),
/// }
/// ```
pub fn select_view(
    current: &ViewState,
    state: &AccountState,
    catalog: &Catalog,
    history: &TransactionHistory,
) -> ViewModel {
    match current.view {
        View::Dashboard => ViewModel::Dashboard(dashboard(state, catalog)),
        View::Store => ViewModel::Store(store(&current.store, state, catalog)),
        View::History => ViewModel::History(history_view(current.history_kind, history)),
        View::Profile => ViewModel::Profile(profile(state)),
    }
}

fn dashboard(state: &AccountState, catalog: &Catalog) -> DashboardView {
    let owned_items: Vec<&CatalogItem> = state
        .owned()
        .iter()
        .filter_map(|id| catalog.get(id))
        .collect();

    let total_spent = owned_items.iter().map(|item| item.price).sum();

    let recent_purchases = owned_items
        .iter()
        .rev()
        .take(RECENT_PURCHASES_LIMIT)
        .map(|item| (*item).clone())
        .collect();

    DashboardView {
        display_name: state.display_name().to_string(),
        balance: state.balance(),
        owned_count: state.owned().len(),
        total_spent,
        recent_purchases,
    }
}

fn store(filter: &StoreFilter, state: &AccountState, catalog: &Catalog) -> StoreView {
    let needle = filter.search.trim().to_lowercase();
    let balance = state.balance();

    let rows: Vec<StoreRow> = catalog
        .items()
        .iter()
        .filter(|item| filter.matches(item, &needle))
        .map(|item| StoreRow {
            item: item.clone(),
            owned: state.owns(&item.id),
            affordable: balance >= item.price,
        })
        .collect();

    StoreView {
        filter: filter.clone(),
        categories: catalog.categories(),
        shown: rows.len(),
        total: catalog.len(),
        rows,
        balance,
    }
}

fn history_view(kind: Option<TransactionKind>, history: &TransactionHistory) -> HistoryView {
    HistoryView {
        kind,
        transactions: history.filtered(kind),
        totals: history.totals(),
    }
}

fn profile(state: &AccountState) -> ProfileView {
    let tier = state.tier();
    let balance = state.balance();
    let next_tier_at = tier.next_threshold();

    ProfileView {
        account: state.account().clone(),
        tier,
        next_tier_at,
        coins_to_next_tier: next_tier_at.and_then(|threshold| threshold.checked_sub(balance)),
        tier_progress: next_tier_at.map(|threshold| tier_progress(balance, threshold)),
        owned_count: state.owned().len(),
        achievements: achievements(state),
    }
}

/// `balance / threshold` as a whole percent, floored.
fn tier_progress(balance: Coins, threshold: Coins) -> u8 {
    let percent = balance.amount().saturating_mul(100) / threshold.amount().max(1);
    percent.min(100) as u8
}

/// Profile badges, in display order.
fn achievements(state: &AccountState) -> Vec<Achievement> {
    let owned = state.owned().len();
    vec![
        Achievement::new(
            "RofloCoin Collector",
            "Earn 1000+ RC",
            state.balance() >= COLLECTOR_BALANCE,
        ),
        Achievement::new("First Purchase", "Buy your first project", owned >= 1),
        Achievement::new(
            "Project Enthusiast",
            "Own 5+ projects",
            owned >= ENTHUSIAST_PROJECTS,
        ),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_view(filter: StoreFilter, state: &AccountState) -> StoreView {
        let current = ViewState {
            view: View::Store,
            store: filter,
            history_kind: None,
        };
        match select_view(&current, state, &Catalog::sample(), &TransactionHistory::new()) {
            ViewModel::Store(view) => view,
            other => panic!("expected store, got {:?}", other),
        }
    }

    fn names(view: &StoreView) -> Vec<&str> {
        view.rows.iter().map(|r| r.item.name.as_str()).collect()
    }

    #[test]
    fn test_dashboard_aggregates() {
        let catalog = Catalog::sample();
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        for id in ["1", "2", "3", "4"] {
            state.commit_purchase(catalog.get(id).unwrap()).unwrap();
        }

        let current = ViewState::default();
        let ViewModel::Dashboard(view) =
            select_view(&current, &state, &catalog, &TransactionHistory::new())
        else {
            panic!("expected dashboard");
        };

        assert_eq!(view.owned_count, 4);
        assert_eq!(view.total_spent, Coins::new(525));
        assert_eq!(view.balance, Coins::new(475));
        let recent: Vec<&str> = view.recent_purchases.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(recent, vec!["4", "3", "2"]);
    }

    #[test]
    fn test_dashboard_empty() {
        let state = AccountState::new("RofloUser", Coins::new(1000));
        let ViewModel::Dashboard(view) = select_view(
            &ViewState::default(),
            &state,
            &Catalog::sample(),
            &TransactionHistory::new(),
        ) else {
            panic!("expected dashboard");
        };
        assert_eq!(view.total_spent, Coins::zero());
        assert!(view.recent_purchases.is_empty());
    }

    #[test]
    fn test_store_search_is_case_insensitive() {
        let state = AccountState::new("RofloUser", Coins::new(1000));

        let view = store_view(
            StoreFilter {
                search: "roflochat".to_string(),
                category: None,
            },
            &state,
        );
        assert_eq!(names(&view), vec!["RofloChat"]);

        // Description match (Cyrillic, mixed case).
        let view = store_view(
            StoreFilter {
                search: "МЕМАМИ".to_string(),
                category: None,
            },
            &state,
        );
        assert_eq!(names(&view), vec!["RofloChat"]);
        assert_eq!(view.total, 4);
        assert_eq!(view.shown, 1);
    }

    #[test]
    fn test_store_category_filter() {
        let state = AccountState::new("RofloUser", Coins::new(1000));
        let view = store_view(
            StoreFilter {
                search: String::new(),
                category: Some("Games".to_string()),
            },
            &state,
        );
        assert_eq!(names(&view), vec!["RofloGames Pack"]);

        let view = store_view(
            StoreFilter {
                search: "roflo".to_string(),
                category: Some("games".to_string()),
            },
            &state,
        );
        assert!(view.rows.is_empty(), "category match is exact");
    }

    #[test]
    fn test_store_row_flags() {
        let catalog = Catalog::sample();
        let mut state = AccountState::new("RofloUser", Coins::new(160));
        state.commit_purchase(catalog.get("1").unwrap()).unwrap(); // 10 left

        let view = store_view(StoreFilter::default(), &state);
        let os = &view.rows[0];
        assert!(os.owned);
        assert!(view.rows[1..].iter().all(|r| !r.owned && !r.affordable));
        assert_eq!(view.balance, Coins::new(10));
    }

    #[test]
    fn test_history_view() {
        let history = TransactionHistory::seeded(Utc::now());
        let state = AccountState::default();
        let current = ViewState {
            view: View::History,
            store: StoreFilter::default(),
            history_kind: Some(TransactionKind::Purchase),
        };

        let ViewModel::History(view) = select_view(&current, &state, &Catalog::sample(), &history)
        else {
            panic!("expected history");
        };
        assert_eq!(view.transactions.len(), 2);
        assert_eq!(view.totals.net, 775);
    }

    #[test]
    fn test_profile_tier() {
        let state = AccountState::new("RofloUser", Coins::new(4999));
        let current = ViewState {
            view: View::Profile,
            ..Default::default()
        };
        let ViewModel::Profile(view) = select_view(
            &current,
            &state,
            &Catalog::sample(),
            &TransactionHistory::new(),
        ) else {
            panic!("expected profile");
        };
        assert_eq!(view.tier, AccountTier::Advanced);
        assert_eq!(view.next_tier_at, Some(Coins::new(5000)));
        assert_eq!(view.coins_to_next_tier, Some(Coins::new(1)));
        assert_eq!(view.tier_progress, Some(99));
    }

    fn profile_of(state: &AccountState) -> ProfileView {
        let current = ViewState {
            view: View::Profile,
            ..Default::default()
        };
        match select_view(&current, state, &Catalog::sample(), &TransactionHistory::new()) {
            ViewModel::Profile(view) => view,
            other => panic!("expected profile, got {:?}", other),
        }
    }

    fn unlocked(view: &ProfileView) -> Vec<&str> {
        view.achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.title.as_str())
            .collect()
    }

    #[test]
    fn test_profile_progress_at_tier_boundaries() {
        let view = profile_of(&AccountState::new("RofloUser", Coins::new(999)));
        assert_eq!(view.tier, AccountTier::Beginner);
        assert_eq!(view.next_tier_at, Some(Coins::new(1000)));
        assert_eq!(view.coins_to_next_tier, Some(Coins::new(1)));
        assert_eq!(view.tier_progress, Some(99));

        let view = profile_of(&AccountState::new("RofloUser", Coins::new(1000)));
        assert_eq!(view.tier, AccountTier::Advanced);
        assert_eq!(view.coins_to_next_tier, Some(Coins::new(4000)));
        assert_eq!(view.tier_progress, Some(20));

        let view = profile_of(&AccountState::new("RofloUser", Coins::new(5000)));
        assert_eq!(view.tier, AccountTier::Premium);
        assert_eq!(view.next_tier_at, None);
        assert_eq!(view.coins_to_next_tier, None);
        assert_eq!(view.tier_progress, None);

        let view = profile_of(&AccountState::new("RofloUser", Coins::zero()));
        assert_eq!(view.coins_to_next_tier, Some(Coins::new(1000)));
        assert_eq!(view.tier_progress, Some(0));
    }

    #[test]
    fn test_profile_collector_achievement() {
        let view = profile_of(&AccountState::new("RofloUser", Coins::new(999)));
        assert_eq!(view.achievements.len(), 3);
        assert!(unlocked(&view).is_empty());

        let view = profile_of(&AccountState::new("RofloUser", Coins::new(1000)));
        assert_eq!(unlocked(&view), vec!["RofloCoin Collector"]);
        assert_eq!(view.achievements[0].description, "Earn 1000+ RC");
    }

    #[test]
    fn test_profile_purchase_achievements() {
        let mut items: Vec<CatalogItem> = Catalog::sample().items().to_vec();
        let extra = CatalogItem {
            id: "5".to_string(),
            name: "RofloMaps".to_string(),
            ..items[0].clone()
        };
        items.push(extra);
        let catalog = Catalog::new(items).unwrap();

        let mut state = AccountState::new("RofloUser", Coins::new(800));
        state.commit_purchase(catalog.get("1").unwrap()).unwrap();
        assert_eq!(unlocked(&profile_of(&state)), vec!["First Purchase"]);

        for id in ["2", "3", "4"] {
            state.commit_purchase(catalog.get(id).unwrap()).unwrap();
        }
        assert_eq!(state.owned().len(), 4);
        assert_eq!(unlocked(&profile_of(&state)), vec!["First Purchase"]);

        state.commit_purchase(catalog.get("5").unwrap()).unwrap();
        let view = profile_of(&state);
        assert_eq!(view.owned_count, 5);
        assert_eq!(unlocked(&view), vec!["First Purchase", "Project Enthusiast"]);
    }

    #[test]
    fn test_select_view_is_deterministic() {
        let catalog = Catalog::sample();
        let history = TransactionHistory::seeded(Utc::now());
        let mut state = AccountState::new("RofloUser", Coins::new(1000));
        state.commit_purchase(catalog.get("2").unwrap()).unwrap();
        let snapshot = state.clone();

        for view in [View::Dashboard, View::Store, View::History, View::Profile] {
            let current = ViewState {
                view,
                ..Default::default()
            };
            let first = select_view(&current, &state, &catalog, &history);
            let second = select_view(&current, &state, &catalog, &history);
            assert_eq!(first, second);
        }
        assert_eq!(state, snapshot);
    }
}
