//! Domain state containers.
//!
//! Each container owns an in-memory collection, a loading flag, and the
//! fetch/mutate operations the view layer drives. Containers catch errors at
//! the top of each fetch operation and leave prior state untouched; the
//! transaction-review container additionally carries a transient
//! user-visible message.
//!
//! Guards and cancellation are keyed on the [`Session`](crate::auth::Session)
//! epoch: the initial fetch runs once per sign-in, and a fetch superseded by
//! a sign-out (or a newer sign-in) discards its result instead of updating
//! state. In-flight requests are not aborted at the transport level.

pub mod budgets;
pub mod entries;
pub mod transactions;

pub use budgets::BudgetStore;
pub use entries::EntriesStore;
pub use transactions::TransactionsStore;

/// Append the items of `incoming` whose id is not already held.
///
/// Never replaces existing elements, never reorders.
pub(crate) fn merge_new<T>(existing: &mut Vec<T>, incoming: Vec<T>, id_of: impl Fn(&T) -> i64) {
    let held: std::collections::HashSet<i64> = existing.iter().map(&id_of).collect();
    existing.extend(
        incoming
            .into_iter()
            .filter(|item| !held.contains(&id_of(item))),
    );
}

/// Swap the element with the replacement's id for the replacement
/// (structural replace, not a field patch). Returns false if no element
/// matched.
pub(crate) fn replace_by_id<T>(items: &mut [T], replacement: T, id_of: impl Fn(&T) -> i64) -> bool {
    let id = id_of(&replacement);
    match items.iter_mut().find(|item| id_of(item) == id) {
        Some(slot) => {
            *slot = replacement;
            true
        }
        None => false,
    }
}

/// Remove the element with `id`, returning it together with its index so a
/// failed remote call can reinsert it where it was.
pub(crate) fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: i64,
    id_of: impl Fn(&T) -> i64,
) -> Option<(usize, T)> {
    let index = items.iter().position(|item| id_of(item) == id)?;
    Some((index, items.remove(index)))
}
