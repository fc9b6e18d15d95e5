use std::collections::HashSet;

use dlc_interface::{canonical_name, Container};

/// Select the entry names an output step should serialize.
///
/// Excluded names are dropped everywhere. A non-empty wanted list wins
/// over the container contents; otherwise every entry not excluded is
/// selected. The result is sorted so output order never depends on
/// container iteration order.
pub fn filter_and_sort(container: &Container, want: &[String], exclude: &[String]) -> Vec<String> {
    let exclude: HashSet<String> = exclude
        .iter()
        .map(|name| canonical_name(name))
        .filter(|name| !name.is_empty())
        .collect();

    let mut wanted: Vec<String> = want
        .iter()
        .map(|name| canonical_name(name))
        .filter(|name| !name.is_empty() && !exclude.contains(name))
        .collect();

    if !wanted.is_empty() {
        wanted.sort();
        return wanted;
    }

    let mut names: Vec<String> = container
        .names()
        .into_iter()
        .filter(|name| !exclude.contains(name))
        .collect();
    names.sort();
    names
}
