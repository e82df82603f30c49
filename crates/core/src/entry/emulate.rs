//! Directory emulation for flat listings.

use std::collections::HashSet;

use super::types::Entry;
use crate::path::dirname;

/// Append an entry for every parent directory implied by the listing.
///
/// The store is flat, so `a/b/c.txt` may exist without markers for `a` or
/// `a/b`. Directories already listed as markers are not duplicated.
#[must_use]
pub fn emulate_directories(mut listing: Vec<Entry>) -> Vec<Entry> {
    let mut implied: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut listed: HashSet<String> = HashSet::new();

    for entry in &listing {
        if entry.is_dir() {
            listed.insert(entry.path.clone());
        }

        let mut parent = entry.dirname.clone();
        while !parent.is_empty() && seen.insert(parent.clone()) {
            let next = dirname(&parent);
            implied.push(parent);
            parent = next;
        }
    }

    listing.extend(
        implied
            .into_iter()
            .filter(|dir| !listed.contains(dir))
            .map(Entry::implied_directory),
    );
    listing
}
