// src/symbols/fuzzy.rs
//
// "Did you mean" support: find transitively reachable members whose name is
// close to the query under Damerau-Levenshtein distance. The identifier and
// constant namespaces are searched separately so `foo` never suggests `Foo`.
// Results are sorted (distance ascending, name ascending) for determinism.

use rustc_hash::FxHashSet;

use crate::globals::GlobalState;
use crate::names::NameRef;
use crate::symbols::SymbolRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzySearchResult {
    pub symbol: SymbolRef,
    pub name: NameRef,
    pub distance: i32,
}

impl GlobalState {
    /// All members transitively reachable from `sym` whose name is strictly
    /// closer to `name` than `better_than` (pass -1 for the default bound,
    /// scaled to the query length).
    pub fn find_member_fuzzy(
        &self,
        sym: SymbolRef,
        name: NameRef,
        better_than: i32,
    ) -> Vec<FuzzySearchResult> {
        let Some(query) = self.names.str_of(name) else {
            // Synthetic names are never typos.
            return Vec::new();
        };
        let bound = if better_than >= 0 {
            better_than
        } else {
            (query.len() as i32 / 2).max(2) + 1
        };
        if bound <= 0 {
            return Vec::new();
        }

        let query_first = query.chars().next();
        // An uppercase query searches the constant partition, a lowercase
        // one the identifier partition; anything else searches both.
        let (want_constant, want_identifier) = match query_first {
            Some(c) if c.is_uppercase() => (true, false),
            Some(c) if c.is_alphabetic() => (false, true),
            _ => (true, true),
        };

        let mut out = Vec::new();
        let mut seen: FxHashSet<NameRef> = FxHashSet::default();
        for ancestor in self.linearization_of(sym) {
            for (candidate_name, candidate_sym) in self.members_stable_order_slow(ancestor) {
                if candidate_name == name || !seen.insert(candidate_name) {
                    continue;
                }
                let Some(candidate) = self.names.str_of(candidate_name) else {
                    continue;
                };
                let candidate_is_constant = self.names.is_constant_name(candidate_name);
                if candidate_is_constant && !want_constant {
                    continue;
                }
                if !candidate_is_constant && !want_identifier {
                    continue;
                }
                // Length difference is a lower bound on the distance.
                let len_gap = (query.len() as i32 - candidate.len() as i32).abs();
                if len_gap >= bound {
                    continue;
                }
                let distance = damerau_levenshtein(query, candidate);
                if distance < bound {
                    out.push(FuzzySearchResult {
                        symbol: candidate_sym,
                        name: candidate_name,
                        distance,
                    });
                }
            }
        }

        out.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| self.names.show(a.name).cmp(&self.names.show(b.name)))
        });
        out
    }
}

/// Edit distance with adjacent transposition counted as one operation.
fn damerau_levenshtein(a: &str, b: &str) -> i32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let m = a.len();
    let n = b.len();
    if m == 0 {
        return n as i32;
    }
    if n == 0 {
        return m as i32;
    }

    let mut dp = vec![vec![0i32; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate().take(m + 1) {
        row[0] = i as i32;
    }
    for (j, cell) in dp[0].iter_mut().enumerate().take(n + 1) {
        *cell = j as i32;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut best = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(dp[i - 2][j - 2] + 1);
            }
            dp[i][j] = best;
        }
    }
    dp[m][n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Loc;
    use crate::well_known;

    fn setup() -> (GlobalState, SymbolRef) {
        let mut gs = GlobalState::new(Default::default());
        let name = gs.intern_name("Widget");
        let widget = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(widget).set_is_module(false);
        gs.symbol_mut(widget).set_superclass(well_known::OBJECT);
        (gs, widget)
    }

    fn method(gs: &mut GlobalState, owner: SymbolRef, name: &str) -> SymbolRef {
        let name = gs.intern_name(name);
        gs.enter_method(owner, name, Loc::none()).unwrap()
    }

    #[test]
    fn distance_counts_transpositions_once() {
        assert_eq!(damerau_levenshtein("render", "render"), 0);
        assert_eq!(damerau_levenshtein("render", "rneder"), 1);
        assert_eq!(damerau_levenshtein("render", "rendr"), 1);
        assert_eq!(damerau_levenshtein("render", "renderer"), 2);
        assert_eq!(damerau_levenshtein("", "abc"), 3);
    }

    #[test]
    fn fuzzy_finds_close_methods() {
        let (mut gs, widget) = setup();
        let render = method(&mut gs, widget, "render");
        method(&mut gs, widget, "unrelated_thing");

        let typo = gs.intern_name("rendr");
        let results = gs.find_member_fuzzy(widget, typo, -1);
        assert!(!results.is_empty());
        assert_eq!(results[0].symbol, render);
        assert_eq!(results[0].distance, 1);
        assert!(results.iter().all(|r| gs.show_name(r.name) != "unrelated_thing"));
    }

    #[test]
    fn fuzzy_searches_ancestors() {
        let (mut gs, widget) = setup();
        let inherited = method(&mut gs, well_known::OBJECT, "inspect");

        let typo = gs.intern_name("inspct");
        let results = gs.find_member_fuzzy(widget, typo, -1);
        assert!(results.iter().any(|r| r.symbol == inherited));
    }

    #[test]
    fn fuzzy_respects_better_than_cutoff() {
        let (mut gs, widget) = setup();
        method(&mut gs, widget, "render");

        let typo = gs.intern_name("rendr");
        assert!(gs.find_member_fuzzy(widget, typo, 1).is_empty());
        assert_eq!(gs.find_member_fuzzy(widget, typo, 2).len(), 1);
    }

    #[test]
    fn fuzzy_partitions_constants_from_identifiers() {
        let (mut gs, widget) = setup();
        let version_name = gs.intern_name("Version");
        let version = gs
            .enter_static_field(widget, version_name, Loc::none())
            .unwrap();
        method(&mut gs, widget, "version");

        let const_typo = gs.intern_name("Versoin");
        let results = gs.find_member_fuzzy(widget, const_typo, -1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, version);

        let ident_typo = gs.intern_name("versoin");
        let results = gs.find_member_fuzzy(widget, ident_typo, -1);
        assert_eq!(results.len(), 1);
        assert_eq!(gs.show_name(results[0].name), "version");
    }

    #[test]
    fn fuzzy_results_are_sorted_deterministically() {
        let (mut gs, widget) = setup();
        method(&mut gs, widget, "renders");
        method(&mut gs, widget, "rander");
        method(&mut gs, widget, "render");

        let typo = gs.intern_name("rende");
        let results = gs.find_member_fuzzy(widget, typo, -1);
        let shown: Vec<String> = results.iter().map(|r| gs.show_name(r.name)).collect();
        // Distance 1 before distance 2, lexicographic within a distance.
        assert_eq!(shown, vec!["render", "rander", "renders"]);
    }
}
