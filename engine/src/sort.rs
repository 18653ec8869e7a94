use std::cmp::Ordering;
use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::record::Monster;

/// CR ascending (unsortable last), then display name ignoring case and accents. The raw
/// name and the file name break remaining ties so distinct records never
/// compare equal.
pub fn compare(a: &Monster, b: &Monster) -> Ordering {
    a.cr_sort
        .cmp_for_sort(b.cr_sort)
        .then_with(|| compare_names(&a.display_name, &b.display_name))
        .then_with(|| a.file.cmp(&b.file))
}

/// Primary key: lowercase with diacritics removed, so "Éclair" files under
/// "e". Accents, then case, only break ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(collation_key(b))
        .then_with(|| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Stable in-place sort.
pub fn sort_monsters(monsters: &mut [Monster]) {
    monsters.sort_by(compare);
}

/// Sorted view that leaves `monsters` untouched.
pub fn sorted(monsters: &[Monster]) -> Vec<&Monster> {
    let mut view: Vec<&Monster> = monsters.iter().collect();
    view.sort_by(|a, b| compare(a, b));
    view
}

/// Distinct display CRs of sortable monsters, lowest first.
pub fn cr_options<'a>(monsters: impl IntoIterator<Item = &'a Monster>) -> Vec<String> {
    let mut seen: IndexMap<&str, f64> = IndexMap::new();
    for m in monsters {
        if let Some(v) = m.cr_sort.as_f64() {
            seen.entry(m.clean_cr.as_str()).or_insert(v);
        }
    }
    seen.sort_by(|_, a, _, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    seen.into_keys().map(str::to_string).collect()
}

/// Distinct sources, lexically ordered.
pub fn source_options<'a>(monsters: impl IntoIterator<Item = &'a Monster>) -> Vec<String> {
    monsters
        .into_iter()
        .filter_map(|m| m.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `"tome-of-horrors"` -> `"Tome Of Horrors"`.
pub fn format_source(source: &str) -> String {
    source
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heading for monsters whose CR does not parse.
pub const UNDEFINED_CR_HEADING: &str = "CR Undefined";

/// A run of consecutive monsters sharing one display CR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrGroup<'a> {
    pub heading: String,
    /// `None` for the unsortable group.
    pub cr: Option<String>,
    pub monsters: Vec<&'a Monster>,
}

/// Group an already sorted list under CR headings. Only consecutive runs are
/// merged, so the input order is kept.
pub fn group_by_cr<'a>(monsters: impl IntoIterator<Item = &'a Monster>) -> Vec<CrGroup<'a>> {
    let mut groups: Vec<CrGroup<'a>> = Vec::new();
    for m in monsters {
        let cr = m.cr_sort.is_sortable().then(|| m.clean_cr.clone());
        match groups.last_mut() {
            Some(group) if group.cr == cr => group.monsters.push(m),
            _ => {
                let heading = match &cr {
                    Some(c) => format!("CR {}", c),
                    None => UNDEFINED_CR_HEADING.to_string(),
                };
                groups.push(CrGroup {
                    heading,
                    cr,
                    monsters: vec![m],
                });
            }
        }
    }
    groups
}
