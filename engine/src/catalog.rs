use crate::filter::{filter, FilterState};
use crate::loader::LoadReport;
use crate::record::Monster;
use crate::sort::{cr_options, group_by_cr, sort_monsters, source_options, CrGroup};

/// The records of one browsing session, sorted once on construction.
/// Views borrow from it; nothing here changes after `new`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    monsters: Vec<Monster>,
}

impl Catalog {
    pub fn new(mut monsters: Vec<Monster>) -> Self {
        sort_monsters(&mut monsters);
        Self { monsters }
    }

    pub fn from_report(report: LoadReport) -> Self {
        Self::new(report.monsters)
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Monsters passing `filters`, already in display order.
    pub fn view(&self, filters: &FilterState) -> Vec<&Monster> {
        filter(&self.monsters, filters)
    }

    pub fn grouped(&self, filters: &FilterState) -> Vec<CrGroup<'_>> {
        group_by_cr(self.view(filters))
    }

    pub fn find_by_file(&self, file: &str) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.file == file)
    }

    /// Legacy lookup by name: display name or record name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Monster> {
        let wanted = name.to_lowercase();
        self.monsters.iter().find(|m| {
            m.display_name.to_lowercase() == wanted
                || m.record.name.as_deref().is_some_and(|n| n.to_lowercase() == wanted)
        })
    }

    pub fn cr_options(&self) -> Vec<String> {
        cr_options(&self.monsters)
    }

    pub fn source_options(&self) -> Vec<String> {
        source_options(&self.monsters)
    }
}
