use std::collections::HashMap;
use std::collections::hash_map::{Iter, IterMut, Keys, Values, ValuesMut};

use super::{Site, SiteId};


#[derive(Clone, Debug, Default)]
pub struct IdToSiteMap(HashMap<SiteId, Site>);

impl IdToSiteMap {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[must_use]
    pub fn get(&self, site_id: &SiteId) -> Option<&Site> {
        self.0.get(site_id)
    }

    #[must_use]
    pub fn get_mut(&mut self, site_id: &SiteId) -> Option<&mut Site> {
        self.0.get_mut(site_id)
    }

    #[must_use]
    pub fn contains(&self, site_id: &SiteId) -> bool {
        self.0.contains_key(site_id)
    }

    #[must_use]
    pub fn ids(&self) -> Keys<'_, SiteId, Site> {
        self.0.keys()
    }

    #[must_use]
    pub fn sites(&self) -> Values<'_, SiteId, Site> {
        self.0.values()
    }

    #[must_use]
    pub fn sites_mut(&mut self) -> ValuesMut<'_, SiteId, Site> {
        self.0.values_mut()
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, SiteId, Site> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, SiteId, Site> {
        self.0.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, site: Site) -> Option<Site> {
        self.0.insert(site.id(), site)
    }

    #[must_use]
    pub fn remove(&mut self, site_id: &SiteId) -> Option<Site> {
        self.0.remove(site_id)
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&SiteId, &mut Site) -> bool
    {
        self.0.retain(f);
    }

    /// Identifiers in ascending order. Tier passes and exports iterate
    /// this so repeated runs see the same order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<SiteId> {
        let mut ids: Vec<SiteId> = self.0.keys().copied().collect();
        ids.sort_unstable();

        ids
    }

    /// First identifier above every identifier in the map.
    #[must_use]
    pub fn next_free_id(&self) -> SiteId {
        self.0
            .keys()
            .copied()
            .max()
            .map_or(1, |max_id| max_id + 1)
    }

    #[must_use]
    pub fn active_sites(&self) -> impl Iterator<Item = &Site> {
        self.0.values().filter(|site| site.is_active())
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_sites().count()
    }
}

impl<'a> IntoIterator for &'a IdToSiteMap {
    type Item = (&'a SiteId, &'a Site);
    type IntoIter = Iter<'a, SiteId, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<&[Site]> for IdToSiteMap {
    fn from(sites: &[Site]) -> Self {
        let hash_map = sites
            .iter()
            .map(|site| (site.id(), site.clone()))
            .collect();

        Self(hash_map)
    }
}

impl<const N: usize> From<[Site; N]> for IdToSiteMap {
    fn from(sites: [Site; N]) -> Self {
        let hash_map = sites
            .iter()
            .map(|site| (site.id(), site.clone()))
            .collect();

        Self(hash_map)
    }
}


#[cfg(test)]
mod tests {
    use crate::backend::radio::Technology;
    use crate::backend::site::SiteBuilder;

    use super::*;


    fn some_site(id: SiteId) -> Site {
        SiteBuilder::new()
            .set_technology(Technology::Umts)
            .set_frequency(900)
            .set_active(true)
            .build(id)
            .unwrap_or_else(|error| panic!("{}", error))
    }


    #[test]
    fn sorted_ids_are_ascending() {
        let site_map = IdToSiteMap::from(
            [some_site(9), some_site(2), some_site(5)]
        );

        assert_eq!(vec![2, 5, 9], site_map.sorted_ids());
    }

    #[test]
    fn next_free_id_tops_existing_ids() {
        let site_map = IdToSiteMap::from([some_site(3), some_site(17)]);

        assert_eq!(18, site_map.next_free_id());
        assert_eq!(1, IdToSiteMap::new().next_free_id());
    }

    #[test]
    fn active_sites_skip_deactivated() {
        let mut site_map = IdToSiteMap::from(
            [some_site(1), some_site(2), some_site(3)]
        );

        site_map
            .get_mut(&2)
            .expect("Missing site")
            .set_active(false);

        assert_eq!(2, site_map.active_count());
        assert!(
            site_map
                .active_sites()
                .all(|site| site.id() != 2)
        );
    }
}
