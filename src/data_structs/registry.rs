use anyhow::anyhow;
use hashbrown::HashMap;
use indexmap::IndexSet;
use log::warn;

use crate::data_structs::typedef::AnnotId;

/// The ids currently tagged with a selector, in tagging order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    selector: String,
    ids:      Vec<AnnotId>,
}

impl Selection {
    pub fn new<S: Into<String>>(
        selector: S,
        ids: Vec<AnnotId>,
    ) -> Self {
        Self {
            selector: selector.into(),
            ids,
        }
    }

    pub fn selector(&self) -> &str { &self.selector }

    pub fn ids(&self) -> &[AnnotId] { &self.ids }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotId> { self.ids.iter() }
}

/// Maps annotation ids to payloads, and groups ids under string selectors.
///
/// A component keeps one registry per drawn layer; zoom behaviors look up
/// the elements they act on through [`IdRegistry::select`].
#[derive(Debug, Clone)]
pub struct IdRegistry<T> {
    entries:   HashMap<AnnotId, T>,
    selectors: HashMap<String, IndexSet<AnnotId>>,
}

impl<T> Default for IdRegistry<T> {
    fn default() -> Self {
        Self {
            entries:   HashMap::new(),
            selectors: HashMap::new(),
        }
    }
}

impl<T> IdRegistry<T> {
    pub fn new() -> Self { Self::default() }

    /// Inserts a payload, returning the previous one for the same id.
    pub fn insert<I: Into<AnnotId>>(
        &mut self,
        id: I,
        value: T,
    ) -> Option<T> {
        let id = id.into();
        let old = self.entries.insert(id.clone(), value);
        if old.is_some() {
            warn!("Replacing registry entry for id {}", id);
        }
        old
    }

    /// Tags an id with a selector. Unknown ids are rejected.
    pub fn tag<S: Into<String>>(
        &mut self,
        selector: S,
        id: &AnnotId,
    ) -> anyhow::Result<()> {
        if !self.entries.contains_key(id) {
            return Err(anyhow!("Id {} is not registered", id));
        }
        self.selectors
            .entry(selector.into())
            .or_default()
            .insert(id.clone());
        Ok(())
    }

    pub fn get(
        &self,
        id: &AnnotId,
    ) -> anyhow::Result<&T> {
        self.entries
            .get(id)
            .ok_or_else(|| anyhow!("Id {} is not registered", id))
    }

    pub fn get_mut(
        &mut self,
        id: &AnnotId,
    ) -> anyhow::Result<&mut T> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| anyhow!("Id {} is not registered", id))
    }

    pub fn contains(
        &self,
        id: &AnnotId,
    ) -> bool {
        self.entries.contains_key(id)
    }

    /// Removes an entry together with all of its selector tags.
    pub fn remove(
        &mut self,
        id: &AnnotId,
    ) -> Option<T> {
        let removed = self.entries.remove(id)?;
        for ids in self.selectors.values_mut() {
            ids.shift_remove(id);
        }
        self.selectors.retain(|_, ids| !ids.is_empty());
        Some(removed)
    }

    /// Returns the ids tagged with `selector`. An unknown selector yields
    /// an empty selection.
    pub fn select(
        &self,
        selector: &str,
    ) -> Selection {
        let ids = self
            .selectors
            .get(selector)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();
        Selection::new(selector, ids)
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selectors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnnotId, &T)> { self.entries.iter() }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selectors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> IdRegistry<u32> {
        let mut reg = IdRegistry::new();
        reg.insert("a", 1);
        reg.insert("b", 2);
        reg.insert("c", 3);
        reg
    }

    #[test]
    fn test_get_unknown_id() {
        let reg = registry();
        assert_eq!(*reg.get(&"a".into()).unwrap(), 1);
        assert!(reg.get(&"zzz".into()).is_err());
    }

    #[test]
    fn test_select_keeps_tag_order() {
        let mut reg = registry();
        reg.tag("rect", &"c".into()).unwrap();
        reg.tag("rect", &"a".into()).unwrap();
        reg.tag("rect", &"c".into()).unwrap();

        let sel = reg.select("rect");
        assert_eq!(sel.selector(), "rect");
        let ids: Vec<&str> = sel.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert!(reg.select("text").is_empty());
    }

    #[test]
    fn test_tag_unknown_id() {
        let mut reg = registry();
        assert!(reg.tag("rect", &"missing".into()).is_err());
    }

    #[test]
    fn test_remove_untags() {
        let mut reg = registry();
        reg.tag("rect", &"a".into()).unwrap();
        assert_eq!(reg.remove(&"a".into()), Some(1));
        assert!(reg.select("rect").is_empty());
        assert_eq!(reg.selectors().count(), 0);
        assert_eq!(reg.len(), 2);
    }
}
