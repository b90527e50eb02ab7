use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use super::info::MappingInfo;
use crate::error::RegistrationError;

/// One registered mapping and its handler.
#[derive(Debug, Clone)]
pub struct Registration<H> {
    mapping: MappingInfo,
    handler: H,
    direct_paths: Vec<String>,
}

impl<H> Registration<H> {
    #[must_use]
    pub fn mapping(&self) -> &MappingInfo {
        &self.mapping
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Literal paths this registration is indexed under.
    #[must_use]
    pub fn direct_paths(&self) -> &[String] {
        &self.direct_paths
    }
}

/// Owns every registration and the lookup indexes built from them.
///
/// Registrations are kept in registration order. Mutation is not
/// synchronised here; [`crate::Router`] wraps the registry in a lock.
#[derive(Debug)]
pub struct MappingRegistry<H> {
    registrations: BTreeMap<u64, Registration<H>>,
    keys: HashMap<MappingInfo, u64>,
    path_lookup: HashMap<String, Vec<u64>>,
    name_lookup: HashMap<String, Vec<u64>>,
    next_id: u64,
}

impl<H> Default for MappingRegistry<H> {
    fn default() -> Self {
        Self {
            registrations: BTreeMap::new(),
            keys: HashMap::new(),
            path_lookup: HashMap::new(),
            name_lookup: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<H> MappingRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `mapping → handler`. Fails if an equal mapping is already
    /// registered, whatever its handler.
    pub fn register(&mut self, mapping: MappingInfo, handler: H) -> Result<(), RegistrationError> {
        if self.keys.contains_key(&mapping) {
            return Err(RegistrationError::DuplicateMapping {
                mapping: mapping.to_string(),
            });
        }

        let id = self.next_id;
        self.next_id += 1;

        let direct_paths: Vec<String> = mapping
            .patterns()
            .direct_paths()
            .into_iter()
            .map(str::to_string)
            .collect();
        for path in &direct_paths {
            self.path_lookup.entry(path.clone()).or_default().push(id);
        }
        if let Some(name) = mapping.name() {
            self.name_lookup.entry(name.to_string()).or_default().push(id);
        }

        info!(
            mapping = %mapping,
            direct_paths = ?direct_paths,
            "Mapped handler"
        );

        self.keys.insert(mapping.clone(), id);
        self.registrations.insert(
            id,
            Registration {
                mapping,
                handler,
                direct_paths,
            },
        );
        Ok(())
    }

    /// Remove a mapping and its index entries. Absent mappings are ignored.
    pub fn unregister(&mut self, mapping: &MappingInfo) -> Option<H> {
        let Some(id) = self.keys.remove(mapping) else {
            debug!(mapping = %mapping, "Unregister ignored, mapping not registered");
            return None;
        };
        let registration = self.registrations.remove(&id)?;

        for path in &registration.direct_paths {
            remove_id(&mut self.path_lookup, path, id);
        }
        if let Some(name) = registration.mapping.name() {
            remove_id(&mut self.name_lookup, name, id);
        }

        info!(mapping = %registration.mapping, "Unmapped handler");
        Some(registration.handler)
    }

    /// Registration for an exact mapping key.
    #[must_use]
    pub fn get(&self, mapping: &MappingInfo) -> Option<&Registration<H>> {
        self.keys
            .get(mapping)
            .and_then(|id| self.registrations.get(id))
    }

    /// Every registration, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration<H>> {
        self.registrations.values()
    }

    /// Registrations indexed under a literal lookup path.
    pub fn mappings_by_direct_path<'a>(
        &'a self,
        path: &str,
    ) -> impl Iterator<Item = &'a Registration<H>> + 'a {
        self.lookup(&self.path_lookup, path)
    }

    /// Registrations carrying the given name.
    pub fn mappings_by_name<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a Registration<H>> + 'a {
        self.lookup(&self.name_lookup, name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn lookup<'a>(
        &'a self,
        index: &'a HashMap<String, Vec<u64>>,
        key: &str,
    ) -> impl Iterator<Item = &'a Registration<H>> + 'a {
        index
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(|id| self.registrations.get(id))
    }
}

impl<H: Clone> MappingRegistry<H> {
    /// Snapshot of every `(mapping, handler)` pair, in registration order.
    #[must_use]
    pub fn mappings(&self) -> Vec<(MappingInfo, H)> {
        self.registrations
            .values()
            .map(|r| (r.mapping.clone(), r.handler.clone()))
            .collect()
    }
}

fn remove_id(index: &mut HashMap<String, Vec<u64>>, key: &str, id: u64) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|&other| other != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}
