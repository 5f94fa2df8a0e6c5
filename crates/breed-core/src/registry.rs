//! Entity registry and egg-group index.

use crate::error::{BreedError, Result};
use crate::records::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Dense index of an entity inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pokemon and the egg groups it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Name as written in the input.
    pub name: String,
    /// Case-normalized identity, see [`canonical_name`].
    pub key: String,
    /// Egg groups, deduplicated, in first-seen order.
    pub groups: Vec<String>,
}

/// What to do when two records share a canonical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`BreedError::DuplicateEntity`] unless both records carry the same groups.
    #[default]
    Reject,
    /// The later record replaces the earlier one's groups.
    LastWriteWins,
}

/// Normalize a name to its canonical case: first character upper-cased, the
/// rest lower-cased (`"eEVEE"` -> `"Eevee"`).
pub fn canonical_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// All known entities plus the group -> entities index derived from them.
///
/// Immutable once built; lookups by name are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: Vec<Entity>,
    by_key: HashMap<String, EntityId>,
    pub(crate) group_index: BTreeMap<String, Vec<EntityId>>,
}

impl Registry {
    /// Build a registry from parsed records. Errors name the record's source line.
    pub fn from_records(
        records: impl IntoIterator<Item = Record>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        Self::build(
            records.into_iter().map(|r| (r.line, r.name, r.groups)),
            policy,
        )
    }

    /// Build a registry from `(name, groups)` pairs. Errors name the pair's
    /// 1-based position.
    pub fn from_pairs<N, G, S>(
        pairs: impl IntoIterator<Item = (N, G)>,
        policy: DuplicatePolicy,
    ) -> Result<Self>
    where
        N: Into<String>,
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(
            pairs
                .into_iter()
                .enumerate()
                .map(|(idx, (name, groups))| (idx + 1, name.into(), groups)),
            policy,
        )
    }

    fn build<G, S>(
        entries: impl IntoIterator<Item = (usize, String, G)>,
        policy: DuplicatePolicy,
    ) -> Result<Self>
    where
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for (line, name, groups) in entries {
            registry.insert(line, name, groups, policy)?;
        }
        registry.rebuild_group_index();
        tracing::debug!(
            "registry built: {} pokemon, {} egg groups",
            registry.entities.len(),
            registry.group_index.len()
        );
        Ok(registry)
    }

    fn insert<G, S>(
        &mut self,
        line: usize,
        name: String,
        groups: G,
        policy: DuplicatePolicy,
    ) -> Result<()>
    where
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = canonical_name(&name);
        if key.is_empty() {
            return Err(BreedError::MalformedRecord {
                line,
                reason: "empty pokemon name".to_string(),
            });
        }
        let mut deduped: Vec<String> = Vec::new();
        for group in groups {
            let group = group.into();
            if !deduped.contains(&group) {
                deduped.push(group);
            }
        }
        if deduped.is_empty() {
            return Err(BreedError::MalformedRecord {
                line,
                reason: format!("{name} has no egg groups"),
            });
        }

        if let Some(&id) = self.by_key.get(&key) {
            let existing = &mut self.entities[id.index()];
            if same_groups(&existing.groups, &deduped) {
                return Ok(());
            }
            return match policy {
                DuplicatePolicy::Reject => Err(BreedError::DuplicateEntity {
                    name: key,
                    line,
                    existing: existing.groups.clone(),
                    conflicting: deduped,
                }),
                DuplicatePolicy::LastWriteWins => {
                    tracing::warn!(
                        "{} listed again on line {}; replacing egg groups {:?} with {:?}",
                        key,
                        line,
                        existing.groups,
                        deduped
                    );
                    existing.name = name;
                    existing.groups = deduped;
                    Ok(())
                }
            };
        }

        let id = EntityId(self.entities.len());
        self.entities.push(Entity {
            name,
            key: key.clone(),
            groups: deduped,
        });
        self.by_key.insert(key, id);
        Ok(())
    }

    /// Recompute the group index. Runs once after all inserts, since
    /// last-write-wins may have replaced earlier group lists.
    fn rebuild_group_index(&mut self) {
        self.group_index.clear();
        for (idx, entity) in self.entities.iter().enumerate() {
            for group in &entity.groups {
                self.group_index
                    .entry(group.clone())
                    .or_default()
                    .push(EntityId(idx));
            }
        }
    }

    /// Resolve a user-supplied name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_key.get(&canonical_name(name)).copied()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        id.index() < self.entities.len()
    }

    /// Display name for an id, or `"?"` when the id is out of range.
    pub fn name(&self, id: EntityId) -> &str {
        self.entity(id).map_or("?", |e| e.name.as_str())
    }

    /// Iterate all entities with their ids, in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (EntityId(idx), e))
    }

    pub fn group_index(&self) -> &BTreeMap<String, Vec<EntityId>> {
        &self.group_index
    }

    /// Entities carrying `group`, or an empty slice for unknown groups.
    pub fn group_members(&self, group: &str) -> &[EntityId] {
        self.group_index.get(group).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Known names most similar to `name`, best match first.
    pub fn suggest(&self, name: &str, limit: usize) -> Vec<&str> {
        let wanted = canonical_name(name);
        let mut scored: Vec<(f64, &str)> = self
            .entities
            .iter()
            .map(|e| (strsim::normalized_levenshtein(&wanted, &e.key), e.name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.into_iter().take(limit).map(|(_, n)| n).collect()
    }
}

const SUGGESTION_THRESHOLD: f64 = 0.6;

fn same_groups(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|g| b.contains(g))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![
            ("Eevee", vec!["Field"]),
            ("Charmander", vec!["Monster", "Dragon"]),
            ("Rhyhorn", vec!["Monster", "Field"]),
        ]
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("eevee"), "Eevee");
        assert_eq!(canonical_name("EEVEE"), "Eevee");
        assert_eq!(canonical_name(" mr. MIME "), "Mr. mime");
        assert_eq!(canonical_name(""), "");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = Registry::from_pairs(pairs(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(registry.lookup("eevee"), Some(EntityId(0)));
        assert_eq!(registry.lookup("EEVEE"), Some(EntityId(0)));
        assert_eq!(registry.lookup("Pikachu"), None);
        assert_eq!(registry.name(EntityId(0)), "Eevee");
    }

    #[test]
    fn test_group_index() {
        let registry = Registry::from_pairs(pairs(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(registry.group_members("Field"), &[EntityId(0), EntityId(2)]);
        assert_eq!(registry.group_members("Monster"), &[EntityId(1), EntityId(2)]);
        assert_eq!(registry.group_members("Dragon"), &[EntityId(1)]);
        assert!(registry.group_members("Bug").is_empty());
        assert_eq!(registry.group_index().len(), 3);
    }

    #[test]
    fn test_duplicate_groups_within_record_collapse() {
        let registry =
            Registry::from_pairs(vec![("Eevee", vec!["Field", "Field"])], DuplicatePolicy::Reject)
                .unwrap();
        let eevee = registry.entity(EntityId(0)).unwrap();
        assert_eq!(eevee.groups, vec!["Field"]);
        assert_eq!(registry.group_members("Field").len(), 1);
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let err = Registry::from_pairs(
            vec![("Eevee", vec!["Field"]), ("EEVEE", vec!["Fairy"])],
            DuplicatePolicy::Reject,
        )
        .unwrap_err();
        match err {
            BreedError::DuplicateEntity {
                name,
                line,
                existing,
                conflicting,
            } => {
                assert_eq!(name, "Eevee");
                assert_eq!(line, 2);
                assert_eq!(existing, vec!["Field"]);
                assert_eq!(conflicting, vec!["Fairy"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_identical_duplicate_accepted() {
        let registry = Registry::from_pairs(
            vec![("Eevee", vec!["Field"]), ("eevee", vec!["Field"])],
            DuplicatePolicy::Reject,
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_last_write_wins_replaces_groups() {
        let registry = Registry::from_pairs(
            vec![
                ("Eevee", vec!["Field"]),
                ("Rhyhorn", vec!["Field"]),
                ("Eevee", vec!["Fairy"]),
            ],
            DuplicatePolicy::LastWriteWins,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.group_members("Field"), &[EntityId(1)]);
        assert_eq!(registry.group_members("Fairy"), &[EntityId(0)]);
    }

    #[test]
    fn test_blank_name_rejected() {
        for blank in ["", "   "] {
            let err = Registry::from_pairs(
                vec![("Eevee", vec!["Field"]), (blank, vec!["Field"])],
                DuplicatePolicy::Reject,
            )
            .unwrap_err();
            match err {
                BreedError::MalformedRecord { line, reason } => {
                    assert_eq!(line, 2);
                    assert!(reason.contains("empty pokemon name"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_pokemon_without_groups_rejected() {
        let err = Registry::from_pairs(
            vec![("Eevee", Vec::<&str>::new())],
            DuplicatePolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, BreedError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_from_records_names_source_line() {
        let records = crate::records::parse_records(
            "EeveeEevee\tField\n\nRhyhornRhyhorn\tMonster\neeveeeevee\tFairy\n",
            crate::records::NameField::Doubled,
        )
        .unwrap();
        let err = Registry::from_records(records, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, BreedError::DuplicateEntity { line: 4, .. }));
        assert!(err.to_string().contains("on line 4"));
    }

    #[test]
    fn test_suggest() {
        let registry = Registry::from_pairs(pairs(), DuplicatePolicy::Reject).unwrap();
        assert_eq!(registry.suggest("eeveee", 3), vec!["Eevee"]);
        assert_eq!(registry.suggest("charmandr", 1), vec!["Charmander"]);
        assert!(registry.suggest("zzzzzz", 3).is_empty());
    }
}
