use std::collections::{BTreeMap, BTreeSet, VecDeque};

use strum::{AsRefStr, Display, EnumString};

use crate::{ExerciseID, ReadError};

#[allow(async_fn_in_trait)]
pub trait ExerciseRelationshipRepository {
    async fn read_exercise_relationships(
        &self,
        relationship_type: RelationshipType,
    ) -> Result<Vec<ExerciseRelationship>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRelationship {
    pub exercise_id: ExerciseID,
    pub related_exercise_id: ExerciseID,
    pub relationship_type: RelationshipType,
}

#[derive(AsRefStr, Display, EnumString, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipType {
    /// The strength and velocity data of one exercise may stand in for the other.
    #[default]
    #[strum(serialize = "strength_variant")]
    StrengthVariant,
    #[strum(serialize = "technique_variant")]
    TechniqueVariant,
    #[strum(serialize = "substitute")]
    Substitute,
}

/// Groups of exercises connected by any chain of relationships.
///
/// Edges are undirected. Groups are the connected components of the graph, so two
/// exercises share a group even without a direct relationship between them. Group
/// members are kept in ascending ID order, which makes every fallback that walks a group
/// deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelationshipGraph {
    groups: Vec<BTreeSet<ExerciseID>>,
    group_index: BTreeMap<ExerciseID, usize>,
}

impl RelationshipGraph {
    pub fn new(pairs: impl IntoIterator<Item = (ExerciseID, ExerciseID)>) -> Self {
        let mut adjacency: BTreeMap<ExerciseID, BTreeSet<ExerciseID>> = BTreeMap::new();

        for (a, b) in pairs {
            adjacency.entry(a).or_default().insert(b);
            adjacency.entry(b).or_default().insert(a);
        }

        let mut groups = vec![];
        let mut group_index = BTreeMap::new();

        for start in adjacency.keys() {
            if group_index.contains_key(start) {
                continue;
            }

            let index = groups.len();
            let mut group = BTreeSet::new();
            let mut queue = VecDeque::from([*start]);
            group_index.insert(*start, index);

            while let Some(id) = queue.pop_front() {
                group.insert(id);
                for neighbour in adjacency.get(&id).into_iter().flatten() {
                    if !group_index.contains_key(neighbour) {
                        group_index.insert(*neighbour, index);
                        queue.push_back(*neighbour);
                    }
                }
            }

            groups.push(group);
        }

        Self {
            groups,
            group_index,
        }
    }

    /// Build the graph from the relationships of one type, ignoring all others.
    #[must_use]
    pub fn from_relationships(
        relationships: &[ExerciseRelationship],
        relationship_type: RelationshipType,
    ) -> Self {
        Self::new(
            relationships
                .iter()
                .filter(|r| r.relationship_type == relationship_type)
                .map(|r| (r.exercise_id, r.related_exercise_id)),
        )
    }

    /// All exercises linked to the given exercise, excluding the exercise itself.
    #[must_use]
    pub fn group_of(&self, exercise_id: ExerciseID) -> BTreeSet<ExerciseID> {
        self.linked(exercise_id).collect()
    }

    /// Iterate over the linked exercises in ascending ID order.
    pub fn linked(&self, exercise_id: ExerciseID) -> impl Iterator<Item = ExerciseID> + '_ {
        self.group_index
            .get(&exercise_id)
            .and_then(|index| self.groups.get(*index))
            .into_iter()
            .flatten()
            .copied()
            .filter(move |id| *id != exercise_id)
    }

    #[must_use]
    pub fn are_linked(&self, a: ExerciseID, b: ExerciseID) -> bool {
        a != b
            && matches!(
                (self.group_index.get(&a), self.group_index.get(&b)),
                (Some(x), Some(y)) if x == y
            )
    }

    #[must_use]
    pub fn groups(&self) -> &[BTreeSet<ExerciseID>] {
        &self.groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
