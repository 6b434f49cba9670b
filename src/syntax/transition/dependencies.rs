use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::FromIterator;

use serde::{Deserialize, Serialize};

use super::{Error, GoldDefect, Index};

/// A mapping from dependent token index to head token index.
///
/// Tokens without an entry have no head (yet, or at all for roots).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dependencies {
    heads: BTreeMap<Index, Index>,
}

impl Dependencies {
    pub fn new() -> Self {
        Dependencies {
            heads: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn head(&self, dependent: Index) -> Option<Index> {
        self.heads.get(&dependent).cloned()
    }

    #[inline]
    pub fn has_head(&self, dependent: Index) -> bool {
        self.heads.contains_key(&dependent)
    }

    /// Attaches `dependent` to `head`. A token is assigned a head at most once.
    pub fn add_arc(&mut self, dependent: Index, head: Index) -> Result<(), Error> {
        match self.heads.entry(dependent) {
            btree_map::Entry::Occupied(_) => Err(Error::DuplicateHead {
                dependent: dependent,
            }),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(head);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn iter(&self) -> Iter {
        Iter {
            inner: self.heads.iter(),
        }
    }

    /// Checks that every arc stays inside a sentence of `num_tokens` tokens,
    /// that no token heads itself, and that no head chain loops.
    pub fn validate(&self, num_tokens: usize) -> Result<(), Error> {
        let n = num_tokens as u64;
        for (&dependent, &head) in &self.heads {
            let defect = if dependent as u64 >= n {
                Some(GoldDefect::DependentOutOfRange)
            } else if head as u64 >= n {
                Some(GoldDefect::HeadOutOfRange(head))
            } else if dependent == head {
                Some(GoldDefect::SelfLoop)
            } else {
                None
            };
            if let Some(defect) = defect {
                return Err(Error::InvalidGoldStructure {
                    dependent: dependent,
                    defect: defect,
                });
            }
        }
        for &dependent in self.heads.keys() {
            // a chain longer than the number of arcs must revisit a token
            let mut current = dependent;
            let mut steps = 0;
            while let Some(head) = self.head(current) {
                steps += 1;
                if head == dependent || steps > self.heads.len() {
                    return Err(Error::InvalidGoldStructure {
                        dependent: dependent,
                        defect: GoldDefect::Cycle,
                    });
                }
                current = head;
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<Index, Index>> for Dependencies {
    fn from(heads: BTreeMap<Index, Index>) -> Self {
        Dependencies { heads: heads }
    }
}

/// Later pairs overwrite earlier ones for the same dependent.
impl FromIterator<(Index, Index)> for Dependencies {
    fn from_iter<I: IntoIterator<Item = (Index, Index)>>(iter: I) -> Self {
        Dependencies {
            heads: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = (Index, Index);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Index, Index>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Index, Index);

    #[inline]
    fn next(&mut self) -> Option<(Index, Index)> {
        self.inner.next().map(|(&dependent, &head)| (dependent, head))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_arc_rejects_second_head() {
        let mut deps = Dependencies::new();
        assert!(deps.add_arc(0, 1).is_ok());
        assert_eq!(deps.add_arc(0, 2), Err(Error::DuplicateHead { dependent: 0 }));
        assert_eq!(deps.head(0), Some(1));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_validate() {
        let deps: Dependencies = vec![(0, 1), (2, 1)].into_iter().collect();
        assert!(deps.validate(3).is_ok());
        assert_eq!(
            deps.validate(2),
            Err(Error::InvalidGoldStructure {
                dependent: 2,
                defect: GoldDefect::DependentOutOfRange,
            })
        );

        let deps: Dependencies = vec![(0, 5)].into_iter().collect();
        assert_eq!(
            deps.validate(3),
            Err(Error::InvalidGoldStructure {
                dependent: 0,
                defect: GoldDefect::HeadOutOfRange(5),
            })
        );

        let deps: Dependencies = vec![(1, 1)].into_iter().collect();
        assert_eq!(
            deps.validate(3),
            Err(Error::InvalidGoldStructure {
                dependent: 1,
                defect: GoldDefect::SelfLoop,
            })
        );

        let deps: Dependencies = vec![(0, 1), (1, 2), (2, 0)].into_iter().collect();
        assert_eq!(
            deps.validate(3),
            Err(Error::InvalidGoldStructure {
                dependent: 0,
                defect: GoldDefect::Cycle,
            })
        );
    }

    #[test]
    fn test_json_keys() {
        let deps: Dependencies = serde_json::from_str(r#"{"0": 1, "2": 1}"#).unwrap();
        assert_eq!(deps.head(0), Some(1));
        assert_eq!(deps.head(2), Some(1));
        assert_eq!(deps.head(1), None);
        assert_eq!(serde_json::to_string(&deps).unwrap(), r#"{"0":1,"2":1}"#);
    }
}
