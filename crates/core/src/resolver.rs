use crate::{CardRecord, Catalog, Rect, RngState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("hand size must be at least 1")]
    ZeroHandSize,
    #[error("catalog empty: cannot build a hand")]
    EmptyCatalog,
    #[error("hand shortfall: wanted {wanted} distinct unit groups, catalog has {available}")]
    HandShortfall { wanted: usize, available: usize },
}

/// Cards offered for one round. Every entry belongs to a different unit group.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    cards: Vec<CardRecord>,
    correct_index: usize,
}

impl Hand {
    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct(&self) -> &CardRecord {
        &self.cards[self.correct_index]
    }

    pub fn get(&self, slot: usize) -> Option<&CardRecord> {
        self.cards.get(slot)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemPresentation {
    pub source: CardRecord,
    pub crop: Rect,
}

impl ProblemPresentation {
    fn of(record: &CardRecord) -> Self {
        Self {
            source: record.clone(),
            crop: record.crop,
        }
    }

    /// True when the problem reuses the correct entry's own crop.
    pub fn is_fallback_for(&self, correct: &CardRecord) -> bool {
        self.source.variant_id == correct.variant_id
    }
}

pub fn build_hand(
    catalog: &Catalog,
    hand_size: usize,
    rng: &mut RngState,
) -> Result<Hand, ResolveError> {
    if hand_size == 0 {
        return Err(ResolveError::ZeroHandSize);
    }
    if catalog.is_empty() {
        return Err(ResolveError::EmptyCatalog);
    }

    let mut order: Vec<&CardRecord> = catalog.iter().collect();
    rng.shuffle(&mut order);

    let mut groups = HashSet::with_capacity(hand_size);
    let mut cards = Vec::with_capacity(hand_size);
    for record in order {
        if cards.len() == hand_size {
            break;
        }
        if groups.insert(record.unit_group_id) {
            cards.push(record.clone());
        }
    }
    if cards.len() < hand_size {
        return Err(ResolveError::HandShortfall {
            wanted: hand_size,
            available: cards.len(),
        });
    }

    // The first pick is the answer; deal it into a random slot.
    let mut slots: Vec<usize> = (0..cards.len()).collect();
    rng.shuffle(&mut slots);
    let correct_index = slots
        .iter()
        .position(|&from| from == 0)
        .unwrap_or_default();
    let mut taken: Vec<Option<CardRecord>> = cards.into_iter().map(Some).collect();
    let cards = slots
        .iter()
        .filter_map(|&from| taken[from].take())
        .collect();

    Ok(Hand {
        cards,
        correct_index,
    })
}

pub fn pick_problem(correct: &CardRecord, catalog: &Catalog) -> ProblemPresentation {
    let sibling = catalog
        .records_in_group(correct.unit_group_id)
        .find(|record| record.variant_id != correct.variant_id);
    match sibling {
        Some(record) => ProblemPresentation::of(record),
        None => {
            tracing::debug!(
                variant = %correct.variant_id,
                "no sibling variant, problem reuses the answer's own crop"
            );
            ProblemPresentation::of(correct)
        }
    }
}
