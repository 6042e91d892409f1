use strum_macros::{Display, EnumIter};

/// Loader-length classes, in report order. `Belt` shares the ≤1000 mm
/// length class but is ranked by the belt-fed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Bracket {
    #[strum(to_string = "1 m (belt)")]
    Belt,
    #[strum(to_string = "1 m")]
    UpTo1000,
    #[strum(to_string = "2 m")]
    UpTo2000,
    #[strum(to_string = "4 m")]
    UpTo4000,
    #[strum(to_string = "6 m")]
    UpTo6000,
    #[strum(to_string = "8 m")]
    UpTo8000,
}

impl Bracket {
    pub const ALL: [Bracket; 6] = [
        Bracket::Belt,
        Bracket::UpTo1000,
        Bracket::UpTo2000,
        Bracket::UpTo4000,
        Bracket::UpTo6000,
        Bracket::UpTo8000,
    ];

    /// Longest shell (mm) admitted.
    pub fn max_length(self) -> f64 {
        match self {
            Bracket::Belt | Bracket::UpTo1000 => 1000.0,
            Bracket::UpTo2000 => 2000.0,
            Bracket::UpTo4000 => 4000.0,
            Bracket::UpTo6000 => 6000.0,
            Bracket::UpTo8000 => 8000.0,
        }
    }

    /// Regular bracket for a shell length. `None` above 8000 mm (or NaN).
    pub fn for_length(length: f64) -> Option<Bracket> {
        Bracket::ALL[1..]
            .iter()
            .copied()
            .find(|b| length <= b.max_length())
    }

    #[inline(always)]
    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub score: f64,
    pub item: T,
}

/// Best item per length bracket. A slot only ever holds a strictly positive
/// score, and is replaced only by a strictly greater one, so the first item
/// reaching a given maximum keeps the slot.
#[derive(Debug, Clone)]
pub struct Leaderboard<T> {
    slots: [Option<Entry<T>>; 6],
}

impl<T> Default for Leaderboard<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Leaderboard<T> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn get(&self, bracket: Bracket) -> Option<&Entry<T>> {
        self.slots[bracket.slot()].as_ref()
    }

    #[inline(always)]
    fn current_score(&self, bracket: Bracket) -> f64 {
        self.get(bracket).map_or(0.0, |e| e.score)
    }

    /// Occupied slots in bracket order.
    pub fn iter(&self) -> impl Iterator<Item = (Bracket, &Entry<T>)> {
        Bracket::ALL
            .iter()
            .filter_map(move |&b| self.get(b).map(|e| (b, e)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Folds `other` in slot by slot, in bracket order, with the same strict
    /// comparison as `offer`. Ties keep the entry already here.
    pub fn merge(&mut self, other: Leaderboard<T>) {
        for (bracket, incoming) in Bracket::ALL.iter().zip(other.slots) {
            if let Some(entry) = incoming {
                if entry.score > self.current_score(*bracket) {
                    self.slots[bracket.slot()] = Some(entry);
                }
            }
        }
    }
}

impl<T: Clone> Leaderboard<T> {
    /// Offers one evaluated candidate. `belt_score` competes for the belt
    /// slot when the shell is short enough. Returns true if any slot changed.
    pub fn offer(&mut self, length: f64, score: f64, belt_score: f64, item: &T) -> bool {
        let Some(bracket) = Bracket::for_length(length) else {
            return false;
        };

        let mut changed = self.offer_slot(bracket, score, item);
        if bracket == Bracket::UpTo1000 {
            changed |= self.offer_slot(Bracket::Belt, belt_score, item);
        }
        changed
    }

    fn offer_slot(&mut self, bracket: Bracket, score: f64, item: &T) -> bool {
        if score > self.current_score(bracket) {
            self.slots[bracket.slot()] = Some(Entry {
                score,
                item: item.clone(),
            });
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn all_matches_declaration_order() {
        let declared: Vec<Bracket> = Bracket::iter().collect();
        assert_eq!(declared, Bracket::ALL.to_vec());
    }

    #[test]
    fn bracket_boundaries_are_inclusive() {
        assert_eq!(Bracket::for_length(1000.0), Some(Bracket::UpTo1000));
        assert_eq!(Bracket::for_length(1000.01), Some(Bracket::UpTo2000));
        assert_eq!(Bracket::for_length(8000.0), Some(Bracket::UpTo8000));
        assert_eq!(Bracket::for_length(8000.5), None);
        assert_eq!(Bracket::for_length(f64::NAN), None);
    }
}
