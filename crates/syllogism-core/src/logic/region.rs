use crate::model::term::Term;
use core::fmt;

/// Bits of the full term universe `{A, B, C}`.
const UNIVERSE: u8 = 0b111;

/// A Venn-diagram cell: a non-empty subset of the three terms.
///
/// Stored as a term bitmask in `1..=7`, so equality and ordering are
/// structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Region(u8);

impl Region {
    /// All seven regions, in ascending bitmask order.
    pub const ALL: [Region; 7] = [
        Region(1),
        Region(2),
        Region(3),
        Region(4),
        Region(5),
        Region(6),
        Region(7),
    ];

    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits == 0 || bits > UNIVERSE {
            None
        } else {
            Some(Self(bits))
        }
    }

    /// Region covering exactly `terms`; `None` for an empty slice.
    pub fn from_terms(terms: &[Term]) -> Option<Self> {
        Self::from_bits(terms.iter().fold(0, |acc, term| acc | term.bit()))
    }

    pub const fn single(term: Term) -> Self {
        Self(term.bit())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, term: Term) -> bool {
        self.0 & term.bit() != 0
    }

    pub const fn with(self, term: Term) -> Self {
        Self(self.0 | term.bit())
    }

    pub fn terms(self) -> impl Iterator<Item = Term> {
        Term::ALL.into_iter().filter(move |term| self.contains(*term))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in self.terms() {
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// A set of regions, one bit per region (bit `r` for the region with bits `r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RegionSet(u8);

impl RegionSet {
    pub const EMPTY: RegionSet = RegionSet(0);
    pub const FULL: RegionSet = RegionSet(0b1111_1110);

    pub fn from_regions<I>(regions: I) -> Self
    where
        I: IntoIterator<Item = Region>,
    {
        regions.into_iter().fold(Self::EMPTY, |set, region| set.with(region))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with(self, region: Region) -> Self {
        Self(self.0 | (1 << region.0))
    }

    pub fn insert(&mut self, region: Region) {
        *self = self.with(region);
    }

    pub const fn contains(self, region: Region) -> bool {
        self.0 & (1 << region.0) != 0
    }

    pub const fn union(self, other: RegionSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: RegionSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Regions in ascending order.
    pub fn iter(self) -> impl Iterator<Item = Region> {
        Region::ALL.into_iter().filter(move |region| self.contains(*region))
    }

    /// Every subset of this set, starting with the set itself and ending
    /// with the empty set.
    pub fn subsets(self) -> impl Iterator<Item = RegionSet> {
        let mask = self.0;
        let mut next = Some(mask);
        std::iter::from_fn(move || {
            let current = next?;
            next = if current == 0 {
                None
            } else {
                Some((current - 1) & mask)
            };
            Some(RegionSet(current))
        })
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<T: IntoIterator<Item = Region>>(iter: T) -> Self {
        Self::from_regions(iter)
    }
}

impl fmt::Display for RegionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, region) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{region}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_seven_regions_exist() {
        assert_eq!(Region::ALL.len(), 7);
        assert_eq!(Region::from_bits(0), None);
        assert_eq!(Region::from_bits(8), None);
        assert_eq!(RegionSet::from_regions(Region::ALL), RegionSet::FULL);
    }

    #[test]
    fn regions_are_canonical_regardless_of_term_order() {
        let ab = Region::from_terms(&[Term::B, Term::A, Term::B]).unwrap();
        assert_eq!(ab, Region::from_terms(&[Term::A, Term::B]).unwrap());
        assert_eq!(ab.to_string(), "AB");
        assert!(ab.contains(Term::A));
        assert!(!ab.contains(Term::C));
        assert_eq!(ab.with(Term::C).to_string(), "ABC");
        assert_eq!(Region::from_terms(&[]), None);
    }

    #[test]
    fn set_operations() {
        let a = Region::single(Term::A);
        let c = Region::single(Term::C);
        let ac = a.with(Term::C);
        let set = RegionSet::from_regions([a, ac]);
        assert!(set.contains(a));
        assert!(!set.contains(c));
        assert_eq!(set.len(), 2);
        assert_eq!(set.difference(RegionSet::EMPTY.with(a)).len(), 1);
        assert_eq!(set.union(RegionSet::EMPTY.with(c)).to_string(), "{A,C,AC}");
    }

    #[test]
    fn subsets_cover_the_power_set_once() {
        let set: RegionSet = [Region::ALL[0], Region::ALL[3], Region::ALL[6]]
            .into_iter()
            .collect();
        let subsets: Vec<RegionSet> = set.subsets().collect();
        assert_eq!(subsets.len(), 8);
        assert_eq!(subsets.first(), Some(&set));
        assert_eq!(subsets.last(), Some(&RegionSet::EMPTY));
        let mut dedup = subsets.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 8);
        assert_eq!(RegionSet::EMPTY.subsets().count(), 1);
    }
}
