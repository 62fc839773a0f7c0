//! Named maze sizes offered by the start menu.

use derive_more::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Side length of the generated grid.
    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_grow_with_difficulty() {
        let sizes: Vec<usize> = Difficulty::ALL.iter().map(|d| d.grid_size()).collect();
        assert_eq!(sizes, vec![10, 15, 20]);
    }

    #[test]
    fn labels_are_variant_names() {
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }
}
