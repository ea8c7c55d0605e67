use crate::graph::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bijection on the three colors, stored as the images of Red, Green and Blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPermutation([Color; 3]);

impl ColorPermutation {
    pub const ALL: [ColorPermutation; 6] = [
        ColorPermutation([Color::Red, Color::Green, Color::Blue]),
        ColorPermutation([Color::Red, Color::Blue, Color::Green]),
        ColorPermutation([Color::Green, Color::Red, Color::Blue]),
        ColorPermutation([Color::Green, Color::Blue, Color::Red]),
        ColorPermutation([Color::Blue, Color::Red, Color::Green]),
        ColorPermutation([Color::Blue, Color::Green, Color::Red]),
    ];

    pub fn identity() -> Self {
        Self::ALL[0]
    }

    /// Uniform over the six permutations.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn apply(&self, color: Color) -> Color {
        self.0[color.to_u8() as usize]
    }
}
