// Named palettes a new main spark picks its colour from.

use crate::color::encode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSet {
    pub name: String,
    pub colors: Vec<u32>,
}

impl ColorSet {
    pub fn new(name: impl Into<String>, colors: Vec<u32>) -> Self {
        Self { name: name.into(), colors }
    }

    /// Pinks, orchid, indigo, khaki, green, gold.
    pub fn unicorn() -> Self {
        Self::new(
            "Unicorn colors",
            vec![
                encode(255, 192, 203),
                encode(255, 105, 180),
                encode(218, 112, 214),
                encode(75, 10, 130),
                encode(240, 230, 140),
                encode(10, 128, 10),
                encode(255, 235, 10),
            ],
        )
    }

    pub fn standard() -> Self {
        Self::new(
            "Standard RGB+CMY+W",
            vec![
                encode(0xFF, 0, 0),
                encode(0, 0xFF, 0),
                encode(0, 0, 0xFF),
                encode(0xFF, 0xFF, 0),
                encode(0xFF, 0, 0xFF),
                encode(0, 0xFF, 0xFF),
                encode(0xFF, 0xFF, 0xFF),
            ],
        )
    }

    /// Every palette the app offers, default first.
    pub fn builtin() -> Vec<ColorSet> {
        vec![Self::unicorn(), Self::standard()]
    }
}

impl std::fmt::Display for ColorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ColorSet: {}", self.name)
    }
}
