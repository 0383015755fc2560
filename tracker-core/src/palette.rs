use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorPair {
    pub gradient: [&'static str; 2],
    pub font: &'static str,
    pub darker: &'static str,
}

impl ColorPair {
    pub fn background(&self) -> String {
        format!("linear-gradient(to right, {}, {})", self.gradient[0], self.gradient[1])
    }
}

pub const PALETTE: [ColorPair; 5] = [
    ColorPair { gradient: ["#FF6F61", "#D65A4F"], font: "#ffffff", darker: "#D65A4F" },
    ColorPair { gradient: ["#4CAF50", "#388E3C"], font: "#ffffff", darker: "#388E3C" },
    ColorPair { gradient: ["#2196F3", "#1976D2"], font: "#ffffff", darker: "#1976D2" },
    ColorPair { gradient: ["#795548", "#5D4037"], font: "#ffffff", darker: "#5D4037" },
    ColorPair { gradient: ["#9C27B0", "#7B1FA2"], font: "#ffffff", darker: "#7B1FA2" },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorKey {
    Tag(u32),
    Folder(u32),
}

/// Source of palette indices; must return a value below `bound`.
pub trait IndexSource {
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Hands out palette entries, one per entity for the life of the page, never
/// the same entry twice in a row.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    assigned: HashMap<ColorKey, usize>,
    last: Option<usize>,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, key: ColorKey, source: &mut impl IndexSource) -> ColorPair {
        if let Some(idx) = self.assigned.get(&key) {
            return PALETTE[*idx];
        }
        let idx = self.pick(source);
        self.assigned.insert(key, idx);
        PALETTE[idx]
    }

    fn pick(&mut self, source: &mut impl IndexSource) -> usize {
        // Draw from the palette minus the previous entry so a repeat is impossible
        // regardless of what the source returns.
        let idx = match self.last {
            Some(last) => {
                let offset = source.next_index(PALETTE.len() - 1) % (PALETTE.len() - 1);
                if offset >= last {
                    offset + 1
                } else {
                    offset
                }
            }
            None => source.next_index(PALETTE.len()) % PALETTE.len(),
        };
        self.last = Some(idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(Vec<usize>);

    impl IndexSource for Scripted {
        fn next_index(&mut self, _bound: usize) -> usize {
            if self.0.is_empty() {
                0
            } else {
                self.0.remove(0)
            }
        }
    }

    #[test]
    fn memoised_per_entity() {
        let mut assigner = ColorAssigner::new();
        let mut src = Scripted(vec![2, 0, 1]);
        let first = assigner.color_for(ColorKey::Tag(1), &mut src);
        assert_eq!(assigner.color_for(ColorKey::Tag(1), &mut src), first);
        assert_eq!(src.0.len(), 2);
    }

    #[test]
    fn tags_and_folders_are_separate_keys() {
        let mut assigner = ColorAssigner::new();
        let mut src = Scripted(vec![0, 0]);
        let tag = assigner.color_for(ColorKey::Tag(1), &mut src);
        let folder = assigner.color_for(ColorKey::Folder(1), &mut src);
        assert_ne!(tag, folder);
    }

    #[test]
    fn never_repeats_back_to_back() {
        let mut assigner = ColorAssigner::new();
        let mut src = Scripted(vec![3; 50]);
        let mut previous = None;
        for id in 0..50 {
            let c = assigner.color_for(ColorKey::Tag(id), &mut src);
            assert_ne!(Some(c), previous);
            previous = Some(c);
        }
    }
}
