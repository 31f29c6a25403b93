use rand::{Rng, SeedableRng, rngs::StdRng};

/// A source of die results.
///
/// Implementors must return a value in `1..=sides` for any `sides >= 1`,
/// and must be cheap to call in a tight loop.
pub trait DieSource {
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<S: DieSource + ?Sized> DieSource for &mut S {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

#[derive(Debug)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let rng = StdRng::from_os_rng();
        Roller { rng }
    }

    /// Creates a new `Roller` seeded from this one, so the two streams are independent.
    pub fn fork(&mut self) -> Self {
        let mut seed = [0u8; 32];
        self.rng.fill(&mut seed);
        let rng = StdRng::from_seed(seed);
        Roller { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Roller { rng }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Roller::from_seed(seed),
            None => Roller::new(),
        }
    }

    pub fn d(&mut self, die_size: u32) -> u32 {
        self.rng.random_range(1..=die_size.max(1))
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

impl DieSource for Roller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.d(sides)
    }
}

/// Replays a fixed sequence of die faces, cycling when it runs out.
///
/// Faces are clamped into `1..=sides`, so a script written for d20s stays
/// valid when rolled against smaller dice. An empty script always rolls 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRoller {
    faces: Vec<u32>,
    next: usize,
}

impl ScriptedRoller {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            next: 0,
        }
    }

    /// Always rolls the same face.
    pub fn constant(face: u32) -> Self {
        Self::new([face])
    }

    pub fn rolls_made(&self) -> usize {
        self.next
    }
}

impl DieSource for ScriptedRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = if self.faces.is_empty() {
            1
        } else {
            self.faces[self.next % self.faces.len()]
        };
        self.next += 1;
        face.clamp(1, sides.max(1))
    }
}
