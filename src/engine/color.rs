use crate::models::ExpenseCategory;

/// Colors tried, in order, for new categories before falling back to cycling.
const PALETTE: [&str; 12] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#8AC926", "#1982C4",
    "#E76F51", "#2A9D8F", "#F4A261", "#6A4C93",
];

/// Picks a color for a category that is about to be added.
pub(crate) trait ColorAssigner {
    fn assign(&mut self, name: &str, existing: &[ExpenseCategory]) -> String;
}

fn is_taken(color: &str, existing: &[ExpenseCategory]) -> bool {
    existing.iter().any(|c| c.color.eq_ignore_ascii_case(color))
}

/// First palette color nobody uses yet; once all are taken, cycle the palette.
#[derive(Debug, Default)]
pub(crate) struct PaletteColors {
    cursor: usize,
}

impl ColorAssigner for PaletteColors {
    fn assign(&mut self, _name: &str, existing: &[ExpenseCategory]) -> String {
        if let Some(free) = PALETTE.iter().find(|c| !is_taken(c, existing)) {
            return (*free).to_string();
        }
        let color = PALETTE[self.cursor % PALETTE.len()];
        self.cursor += 1;
        color.to_string()
    }
}

/// Scattered `#RRGGBB` colors hashed from a seed, the name and a counter.
/// Collisions are possible; a few rehashes are tried before giving up.
#[derive(Debug)]
pub(crate) struct HashedColors {
    seed: u64,
    counter: u64,
}

impl HashedColors {
    pub(crate) fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    pub(crate) fn from_clock() -> Self {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::new(nanos.unsigned_abs())
    }

    fn next_hex(&mut self, name: &str) -> String {
        self.counter += 1;
        let input = format!("{}|{}|{name}", self.seed, self.counter);
        let rgb = fnv1a(input.as_bytes()) & 0x00FF_FFFF;
        format!("#{rgb:06X}")
    }
}

impl ColorAssigner for HashedColors {
    fn assign(&mut self, name: &str, existing: &[ExpenseCategory]) -> String {
        let mut color = self.next_hex(name);
        for _ in 0..4 {
            if !is_taken(&color, existing) {
                break;
            }
            color = self.next_hex(name);
        }
        color
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
