/// Clamp `year` into the inclusive `bounds`, when there are any.
pub fn clamp_year(year: i64, bounds: Option<(i64, i64)>) -> i64 {
    match bounds {
        Some((min, max)) => year.clamp(min, max.max(min)),
        None => year,
    }
}

const MAX_INPUT_DIGITS: usize = 6;

/// The numeric year input of the sidebar.
///
/// The selected year always lies within the bounds (the release years of the
/// loaded table). Without bounds (no data, or an empty table) it keeps
/// whatever was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelector {
    year: i64,
    bounds: Option<(i64, i64)>,
    input: Option<String>,
}

impl YearSelector {
    pub fn new(default_year: i64, bounds: Option<(i64, i64)>) -> Self {
        Self {
            year: clamp_year(default_year, bounds),
            bounds,
            input: None,
        }
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn bounds(&self) -> Option<(i64, i64)> {
        self.bounds
    }

    /// Replace the bounds (after a reload) and clamp the current year into them.
    pub fn set_bounds(&mut self, bounds: Option<(i64, i64)>) {
        self.bounds = bounds;
        self.year = clamp_year(self.year, bounds);
    }

    /// Select `year`, clamped. Returns whether the selection changed.
    pub fn set(&mut self, year: i64) -> bool {
        let year = clamp_year(year, self.bounds);
        let changed = year != self.year;
        self.year = year;
        changed
    }

    pub fn step(&mut self, delta: i64) -> bool {
        self.set(self.year.saturating_add(delta))
    }

    pub fn first(&mut self) -> bool {
        match self.bounds {
            Some((min, _)) => self.set(min),
            None => false,
        }
    }

    pub fn last(&mut self) -> bool {
        match self.bounds {
            Some((_, max)) => self.set(max),
            None => false,
        }
    }

    /// Digits typed so far, while the user is entering a year
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    /// Append a typed digit; anything else is ignored.
    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let input = self.input.get_or_insert_with(String::new);
        if input.len() < MAX_INPUT_DIGITS {
            input.push(c);
        }
    }

    pub fn pop_digit(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.pop();
            if input.is_empty() {
                self.input = None;
            }
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Apply the typed year (clamped). Returns whether the selection changed.
    pub fn commit_input(&mut self) -> bool {
        match self.input.take().and_then(|s| s.parse::<i64>().ok()) {
            Some(year) => self.set(year),
            None => false,
        }
    }
}
