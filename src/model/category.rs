use serde::Serialize;
use strum::IntoEnumIterator;

/// A competition format with its own statistics page and collection.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Tests,
    Odi,
    T20,
    Ipl,
}

impl Category {
    /// Normalized series name as it appears on the overview page,
    /// e.g. `one_day_internationals`.
    pub fn series_key(self) -> &'static str {
        match self {
            Category::Tests => "tests",
            Category::Odi => "one_day_internationals",
            Category::T20 => "twenty20_internationals",
            Category::Ipl => "indian_premier_league",
        }
    }

    /// Collection the category's stats records are written to.
    pub fn collection(self) -> &'static str {
        match self {
            Category::Tests => "test_match",
            Category::Odi => "odi",
            Category::T20 => "t20",
            Category::Ipl => "ipl",
        }
    }

    /// Path of the stats page relative to the statistics base url.
    pub fn page_path(self) -> &'static str {
        match self {
            Category::Tests => "Players/PlayerOverview.asp?PlayerID=",
            Category::Odi => "Players/PlayerOverview_ODI.asp?PlayerID=",
            Category::T20 => "Players/PlayerOverview_T20.asp?PlayerID=",
            Category::Ipl => "IPL/PlayerOverview.asp?PlayerID=",
        }
    }
}

/// The set of series the overview page is searched for, in match order.
///
/// A series name maps to the first entry whose key it contains.
#[derive(Debug, Clone)]
pub struct SeriesSchema {
    categories: Vec<Category>,
}

impl SeriesSchema {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    /// Resolve a normalized series name (`one_day_internationals`, ...) to its category.
    pub fn resolve(&self, series: &str) -> Option<Category> {
        self.categories
            .iter()
            .copied()
            .find(|c| series.contains(c.series_key()))
    }
}

impl Default for SeriesSchema {
    fn default() -> Self {
        Self::new(Category::iter())
    }
}

/// Matches played per series, as read from a player's overview page.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct SeriesCounts {
    pub tests: u32,
    pub one_day_internationals: u32,
    pub twenty20_internationals: u32,
    pub indian_premier_league: u32,
}

impl SeriesCounts {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Tests => self.tests,
            Category::Odi => self.one_day_internationals,
            Category::T20 => self.twenty20_internationals,
            Category::Ipl => self.indian_premier_league,
        }
    }

    pub fn set(&mut self, category: Category, matches: u32) {
        match category {
            Category::Tests => self.tests = matches,
            Category::Odi => self.one_day_internationals = matches,
            Category::T20 => self.twenty20_internationals = matches,
            Category::Ipl => self.indian_premier_league = matches,
        }
    }

    /// Categories with at least one match, in fixed category order.
    pub fn played(&self) -> impl Iterator<Item = Category> + '_ {
        Category::iter().filter(|c| self.get(*c) > 0)
    }
}
