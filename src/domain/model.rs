use serde::{Deserialize, Serialize};

/// Role of a drawn number within one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Main,
    Bonus,
}

/// One drawn number together with the categorical attributes shown next to
/// it on the results page. The attributes are positional in the source
/// markup: either all eight were collected or the item was dropped during
/// extraction, so `Some`/`None` always flips as a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub number: String,
    pub level: Level,
    pub zodiac: Option<String>,
    pub five_elem: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub sidedness: Option<String>,
    pub sidedness_merge: Option<String>,
    pub sidedness_count: Option<String>,
    pub fauna: Option<String>,
}

/// Ordered extraction result: one `(label, entries)` pair per located result
/// block, in document order. Transient; consumed by the aggregator.
pub type PhaseEntries = Vec<(String, Vec<Entry>)>;

/// One completed draw. `main` keeps the source presentation order; `bonus`
/// is empty when the block never flipped to the bonus level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase: String,
    pub main: Vec<String>,
    pub bonus: String,
}

/// Hot/cold ranking over the trailing window. `taken` is the number of
/// phases actually analyzed (may be fewer than the configured window).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotCold {
    pub taken: usize,
    pub hot: Vec<(u32, usize)>,
    pub cold: Vec<(u32, usize)>,
}

/// Product of the transform stage, shaped for the load stage.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub phases: Vec<Phase>,
    pub json_output: String,
    pub flatten_output: String,
    pub report: HotCold,
}

/// Supported source-page markups. Selected by configuration and dispatched
/// in `core::markup`; add a variant per new results site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupFormat {
    #[default]
    Gx,
}
