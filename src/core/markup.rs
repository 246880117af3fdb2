use crate::domain::model::{Entry, Level, MarkupFormat, PhaseEntries};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// Number of categorical attributes every well-formed item carries.
const ATTRIBUTE_COUNT: usize = 8;

/// Separator glyph the page renders between attribute spans.
const SEPARATOR_GLYPH: &str = "/";

const PHASE_HEADER_CLASS: &str = "kj-tit";
const RESULT_BLOCK_CLASS: &str = "kj-box";
const BONUS_MARKER_CLASS: &str = "kj-jia";

// Structural landmarks of the gx results page. A markup change on the source
// site should only require touching these selectors.
static PHASE_HEADER: Lazy<Selector> = Lazy::new(|| Selector::parse("div.kj-tit").unwrap());
static DRAW_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static TERM: Lazy<Selector> = Lazy::new(|| Selector::parse("dt").unwrap());
static DEFINITION: Lazy<Selector> = Lazy::new(|| Selector::parse("dd").unwrap());
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());

static NUMERIC_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Parse a raw results page into an ordered `(phase label, entries)` list.
///
/// Extraction is best-effort: a header without a result block drops that
/// phase, a malformed item drops that item, and a document with no headers
/// yields an empty list. None of these abort the call.
pub fn extract(format: MarkupFormat, document: &str) -> PhaseEntries {
    match format {
        MarkupFormat::Gx => extract_gx(document),
    }
}

fn extract_gx(document: &str) -> PhaseEntries {
    let html = Html::parse_document(document);
    let mut phases: PhaseEntries = Vec::new();

    for header in html.select(&PHASE_HEADER) {
        let label = phase_label(&header);

        let Some(block) = result_block_after(&header) else {
            tracing::debug!("phase {}: no result block after header, dropped", label);
            continue;
        };

        let mut entries = Vec::new();
        let mut level = Level::Main;

        for item in block.select(&DRAW_ITEM) {
            // 加號格只是特別號的分隔標記，本身不是號碼
            if has_class(&item, BONUS_MARKER_CLASS) {
                level = Level::Bonus;
                continue;
            }

            match parse_item(&item, level) {
                Ok(entry) => entries.push(entry),
                Err(reason) => tracing::debug!("phase {}: item skipped ({})", label, reason),
            }
        }

        phases.push((label, entries));
    }

    phases
}

/// Why a single item was dropped. Logged at debug level so one broken cell
/// never aborts the rest of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    MissingTerm,
    MissingDefinition,
    AttributeCount(usize),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTerm => write!(f, "missing or empty number term"),
            SkipReason::MissingDefinition => write!(f, "no attribute definition element"),
            SkipReason::AttributeCount(found) => {
                write!(f, "expected {} attributes, found {}", ATTRIBUTE_COUNT, found)
            }
        }
    }
}

fn parse_item(item: &ElementRef, level: Level) -> Result<Entry, SkipReason> {
    let number = item
        .select(&TERM)
        .next()
        .map(|dt| collapsed_text(&dt))
        .unwrap_or_default();
    if number.is_empty() {
        return Err(SkipReason::MissingTerm);
    }

    let Some(definition) = item.select(&DEFINITION).next() else {
        return Err(SkipReason::MissingDefinition);
    };

    let mut parts: Vec<String> = Vec::new();
    for child in definition.children() {
        if let Some(text) = child.value().as_text() {
            let piece = text.trim();
            if !piece.is_empty() {
                parts.push(piece.to_string());
            }
        } else if let Some(el) = ElementRef::wrap(child) {
            let piece = collapsed_text(&el);
            if !piece.is_empty() && piece != SEPARATOR_GLYPH {
                parts.push(piece);
            }
        }
    }

    // 隱藏的 dd 裝同一個號碼的補充屬性，接在可見屬性後面
    for hidden in item
        .select(&DEFINITION)
        .skip(1)
        .filter(|dd| dd.value().attr("style") == Some("display: none"))
    {
        for span in hidden.select(&SPAN) {
            let piece = collapsed_text(&span);
            if !piece.is_empty() && piece != SEPARATOR_GLYPH {
                parts.push(piece);
            }
        }
    }

    if parts.len() < ATTRIBUTE_COUNT {
        return Err(SkipReason::AttributeCount(parts.len()));
    }

    // Positional assignment. The page lists fauna before the stroke-count
    // parity, so the last two slots are swapped relative to field order.
    Ok(Entry {
        number,
        level,
        zodiac: Some(parts[0].clone()),
        five_elem: Some(parts[1].clone()),
        color: Some(parts[2].clone()),
        size: Some(parts[3].clone()),
        sidedness: Some(parts[4].clone()),
        sidedness_merge: Some(parts[5].clone()),
        fauna: Some(parts[6].clone()),
        sidedness_count: Some(parts[7].clone()),
    })
}

/// Header text is a decorated issue title; three or more embedded numeric
/// runs normalize into a `major/minor/micro` identifier, anything else is
/// kept verbatim.
fn phase_label(header: &ElementRef) -> String {
    let raw = collapsed_text(header);
    let runs: Vec<&str> = NUMERIC_RUNS.find_iter(&raw).map(|m| m.as_str()).collect();
    if runs.len() >= 3 {
        format!("{}/{}/{}", runs[0], runs[1], runs[2])
    } else {
        raw
    }
}

/// The result block is the following sibling `div.kj-box`. Scanning stops at
/// the next phase header so a header with a missing block can never claim a
/// later phase's numbers.
fn result_block_after<'a>(header: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    for sibling in header.next_siblings().filter_map(ElementRef::wrap) {
        if has_class(&sibling, PHASE_HEADER_CLASS) {
            return None;
        }
        if sibling.value().name() == "div" && has_class(&sibling, RESULT_BLOCK_CLASS) {
            return Some(sibling);
        }
    }
    None
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn collapsed_text(el: &ElementRef) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}
