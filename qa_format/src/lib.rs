mod config;
pub mod quick_start;

use log::{debug, warn};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

/// Maximum number of questions tracked by one session.
pub const MAX_SLOTS: usize = 3;

/// The in-memory taxonomy table. It is loaded once and treated as read-only
/// afterwards: a new upload replaces the whole table, never parts of it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TaxonomyTable {
    rows: Vec<QuestionRow>,
}

impl TaxonomyTable {
    pub fn new(rows: Vec<QuestionRow>) -> TaxonomyTable {
        check_format_invariant(&rows);
        TaxonomyTable { rows }
    }

    pub fn rows(&self) -> &[QuestionRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All the major categories, in first-seen row order.
    pub fn majors(&self) -> Vec<String> {
        distinct(self.rows.iter().map(|r| r.major.clone()))
    }

    /// The mid categories available under one major category.
    pub fn mids(&self, major: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|r| r.major == major)
                .map(|r| r.mid.clone()),
        )
    }

    /// The minor categories available under one major and mid category.
    pub fn minors(&self, major: &str, mid: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|r| r.major == major && r.mid == mid)
                .map(|r| r.minor.clone()),
        )
    }

    /// The question texts available under one full category path.
    pub fn questions(&self, major: &str, mid: &str, minor: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|r| r.major == major && r.mid == mid && r.minor == minor)
                .map(|r| r.question.clone()),
        )
    }

    /// All the rows of one question (one row per choice), in table row order.
    pub fn matching_rows(&self, selection: &Selection) -> Vec<&QuestionRow> {
        self.rows
            .iter()
            .filter(|r| {
                r.major == selection.major
                    && r.mid == selection.mid
                    && r.minor == selection.minor
                    && r.question == selection.question
            })
            .collect()
    }
}

// The format is expected to be constant within one question key. The first
// row wins when the input violates this.
fn check_format_invariant(rows: &[QuestionRow]) {
    let mut formats: HashMap<Selection, &str> = HashMap::new();
    for row in rows {
        let key = Selection {
            major: row.major.clone(),
            mid: row.mid.clone(),
            minor: row.minor.clone(),
            question: row.question.clone(),
        };
        match formats.get(&key) {
            Some(f) if *f != row.format => {
                warn!(
                    "question {:?} carries conflicting formats {:?} and {:?}, keeping the first",
                    row.question, f, row.format
                );
            }
            Some(_) => {}
            None => {
                formats.insert(key, row.format.as_str());
            }
        }
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for v in values {
        if seen.insert(v.clone()) {
            res.push(v);
        }
    }
    res
}

/// Turns a proposed option set into a chosen index.
///
/// The console front-end prompts the user through this trait; tests plug in a
/// scripted implementation. The returned index must be within `options`.
pub trait OptionPicker {
    fn pick(
        &mut self,
        level: SelectLevel,
        options: &[String],
        default_index: usize,
    ) -> Result<usize, FormErrors>;
}

/// A picker that always accepts the proposed default.
pub struct DefaultPicker;

impl OptionPicker for DefaultPicker {
    fn pick(
        &mut self,
        _level: SelectLevel,
        _options: &[String],
        default_index: usize,
    ) -> Result<usize, FormErrors> {
        Ok(default_index)
    }
}

/// Walks the four cascading levels and returns the chosen question key.
///
/// Each level only offers the values present under the choices made at the
/// strictly preceding levels. The default of a level is the value of `prior`
/// when it is still present in the freshly filtered option set, and the first
/// option otherwise, so a stale prior value falls back silently and the
/// fallback cascades to the lower levels. The question level always defaults
/// to the first option.
pub fn select_question(
    table: &TaxonomyTable,
    prior: Option<&Selection>,
    picker: &mut impl OptionPicker,
) -> Result<Selection, FormErrors> {
    let majors = table.majors();
    let major = pick_one(picker, SelectLevel::Major, majors, prior.map(|s| &s.major))?;

    let mids = table.mids(&major);
    let mid = pick_one(picker, SelectLevel::Mid, mids, prior.map(|s| &s.mid))?;

    let minors = table.minors(&major, &mid);
    let minor = pick_one(picker, SelectLevel::Minor, minors, prior.map(|s| &s.minor))?;

    let questions = table.questions(&major, &mid, &minor);
    let question = pick_one(picker, SelectLevel::Question, questions, None)?;

    Ok(Selection {
        major,
        mid,
        minor,
        question,
    })
}

fn pick_one(
    picker: &mut impl OptionPicker,
    level: SelectLevel,
    options: Vec<String>,
    prior: Option<&String>,
) -> Result<String, FormErrors> {
    if options.is_empty() {
        return Err(FormErrors::EmptyTable);
    }
    let default_index = prior
        .and_then(|p| options.iter().position(|o| o == p))
        .unwrap_or(0);
    let idx = picker.pick(level, &options, default_index)?;
    match options.into_iter().nth(idx) {
        Some(value) => Ok(value),
        None => Err(FormErrors::InvalidChoice),
    }
}

/// The questions confirmed so far in one session, in confirmation order.
///
/// The store is append-only within the normal flow and holds at most
/// [MAX_SLOTS] selections. It is a plain value meant to be passed explicitly
/// through the host surface, one store per session.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SelectionStore {
    selections: Vec<Selection>,
}

impl SelectionStore {
    pub fn new() -> SelectionStore {
        SelectionStore {
            selections: Vec::new(),
        }
    }

    /// Appends a confirmed selection. Returns false and leaves the store
    /// unchanged when it already holds [MAX_SLOTS] entries.
    pub fn confirm(&mut self, selection: Selection) -> bool {
        if self.selections.len() >= MAX_SLOTS {
            warn!(
                "confirm: the store already holds {} selections, ignoring {:?}",
                MAX_SLOTS, selection.question
            );
            return false;
        }
        self.selections.push(selection);
        true
    }

    /// Clears the store for a wholesale re-submission.
    pub fn reset(&mut self) {
        self.selections.clear();
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selections.len() >= MAX_SLOTS
    }

    /// The most recent confirmation. It seeds the defaults of the next slot.
    pub fn last(&self) -> Option<&Selection> {
        self.selections.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.selections.iter()
    }
}

/// Looks up all the rows of one question and assembles its display form.
///
/// `position` is the 1-based position of the question within the session.
/// Fails with [FormErrors::NoMatchingRows] when the selection matches nothing,
/// which indicates a selection held across a table swap.
pub fn render(
    table: &TaxonomyTable,
    selection: &Selection,
    position: usize,
) -> Result<FormattedQuestion, FormErrors> {
    let matching = table.matching_rows(selection);
    debug!(
        "render: {} matching rows for {:?}",
        matching.len(),
        selection.question
    );
    let first = match matching.first() {
        Some(row) => row,
        None => return Err(FormErrors::NoMatchingRows),
    };
    Ok(FormattedQuestion {
        position,
        question: selection.question.clone(),
        format: first.format.clone(),
        choices: matching
            .iter()
            .map(|r| (r.choice.clone(), r.score))
            .collect(),
    })
}

impl FormattedQuestion {
    /// The copy-ready text block. This exact shape, including the indentation
    /// and the parenthesis-wrapped scores, is the primary output of the tool.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("問{}\n", self.position));
        out.push_str(&format!("- 設問: {}\n", self.question));
        out.push_str(&format!("- 設問様式: {}\n", self.format));
        out.push_str("- 選択肢（配点）\n");
        for (choice, score) in &self.choices {
            out.push_str(&format!("    - {}（{}）\n", choice, score));
        }
        out
    }
}

/// Renders every confirmed slot as one export text, blocks separated by a
/// blank line. A slot whose selection no longer matches the table is skipped
/// with a warning; it never prevents the other slots from rendering.
pub fn export_text(table: &TaxonomyTable, store: &SelectionStore) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for (idx, selection) in store.iter().enumerate() {
        match render(table, selection, idx + 1) {
            Ok(fq) => blocks.push(fq.to_text()),
            Err(e) => warn!("export_text: skipping question {}: {}", idx + 1, e),
        }
    }
    blocks.join("\n")
}
