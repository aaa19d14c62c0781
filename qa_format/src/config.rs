// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of the taxonomy table.
///
/// A question conceptually owns one row per available choice: all the rows
/// sharing the same (major, mid, minor, question) key describe the choice set
/// of a single question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionRow {
    /// 大項目
    pub major: String,
    /// 中項目
    pub mid: String,
    /// 小項目
    pub minor: String,
    /// 設問
    pub question: String,
    /// 設問様式. Constant across all the rows of one question.
    pub format: String,
    /// 選択肢
    pub choice: String,
    /// 配点
    pub score: i64,
}

/// A key identifying one question, without its choices.
///
/// The choices are re-derived by a table lookup when they are needed, so that
/// a selection stays cheap to copy and compare.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Selection {
    pub major: String,
    pub mid: String,
    pub minor: String,
    pub question: String,
}

/// The four dependent levels of the cascading selector, in prompt order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum SelectLevel {
    Major,
    Mid,
    Minor,
    Question,
}

impl SelectLevel {
    /// The user-facing label of this level. It matches the column name of the
    /// input file.
    pub fn label(&self) -> &'static str {
        match self {
            SelectLevel::Major => "大項目",
            SelectLevel::Mid => "中項目",
            SelectLevel::Minor => "小項目",
            SelectLevel::Question => "設問",
        }
    }
}

// ******** Output data structures *********

/// A fully resolved question, ready for display or export.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FormattedQuestion {
    /// 1-based position of the question within the session.
    pub position: usize,
    pub question: String,
    pub format: String,
    /// (choice label, score), in table row order.
    pub choices: Vec<(String, i64)>,
}

/// Errors that prevent a selection or a rendering from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FormErrors {
    /// No option can be offered at the current level (the table is empty).
    EmptyTable,
    /// A picker returned an index outside of the proposed options.
    InvalidChoice,
    /// The selection matches no row of the current table. This happens when a
    /// selection is held across a table swap.
    NoMatchingRows,
    /// The picker could not obtain a choice and gave up.
    Aborted,
}

impl Error for FormErrors {}

impl Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormErrors::EmptyTable => write!(f, "the taxonomy table has no rows"),
            FormErrors::InvalidChoice => write!(f, "the picked index is out of range"),
            FormErrors::NoMatchingRows => write!(f, "the selection matches no row of the table"),
            FormErrors::Aborted => write!(f, "the picker aborted the selection"),
        }
    }
}
