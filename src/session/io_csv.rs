// Primitives for reading the taxonomy CSV file.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use snafu::prelude::*;

use qa_format::QuestionRow;

use crate::session::*;

/// The columns that must all be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "大項目",
    "中項目",
    "小項目",
    "設問",
    "設問様式",
    "選択肢",
    "配点",
];

// The score stays text at this stage so that a bad value can be reported
// with its line number.
#[derive(Debug, Clone, Deserialize)]
struct RawRow {
    #[serde(rename = "大項目")]
    major: String,
    #[serde(rename = "中項目")]
    mid: String,
    #[serde(rename = "小項目")]
    minor: String,
    #[serde(rename = "設問")]
    question: String,
    #[serde(rename = "設問様式")]
    format: String,
    #[serde(rename = "選択肢")]
    choice: String,
    #[serde(rename = "配点")]
    score: String,
}

pub fn read_question_rows(path: &Path) -> SessionResult<Vec<QuestionRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path.display().to_string(),
        })?;
    parse_question_rows(rdr)
}

fn parse_question_rows<R: Read>(mut rdr: csv::Reader<R>) -> SessionResult<Vec<QuestionRow>> {
    let headers = rdr.headers().context(CsvRecordParseSnafu {})?.clone();
    for name in REQUIRED_COLUMNS {
        ensure!(
            headers.iter().any(|h| h == name),
            MissingColumnSnafu { name }
        );
    }

    let mut res: Vec<QuestionRow> = Vec::new();
    for (idx, record) in rdr.deserialize::<RawRow>().enumerate() {
        // Line 1 is the header row.
        let lineno = idx + 2;
        let raw = record.context(CsvRecordParseSnafu {})?;
        debug!("line {}: {:?}", lineno, raw);
        let score = raw
            .score
            .trim()
            .parse::<i64>()
            .ok()
            .context(InvalidScoreSnafu {
                value: raw.score.clone(),
                lineno,
            })?;
        res.push(QuestionRow {
            major: raw.major,
            mid: raw.mid,
            minor: raw.minor,
            question: raw.question,
            format: raw.format,
            choice: raw.choice,
            score,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(content: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes())
    }

    const SAMPLE: &str = "\
大項目,中項目,小項目,設問,設問様式,選択肢,配点
1サステナビリティ体制,1.法令等遵守,A.法令等遵守に関する方針,(1)法令等遵守に関する方針や行動基準を策定していますか,複数,a.法令等遵守に関する方針はない、もしくは不明,0
1サステナビリティ体制,1.法令等遵守,A.法令等遵守に関する方針,(1)法令等遵守に関する方針や行動基準を策定していますか,複数,b.法令等遵守に関する方針がある,1
";

    #[test]
    fn reads_every_row() {
        let rows = parse_question_rows(reader(SAMPLE)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].major, "1サステナビリティ体制");
        assert_eq!(rows[0].score, 0);
        assert_eq!(rows[1].choice, "b.法令等遵守に関する方針がある");
        assert_eq!(rows[1].score, 1);
    }

    #[test]
    fn a_missing_column_is_named() {
        let content = "\
大項目,中項目,小項目,設問,設問様式,選択肢
1,2,3,4,5,6
";
        let err = parse_question_rows(reader(content)).unwrap_err();
        match err {
            SessionError::MissingColumn { name } => assert_eq!(name, "配点"),
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn a_bad_score_is_reported_with_its_line() {
        let content = "\
大項目,中項目,小項目,設問,設問様式,選択肢,配点
1,2,3,4,5,6,1
1,2,3,4,5,6,abc
";
        let err = parse_question_rows(reader(content)).unwrap_err();
        match err {
            SessionError::InvalidScore { value, lineno } => {
                assert_eq!(value, "abc");
                assert_eq!(lineno, 3);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn extra_columns_are_ignored() {
        let content = "\
大項目,中項目,小項目,設問,設問様式,選択肢,配点,備考
1,2,3,4,5,6,7,メモ
";
        let rows = parse_question_rows(reader(content)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 7);
    }

    #[test]
    fn a_missing_file_is_an_open_error() {
        let err = read_question_rows(Path::new("/nonexistent/questions.csv")).unwrap_err();
        assert!(matches!(err, SessionError::CsvOpen { .. }));
    }
}
