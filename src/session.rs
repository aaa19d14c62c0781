use log::{debug, info, warn};

use qa_format::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::args::Args;

pub mod io_csv;

/// The file used when no --input argument is given, resolved next to the
/// executable.
pub const DEFAULT_INPUT_NAME: &str = "questions.csv";

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing a CSV record"))]
    CsvRecordParse { source: csv::Error },
    #[snafu(display("Missing required column {name} in the input file"))]
    MissingColumn { name: String },
    #[snafu(display("Invalid score {value:?} at line {lineno} of the input file"))]
    InvalidScore { value: String, lineno: usize },
    #[snafu(display("Error during the console interaction"))]
    Console { source: std::io::Error },
    #[snafu(display("Could not complete the question selection"))]
    Selecting { source: FormErrors },
    #[snafu(display("Error writing the export to {path}"))]
    ExportWrite { source: std::io::Error, path: String },
    #[snafu(display("Cannot locate the running executable"))]
    ExePath { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Prompts on the console for one option per cascade level.
///
/// The options are shown as a numbered menu with the default marked by an
/// asterisk. An empty input (or the end of the input stream) accepts the
/// default, a number picks that entry, anything else asks again.
pub struct ConsolePicker<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePicker<R, W> {
    pub fn new(input: R, output: W) -> ConsolePicker<R, W> {
        ConsolePicker { input, output }
    }

    fn prompt(
        &mut self,
        level: SelectLevel,
        options: &[String],
        default_index: usize,
    ) -> std::io::Result<usize> {
        writeln!(self.output, "{}を選択してください", level.label())?;
        for (idx, opt) in options.iter().enumerate() {
            let marker = if idx == default_index { "*" } else { " " };
            writeln!(self.output, " {} [{}] {}", marker, idx + 1, opt)?;
        }
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let mut line = String::new();
            let n = self.input.read_line(&mut line)?;
            if n == 0 {
                debug!("prompt: end of input, taking the default");
                return Ok(default_index);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return Ok(default_index);
            }
            match trimmed.parse::<usize>() {
                Ok(x) if x >= 1 && x <= options.len() => return Ok(x - 1),
                _ => {
                    writeln!(self.output, "1から{}の番号を入力してください", options.len())?;
                }
            }
        }
    }

    /// Asks a yes/no question. An empty input and the end of the input stream
    /// both mean yes.
    fn ask_yes_no(&mut self, question: &str) -> std::io::Result<bool> {
        write!(self.output, "{} [Y/n] ", question)?;
        self.output.flush()?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(true);
        }
        let t = line.trim().to_lowercase();
        Ok(t != "n" && t != "no")
    }
}

impl<R: BufRead, W: Write> OptionPicker for ConsolePicker<R, W> {
    fn pick(
        &mut self,
        level: SelectLevel,
        options: &[String],
        default_index: usize,
    ) -> Result<usize, FormErrors> {
        self.prompt(level, options, default_index).map_err(|e| {
            warn!("console interaction failed: {}", e);
            FormErrors::Aborted
        })
    }
}

fn default_input_path() -> SessionResult<PathBuf> {
    let exe = std::env::current_exe().context(ExePathSnafu {})?;
    match exe.parent() {
        Some(dir) => Ok(dir.join(DEFAULT_INPUT_NAME)),
        None => whatever!("the executable path {:?} has no parent directory", exe),
    }
}

/// Walks the selection slots until the requested count is confirmed or the
/// user stops early. The prior confirmation seeds the defaults of the next
/// slot.
fn run_slots<R: BufRead, W: Write>(
    table: &TaxonomyTable,
    max_slots: usize,
    picker: &mut ConsolePicker<R, W>,
) -> SessionResult<SelectionStore> {
    let mut store = SelectionStore::new();
    while store.len() < max_slots {
        let slot = store.len() + 1;
        writeln!(picker.output).context(ConsoleSnafu {})?;
        writeln!(picker.output, "### {}問目", slot).context(ConsoleSnafu {})?;
        let prior = store.last().cloned();
        let selection =
            select_question(table, prior.as_ref(), picker).context(SelectingSnafu {})?;
        match render(table, &selection, slot) {
            Ok(fq) => {
                write!(picker.output, "{}", fq.to_text()).context(ConsoleSnafu {})?;
            }
            Err(e) => {
                // Can only happen if the selection went stale against the
                // table, which a single-session run does not do.
                warn!("run_slots: cannot display slot {}: {}", slot, e);
                continue;
            }
        }
        if !picker
            .ask_yes_no("この設問で確定しますか？")
            .context(ConsoleSnafu {})?
        {
            // Redo the same slot.
            continue;
        }
        if !store.confirm(selection) {
            break;
        }
        if store.len() < max_slots
            && !picker
                .ask_yes_no("次の設問を選択しますか？")
                .context(ConsoleSnafu {})?
        {
            break;
        }
    }
    Ok(store)
}

pub fn run_session(args: &Args) -> SessionResult<()> {
    let input_path = match &args.input {
        Some(p) => PathBuf::from(p),
        None => default_input_path()?,
    };
    info!("loading the question table from {:?}", input_path);
    let rows = io_csv::read_question_rows(&input_path)?;
    info!("loaded {} rows", rows.len());
    let table = TaxonomyTable::new(rows);
    if table.is_empty() {
        whatever!("the input file {:?} contains no question rows", input_path);
    }

    let max_slots = args.slots.unwrap_or(MAX_SLOTS).min(MAX_SLOTS);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut picker = ConsolePicker::new(stdin.lock(), stdout.lock());
    let store = run_slots(&table, max_slots, &mut picker)?;
    drop(picker);

    if store.is_empty() {
        info!("no question was confirmed, nothing to export");
        return Ok(());
    }

    let text = export_text(&table, &store);
    match &args.out {
        Some(path) => {
            fs::write(path, &text).context(ExportWriteSnafu { path: path.clone() })?;
            info!("export written to {}", path);
        }
        None => {
            println!();
            print!("{}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn picker_with(input: &str) -> ConsolePicker<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePicker::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn options(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> TaxonomyTable {
        let row = |major: &str, question: &str, choice: &str, score: i64| QuestionRow {
            major: major.to_string(),
            mid: "1.中".to_string(),
            minor: "A.小".to_string(),
            question: question.to_string(),
            format: "単一".to_string(),
            choice: choice.to_string(),
            score,
        };
        TaxonomyTable::new(vec![
            row("1大", "(1)設問その一", "a.いいえ", 0),
            row("1大", "(1)設問その一", "b.はい", 1),
            row("2大", "(2)設問その二", "a.いいえ", 0),
        ])
    }

    #[test]
    fn empty_input_accepts_the_default() {
        let mut p = picker_with("\n");
        let idx = p.prompt(SelectLevel::Major, &options(&["a", "b"]), 1).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn end_of_input_accepts_the_default() {
        let mut p = picker_with("");
        let idx = p.prompt(SelectLevel::Major, &options(&["a", "b"]), 0).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn a_number_picks_that_entry() {
        let mut p = picker_with("2\n");
        let idx = p.prompt(SelectLevel::Mid, &options(&["a", "b", "c"]), 0).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn out_of_range_input_asks_again() {
        let mut p = picker_with("9\n1\n");
        let idx = p.prompt(SelectLevel::Minor, &options(&["a", "b"]), 0).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn garbage_input_asks_again() {
        let mut p = picker_with("abc\n\n");
        let idx = p.prompt(SelectLevel::Question, &options(&["a", "b"]), 1).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn yes_no_answers() {
        assert!(picker_with("\n").ask_yes_no("?").unwrap());
        assert!(picker_with("y\n").ask_yes_no("?").unwrap());
        assert!(picker_with("").ask_yes_no("?").unwrap());
        assert!(!picker_with("n\n").ask_yes_no("?").unwrap());
        assert!(!picker_with("No\n").ask_yes_no("?").unwrap());
    }

    #[test]
    fn default_path_points_next_to_the_executable() {
        let p = default_input_path().unwrap();
        assert!(p.ends_with(DEFAULT_INPUT_NAME));
    }

    #[test]
    fn one_slot_confirmed_then_stop() {
        let table = sample_table();
        // Accept the defaults for the four levels, confirm, do not continue.
        let mut picker = picker_with("\n\n\n\ny\nn\n");
        let store = run_slots(&table, MAX_SLOTS, &mut picker).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.last().unwrap().question, "(1)設問その一");
    }

    #[test]
    fn declining_the_confirmation_redoes_the_slot() {
        let table = sample_table();
        // First pass declined, second pass picks the other major and confirms.
        let mut picker = picker_with("\n\n\n\nn\n2\n\n\n\ny\nn\n");
        let store = run_slots(&table, MAX_SLOTS, &mut picker).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.last().unwrap().question, "(2)設問その二");
    }

    #[test]
    fn end_of_input_fills_every_slot_with_defaults() {
        let table = sample_table();
        let mut picker = picker_with("");
        let store = run_slots(&table, MAX_SLOTS, &mut picker).unwrap();
        assert_eq!(store.len(), MAX_SLOTS);
    }
}
