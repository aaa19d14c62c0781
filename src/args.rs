use clap::Parser;

/// This is an interactive exporter of questionnaire format blocks.
///
/// It loads a question taxonomy from a CSV file, walks up to three
/// 大項目/中項目/小項目/設問 selections on the console and prints the
/// copy-ready format block for every confirmed question.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The CSV file containing the question taxonomy.
    /// The expected columns are 大項目, 中項目, 小項目, 設問, 設問様式, 選択肢
    /// and 配点. When not specified, questions.csv next to the executable is
    /// used.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path or empty) If specified, the final export is written to this
    /// location instead of the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default 3) The number of questions to select in this session. Values
    /// above 3 are capped to 3.
    #[clap(short, long, value_parser)]
    pub slots: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
