//! featio CLI - dataset format conversion and contingency counts

use clap::{Parser, Subcommand};
use featio::{
    ArffMode, ContingencyTable, Dataset, DatasetError, Destination, FeatureType, Format, Quote,
    ReadOptions, Source, WriteOptions,
};
use std::process::ExitCode;

/// Read and write labelled feature datasets in LibSVM, CSV and WEKA ARFF.
///
/// Use `-` as a path for standard input or standard output.
#[derive(Parser, Debug)]
#[command(name = "featio")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a dataset from one format to another
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: libsvm, csv or weka
        #[arg(short = 't', long, value_parser = parse_format)]
        to: Format,

        /// Output file (default: standard output)
        #[arg(short = 'o', long, default_value = "-")]
        output: String,

        /// Write sparse ARFF rows instead of dense ones
        #[arg(long)]
        sparse: bool,
    },

    /// Print A/B/C/D counts for every feature and class
    Contingency {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: text (default) or csv
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Input file, or - for standard input
    input: String,

    /// Input format: libsvm, csv or weka (arff)
    #[arg(short = 'f', long, value_parser = parse_format)]
    from: Format,

    /// CSV: line holding feature names (0 for none)
    #[arg(long, default_value = "1")]
    name_row: usize,

    /// CSV: line holding feature types (0 for none)
    #[arg(long, default_value = "2")]
    type_row: usize,

    /// CSV: explicit feature as NAME:TYPE, repeatable; overrides the header rows
    #[arg(long = "feature", value_name = "NAME:TYPE")]
    features: Vec<String>,

    /// CSV: 1-indexed column holding the class label
    #[arg(short = 'l', long, default_value = "1")]
    label_column: usize,

    /// CSV: field delimiter (single character)
    #[arg(short = 'd', long, default_value = ",")]
    delimiter: char,

    /// Quote character (single ASCII character, or 'none' for CSV)
    #[arg(short = 'q', long)]
    quote: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
}

fn parse_format(s: &str) -> Result<Format, String> {
    s.parse().map_err(|e: DatasetError| e.to_string())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    match &args.command {
        Command::Convert {
            input,
            to,
            output,
            sparse,
        } => {
            let read = read_options(input)?;
            let dataset = load(input, &read)?;
            let mut options = WriteOptions {
                csv: read.csv,
                arff: read.arff,
                ..WriteOptions::default()
            };
            if *sparse {
                options.arff_mode = ArffMode::Sparse;
            }
            featio::write(&dataset, Destination::from_arg(output), *to, &options)?;
        }
        Command::Contingency {
            input,
            format,
        } => {
            let dataset = load(input, &read_options(input)?)?;
            match format {
                OutputFormat::Text => print_text_output(&dataset),
                OutputFormat::Csv => print_csv_output(&dataset)?,
            }
        }
    }
    Ok(())
}

#[cfg(feature = "http")]
fn load(input: &InputArgs, options: &ReadOptions) -> Result<Dataset, DatasetError> {
    if input.input.starts_with("http://") || input.input.starts_with("https://") {
        return featio::read_url(&input.input, &input.from.to_string(), options);
    }
    featio::read(Source::from_arg(&input.input), input.from, options)
}

#[cfg(not(feature = "http"))]
fn load(input: &InputArgs, options: &ReadOptions) -> Result<Dataset, DatasetError> {
    featio::read(Source::from_arg(&input.input), input.from, options)
}

fn read_options(input: &InputArgs) -> Result<ReadOptions, DatasetError> {
    let mut options = ReadOptions::default();

    if !input.delimiter.is_ascii() {
        return Err(DatasetError::InvalidConfig(format!(
            "delimiter `{}` is not a single-byte character",
            input.delimiter
        )));
    }
    options
        .csv
        .feature_name_row((input.name_row > 0).then_some(input.name_row))
        .feature_type_row((input.type_row > 0).then_some(input.type_row))
        .class_label_column(input.label_column)
        .delimiter(input.delimiter as u8);

    if !input.features.is_empty() {
        let features = input
            .features
            .iter()
            .map(|arg| parse_feature(arg))
            .collect::<Result<Vec<_>, _>>()?;
        options.csv.feature_types(features);
    }

    if let Some(ref quote_str) = input.quote {
        if quote_str.eq_ignore_ascii_case("none") {
            options.csv.quote(Quote::None);
        } else {
            let mut chars = quote_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => {
                    options.csv.quote(Quote::Some(c as u8));
                    options.arff.quote(c);
                }
                _ => {
                    return Err(DatasetError::InvalidConfig(format!(
                        "quote `{quote_str}` is not a single-byte character"
                    )));
                }
            }
        }
    }

    Ok(options)
}

/// `NAME:TYPE`, split on the last colon so names may contain one.
fn parse_feature(arg: &str) -> Result<(String, FeatureType), DatasetError> {
    let Some((name, keyword)) = arg.rsplit_once(':') else {
        return Err(DatasetError::InvalidConfig(format!(
            "expected NAME:TYPE, found `{arg}`"
        )));
    };
    let ty = FeatureType::from_keyword(keyword).ok_or_else(|| DatasetError::InvalidFeatureType {
        feature: name.to_string(),
        keyword: keyword.to_string(),
    })?;
    Ok((name.to_string(), ty))
}

fn print_text_output(dataset: &Dataset) {
    let table = ContingencyTable::compute(dataset);
    let width = dataset
        .features()
        .iter()
        .map(|f| f.chars().count())
        .max()
        .unwrap_or(0);

    for feature in dataset.features() {
        for class in dataset.classes() {
            if let Some(counts) = table.get(feature, class) {
                println!(
                    "{feature:<width$}  {class}  A={} B={} C={} D={}",
                    counts.a, counts.b, counts.c, counts.d
                );
            }
        }
    }
}

fn print_csv_output(dataset: &Dataset) -> Result<(), csv::Error> {
    let table = ContingencyTable::compute(dataset);
    let mut out = csv::Writer::from_writer(std::io::stdout().lock());

    out.write_record(["feature", "class", "a", "b", "c", "d"])?;
    for feature in dataset.features() {
        for class in dataset.classes() {
            if let Some(counts) = table.get(feature, class) {
                out.write_record([
                    feature.to_string(),
                    class.to_string(),
                    counts.a.to_string(),
                    counts.b.to_string(),
                    counts.c.to_string(),
                    counts.d.to_string(),
                ])?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_args(extra: &[&str]) -> InputArgs {
        let mut argv = vec!["featio", "contingency", "data.csv", "--from", "csv"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Command::Contingency { input, .. } => input,
            Command::Convert { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_quote_applies_to_csv_and_arff() {
        let options = read_options(&input_args(&["-q", "'"])).unwrap();

        let mut expected = ReadOptions::default();
        expected.csv.quote(Quote::Some(b'\''));
        expected.arff.quote('\'');
        assert_eq!(options, expected);
    }

    #[test]
    fn test_quote_none_only_affects_csv() {
        let options = read_options(&input_args(&["--quote", "none"])).unwrap();

        let mut expected = ReadOptions::default();
        expected.csv.quote(Quote::None);
        assert_eq!(options, expected);
    }

    #[test]
    fn test_non_ascii_quote_is_rejected() {
        let err = read_options(&input_args(&["--quote", "«"])).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidConfig(_)));

        let err = read_options(&input_args(&["--quote", "ab"])).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let err = read_options(&input_args(&["-d", "§"])).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidConfig(_)));
    }

    #[test]
    fn test_explicit_features() {
        let options = read_options(&input_args(&["--feature", "a:b:integer", "--feature", "c:real"]))
            .unwrap();

        let mut expected = ReadOptions::default();
        expected
            .csv
            .feature_types([("a:b", FeatureType::Integer), ("c", FeatureType::Real)]);
        assert_eq!(options, expected);
    }
}
