//! Command line tool for toxicity prediction

use std::path::Path;

use anyhow::Result;
use pico_args::Arguments;
use tokio::io::{self, AsyncBufReadExt};
use toxic_classifier::{
    cli::{
        overrides::{reject_unused, OPTIONS_HELP},
        Overrides,
    },
    datasets::jigsaw,
    pipelines::toxicity::{self, Prediction},
    utils::files::read_file,
};

const USAGE: &str = "\
Usage: predict [OPTIONS]

Reads one text per line from stdin unless --input is given.

Options:
  -h, --help           Print help
  -i, --input          A CSV file with a 'comment_text' column, or a text file with one text per line
      --json           Print one JSON object per text
";

#[derive(Debug)]
struct Args {
    /// Where to read texts from, instead of stdin
    input: Option<String>,

    /// Emit JSON lines instead of a summary
    json: bool,

    /// Settings overrides
    overrides: Overrides,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            input: pargs.opt_value_from_str(["-i", "--input"])?,
            json: pargs.contains("--json"),
            overrides: Overrides::parse(&mut pargs)?,
        };

        reject_unused(pargs)?;

        Ok(Some(args))
    }
}

async fn read_input(path: &str) -> Result<Vec<String>> {
    let is_csv = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(jigsaw::read_comments(path)?
            .into_iter()
            .map(|comment| comment.comment_text)
            .collect())
    } else {
        Ok(read_file(path)
            .await?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect())
    }
}

async fn read_stdin() -> Result<Vec<String>> {
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut texts = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }

    Ok(texts)
}

fn summarize(index: usize, prediction: &Prediction) -> String {
    let labels = if prediction.any() {
        prediction
            .labels
            .iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        "none".to_string()
    };

    let scores = prediction
        .scores
        .iter()
        .map(|(category, score)| format!("{category}={score:.3}"))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "\n=== Item {index} ===\
         \n- Text: {}\
         \n- Toxic: {}\
         \n- Labels: {labels}\
         \n- Scores: {scores}\
         \n================",
        prediction.text,
        prediction.is_toxic()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}{}", USAGE, OPTIONS_HELP);
        return Ok(());
    };

    let settings = args.overrides.settings().await?;
    let pipeline = toxicity::load(&settings).await?;

    let texts = match &args.input {
        Some(path) => read_input(path).await?,
        None => read_stdin().await?,
    };
    log::info!("Running inference on {} texts...", texts.len());

    let predictions = pipeline.predict(&texts)?;

    for (i, prediction) in predictions.iter().enumerate() {
        if args.json {
            println!("{}", serde_json::to_string(prediction)?);
        } else {
            println!("{}", summarize(i, prediction));
        }
    }

    Ok(())
}
