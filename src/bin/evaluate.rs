//! Command line tool to measure a model against a labeled dataset

use anyhow::anyhow;
use burn::data::dataset::Dataset as _;
use pico_args::Arguments;
use toxic_classifier::{
    cli::{
        overrides::{reject_unused, OPTIONS_HELP},
        Dataset, Overrides,
    },
    datasets::jigsaw,
    pipelines::toxicity::{self, metrics::Report},
};

const USAGE: &str = "\
Usage: evaluate DATASET PATH [OPTIONS]

Arguments:
  DATASET              The dataset format (e.g., 'jigsaw')
  PATH                 The labeled CSV file

Options:
  -h, --help           Print help
  -l, --limit          Evaluate a random sample of this many rows
";

#[derive(Debug)]
struct Args {
    dataset: String,
    path: String,
    limit: Option<usize>,
    overrides: Overrides,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let limit = pargs.opt_value_from_str(["-l", "--limit"])?;
        let overrides = Overrides::parse(&mut pargs)?;

        let args = Args {
            limit,
            overrides,
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
            path: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: PATH"),
                _ => anyhow!("{}", e),
            })?,
        };

        reject_unused(pargs)?;

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}{}", USAGE, OPTIONS_HELP);
        return Ok(());
    };

    let dataset = Dataset::try_from(args.dataset.as_str())?;

    let items = match dataset {
        Dataset::Jigsaw => {
            let data = jigsaw::Dataset::load(&args.path)?;

            match args.limit {
                Some(limit) => data.samples(limit),
                None => (0..data.len()).filter_map(|i| data.get(i)).collect(),
            }
        }
    };

    if items.is_empty() {
        return Err(anyhow!("No labeled rows found in {}", args.path));
    }

    let settings = args.overrides.settings().await?;
    let pipeline = toxicity::load(&settings).await?;

    log::info!("Evaluating {} on {} rows of {}...", settings.model, items.len(), dataset);

    let texts: Vec<String> = items.iter().map(|item| item.comment_text.clone()).collect();
    let predictions = pipeline.predict(&texts)?;

    let mut report = Report::default();
    for (item, prediction) in items.iter().zip(&predictions) {
        report.record(prediction, &item.labels());
    }

    println!("{report}");

    Ok(())
}
