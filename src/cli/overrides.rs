use std::path::PathBuf;

use pico_args::Arguments;

use crate::config::Settings;

use super::{Device, Model};

/// Usage lines for the options shared by every binary
pub const OPTIONS_HELP: &str = "\
  -c, --config         Path to a YAML settings file
  -m, --model          The model to use ('tfidf' or 'rnn')
  -a, --artifacts      Directory holding the model artifacts (defaults to 'data/model')
      --hub            Hugging Face Hub repo to fetch the artifacts from
  -d, --device         Device for the rnn model ('cpu' or 'cuda')
  -t, --threshold      Decision threshold for every category (defaults to 0.5)
  -s, --max-seq-len    Override the rnn model's sequence length
  -b, --batch-size     Texts scored per model call
";

/// Fail when anything is left on the command line after parsing
pub fn reject_unused(pargs: Arguments) -> anyhow::Result<()> {
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        return Err(anyhow!("Unexpected arguments: {:?}", remaining));
    }

    Ok(())
}

/// Command line flags that override values from the settings file
#[derive(Debug, Default)]
pub struct Overrides {
    config: Option<String>,
    model: Option<String>,
    artifact_dir: Option<String>,
    hub_repo: Option<String>,
    device: Option<String>,
    threshold: Option<f32>,
    max_seq_len: Option<usize>,
    batch_size: Option<usize>,
}

impl Overrides {
    /// Consume the shared options from the command line
    pub fn parse(pargs: &mut Arguments) -> Result<Self, pico_args::Error> {
        Ok(Self {
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            model: pargs.opt_value_from_str(["-m", "--model"])?,
            artifact_dir: pargs.opt_value_from_str(["-a", "--artifacts"])?,
            hub_repo: pargs.opt_value_from_str("--hub")?,
            device: pargs.opt_value_from_str(["-d", "--device"])?,
            threshold: pargs.opt_value_from_str(["-t", "--threshold"])?,
            max_seq_len: pargs.opt_value_from_str(["-s", "--max-seq-len"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
        })
    }

    /// Load the settings file, if any, and apply the flags on top
    pub async fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path).await?,
            None => Settings::default(),
        };

        self.apply(&mut settings)?;
        settings.validate()?;

        Ok(settings)
    }

    fn apply(&self, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(model) = &self.model {
            settings.model = Model::try_from(model.as_str())?;
        }

        if let Some(artifact_dir) = &self.artifact_dir {
            settings.artifact_dir = PathBuf::from(artifact_dir);
        }

        if let Some(hub_repo) = &self.hub_repo {
            settings.hub_repo = Some(hub_repo.clone());
        }

        if let Some(device) = &self.device {
            settings.device = Device::try_from(device.as_str())?;
        }

        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }

        if let Some(max_seq_len) = self.max_seq_len {
            settings.max_seq_len = Some(max_seq_len);
        }

        if let Some(batch_size) = self.batch_size {
            settings.batch_size = batch_size;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Overrides {
        let mut pargs = Arguments::from_vec(args.iter().map(OsString::from).collect());
        Overrides::parse(&mut pargs).unwrap()
    }

    #[tokio::test]
    async fn flags_override_defaults() {
        let overrides = parse(&["-m", "rnn", "--threshold", "0.8", "-s", "100", "--hub", "org/repo"]);
        let settings = overrides.settings().await.unwrap();

        assert_eq!(settings.model, Model::Rnn);
        assert_eq!(settings.threshold, 0.8);
        assert_eq!(settings.max_seq_len, Some(100));
        assert_eq!(settings.hub_repo.as_deref(), Some("org/repo"));
    }

    #[test]
    fn rejects_leftover_arguments() {
        let args = |values: &[&str]| Arguments::from_vec(values.iter().map(OsString::from).collect());

        let mut pargs = args(&["-m", "tfidf", "data.csv"]);
        Overrides::parse(&mut pargs).unwrap();
        let err = reject_unused(pargs).unwrap_err();
        assert!(err.to_string().contains("data.csv"));

        let mut pargs = args(&["-m", "tfidf"]);
        Overrides::parse(&mut pargs).unwrap();
        assert!(reject_unused(pargs).is_ok());
    }

    #[tokio::test]
    async fn rejects_unknown_models() {
        let overrides = parse(&["--model", "bert"]);

        assert!(overrides.settings().await.is_err());
    }
}
