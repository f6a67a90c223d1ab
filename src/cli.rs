use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "snap-translate",
    version,
    about = "Extract text from a photo and translate it"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the target languages offered during onboarding
    Languages,
    /// Choose the target language and finish onboarding
    Onboard {
        #[arg(long, help = "Language code or name, e.g. `tr` or `Türkçe`")]
        language: String,
    },
    /// Show onboarding state and the stored target language
    Status,
    /// Translate the text in an image
    Scan {
        image: PathBuf,
        #[arg(long, default_value_t = false, help = "Print the model reply without parsing it")]
        raw: bool,
    },
}
