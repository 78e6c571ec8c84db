use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "faraid",
    about = "Faraid: distribute a net estate among heirs by fixed shares and residue",
    version
)]
pub struct Cli {
    /// Emit engine debug events on stderr (overridden by FARAID_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute each heir's share of the estate
    Compute {
        #[command(flatten)]
        case: CaseArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain which heirs are blocked and which take the residue
    Explain {
        #[command(flatten)]
        case: CaseArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the heir category keys accepted in case files
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Sex of the deceased; decides which spouse may be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Engine inputs, from a case file, flags, or both (flags win).
#[derive(Args, Debug, Clone, Default)]
pub struct CaseArgs {
    /// Case file (TOML or JSON) with `deceased`, `[estate]` and `[heirs]`
    #[arg(long)]
    pub case: Option<String>,

    /// Net estate to distribute
    #[arg(long, allow_negative_numbers = true)]
    pub estate: Option<f64>,

    /// Sex of the deceased
    #[arg(long, value_enum)]
    pub deceased: Option<Sex>,

    /// The husband survives
    #[arg(long)]
    pub husband: bool,

    /// The wife survives
    #[arg(long)]
    pub wife: bool,

    /// The father survives
    #[arg(long)]
    pub father: bool,

    /// The mother survives
    #[arg(long)]
    pub mother: bool,

    /// The paternal grandfather survives
    #[arg(long = "paternal-grandfather", alias = "grandfather")]
    pub grandfather: bool,

    /// The paternal grandmother survives
    #[arg(long = "paternal-grandmother", alias = "grandmother")]
    pub grandmother: bool,

    /// Number of sons
    #[arg(long)]
    pub sons: Option<u32>,

    /// Number of daughters
    #[arg(long)]
    pub daughters: Option<u32>,

    /// Number of grandsons through a son
    #[arg(long = "grandsons-through-son", alias = "grandsons")]
    pub grandsons: Option<u32>,

    /// Number of granddaughters through a son
    #[arg(long = "granddaughters-through-son", alias = "granddaughters")]
    pub granddaughters: Option<u32>,

    /// Number of full brothers
    #[arg(long)]
    pub brothers: Option<u32>,

    /// Number of full sisters
    #[arg(long)]
    pub sisters: Option<u32>,
}
