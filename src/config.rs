use crate::algorithm::MatrixRole;
use crate::error::{FmmError, FmmResult};
use crate::reduction::sweep::SweepRange;
use crate::reduction::Strategy;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionMethod {
    #[strum(to_string = "vanilla", serialize = "gv", serialize = "v", serialize = "greedy vanilla")]
    Vanilla,
    #[default]
    #[strum(
        to_string = "potential",
        serialize = "gp",
        serialize = "p",
        serialize = "greedy potential"
    )]
    Potential,
    #[strum(to_string = "brute-force", serialize = "bruteforce", serialize = "bf")]
    BruteForce,
}

impl ReductionMethod {
    pub fn parse(s: &str) -> FmmResult<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            FmmError::Config(format!(
                "unknown reduction method '{}' (expected vanilla, potential or brute-force)",
                s
            ))
        })
    }
}

fn parse_method(s: &str) -> Result<ReductionMethod, String> {
    ReductionMethod::parse(s).map_err(|e| e.to_string())
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    /// Reduction method: vanilla | potential | brute-force
    #[arg(long, short = 'r', default_value = "potential", value_parser = parse_method)]
    pub method: ReductionMethod,

    /// Fixed weight of the overlap term (skips the alpha sweep)
    #[arg(long, requires = "k2")]
    pub k1: Option<i64>,

    /// Fixed weight of the potential term (skips the alpha sweep)
    #[arg(long, requires = "k1")]
    pub k2: Option<i64>,

    #[arg(long, default_value_t = 0.0)]
    pub alpha_start: f64,
    #[arg(long, default_value_t = 0.5)]
    pub alpha_end: f64,
    #[arg(long, default_value_t = 5)]
    pub alpha_steps: usize,

    /// Per-matrix sweep override "start,end,steps"
    #[arg(long)]
    pub alpha_a: Option<String>,
    #[arg(long)]
    pub alpha_b: Option<String>,
    #[arg(long)]
    pub alpha_c: Option<String>,

    /// Initial substitution capacity of loaded matrices
    #[arg(long, default_value_t = 10)]
    pub t_capacity: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            method: ReductionMethod::Potential,
            k1: None,
            k2: None,
            alpha_start: 0.0,
            alpha_end: 0.5,
            alpha_steps: 5,
            alpha_a: None,
            alpha_b: None,
            alpha_c: None,
            t_capacity: 10,
        }
    }
}

impl ReductionConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FmmResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields that were typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &ReductionConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(method, "method");
        update_if_present!(k1, "k1");
        update_if_present!(k2, "k2");
        update_if_present!(alpha_start, "alpha_start");
        update_if_present!(alpha_end, "alpha_end");
        update_if_present!(alpha_steps, "alpha_steps");
        update_if_present!(alpha_a, "alpha_a");
        update_if_present!(alpha_b, "alpha_b");
        update_if_present!(alpha_c, "alpha_c");
        update_if_present!(t_capacity, "t_capacity");
    }

    pub fn default_range(&self) -> FmmResult<SweepRange> {
        SweepRange::new(self.alpha_start, self.alpha_end, self.alpha_steps)
    }

    /// Sweep range for one matrix: its override if set, else the shared range.
    pub fn range_for(&self, role: MatrixRole) -> FmmResult<SweepRange> {
        let custom = match role {
            MatrixRole::A => &self.alpha_a,
            MatrixRole::B => &self.alpha_b,
            MatrixRole::C => &self.alpha_c,
        };
        match custom {
            Some(s) => parse_alpha_range(s),
            None => self.default_range(),
        }
    }

    /// Potential weights fixed by the user, if any.
    pub fn weights(&self) -> FmmResult<Option<(i64, i64)>> {
        match (self.k1, self.k2) {
            (Some(k1), Some(k2)) => Ok(Some((k1, k2))),
            (None, None) => Ok(None),
            _ => Err(FmmError::Config(
                "k1 and k2 must be given together".to_string(),
            )),
        }
    }

    pub fn strategy_for(&self, role: MatrixRole) -> FmmResult<Strategy> {
        let strategy = match self.method {
            ReductionMethod::Vanilla => Strategy::Vanilla,
            ReductionMethod::BruteForce => Strategy::BruteForce,
            ReductionMethod::Potential => match self.weights()? {
                Some((k1, k2)) => Strategy::Potential { k1, k2 },
                None => Strategy::PotentialSweep(self.range_for(role)?),
            },
        };
        strategy.validate()?;
        Ok(strategy)
    }
}

/// Parses `"start,end,steps"`.
pub fn parse_alpha_range(s: &str) -> FmmResult<SweepRange> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(FmmError::Config(format!(
            "alpha range '{}' must be \"start,end,steps\"",
            s
        )));
    }
    let bad = |what: &str| FmmError::Config(format!("invalid {} in alpha range '{}'", what, s));
    let start: f64 = parts[0].parse().map_err(|_| bad("start"))?;
    let end: f64 = parts[1].parse().map_err(|_| bad("end"))?;
    let steps: usize = parts[2].parse().map_err(|_| bad("steps"))?;
    SweepRange::new(start, end, steps)
}
