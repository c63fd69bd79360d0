use creature_battle_core::loader::DEFAULT_MOVES_PER_CREATURE;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: creature-battle [--data-dir DIR] [--moves FILE] [--creatures FILE] \
[--moves-per-creature N] [--seed SEED] [--max-turns N] [--log-json FILE]";

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub data_dir: PathBuf,
    pub moves_file: PathBuf,
    pub creatures_file: PathBuf,
    pub moves_per_creature: usize,
    pub seed: Option<u64>,
    pub max_turns: Option<u32>,
    pub log_path: Option<PathBuf>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            moves_file: PathBuf::from("PokemonMoves.csv"),
            creatures_file: PathBuf::from("FirstGenPokemon.csv"),
            moves_per_creature: DEFAULT_MOVES_PER_CREATURE,
            seed: None,
            max_turns: None,
            log_path: None,
        }
    }
}

impl CliOptions {
    pub fn moves_path(&self) -> PathBuf {
        self.data_dir.join(&self.moves_file)
    }

    pub fn creatures_path(&self) -> PathBuf {
        self.data_dir.join(&self.creatures_file)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

/// Parse the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                opts.data_dir = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--data-dir requires a path (e.g. --data-dir data)")
                })?;
            }
            "--moves" => {
                opts.moves_file = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow::anyhow!("--moves requires a file name"))?;
            }
            "--creatures" => {
                opts.creatures_file = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow::anyhow!("--creatures requires a file name"))?;
            }
            "--moves-per-creature" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--moves-per-creature requires a number"))?;
                opts.moves_per_creature = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                opts.seed = Some(val.parse()?);
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-turns requires a number"))?;
                opts.max_turns = Some(val.parse()?);
            }
            "--log-json" => {
                let path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--log-json requires a path (e.g. --log-json battle.json)")
                })?;
                opts.log_path = Some(path);
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }
    Ok(Command::Run(opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_point_at_bundled_data() -> anyhow::Result<()> {
        let Command::Run(opts) = parse_args(args(&[]))? else {
            panic!("expected run");
        };
        assert_eq!(opts.moves_path(), PathBuf::from("data/PokemonMoves.csv"));
        assert_eq!(opts.creatures_path(), PathBuf::from("data/FirstGenPokemon.csv"));
        assert_eq!(opts.moves_per_creature, 4);
        assert_eq!(opts.seed, None);
        Ok(())
    }

    #[test]
    fn every_flag_is_read() -> anyhow::Result<()> {
        let parsed = parse_args(args(&[
            "--data-dir",
            "fixtures",
            "--moves",
            "m.csv",
            "--creatures",
            "c.csv",
            "--moves-per-creature",
            "2",
            "--seed",
            "7",
            "--max-turns",
            "500",
            "--log-json",
            "out.json",
        ]))?;
        let expected = CliOptions {
            data_dir: PathBuf::from("fixtures"),
            moves_file: PathBuf::from("m.csv"),
            creatures_file: PathBuf::from("c.csv"),
            moves_per_creature: 2,
            seed: Some(7),
            max_turns: Some(500),
            log_path: Some(PathBuf::from("out.json")),
        };
        assert_eq!(parsed, Command::Run(expected));
        Ok(())
    }

    #[test]
    fn help_and_errors() {
        assert_eq!(parse_args(args(&["-h"])).unwrap(), Command::Help);
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--seed", "abc"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }
}
