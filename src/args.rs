use std::env;
use thiserror::Error;

/// What the binary should do after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a benchmark series; unset values are resolved later
    Run {
        game: Option<String>,
        runs: Option<u32>,
        cooldown: Option<u64>,
    },
    List,
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Missing value for {0}")]
    MissingValue(&'static str),

    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },
}

impl Command {
    pub fn parse() -> Result<Self, ArgsError> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse arguments without the program name
    pub fn parse_from<I, T>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut args = args.into_iter().map(|arg| -> String { arg.into() });

        let mut game: Option<String> = None;
        let mut runs: Option<u32> = None;
        let mut cooldown: Option<u64> = None;
        let mut list = false;

        while let Some(arg) = args.next() {
            // Accept both "--runs 3" and "--runs=3"
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };

            if flag == "--help" || flag == "-h" {
                return Ok(Command::Help);
            } else if flag == "--version" || flag == "-v" {
                return Ok(Command::Version);
            } else if flag == "--list" || flag == "-l" {
                list = true;
            } else if flag == "--game" || flag == "-g" {
                game = Some(value_for("--game", inline, &mut args)?);
            } else if flag == "--runs" || flag == "-r" {
                let value = value_for("--runs", inline, &mut args)?;
                match value.parse::<u32>() {
                    Ok(n) if n > 0 => runs = Some(n),
                    _ => {
                        return Err(ArgsError::InvalidValue {
                            flag: "--runs",
                            value,
                        });
                    }
                }
            } else if flag == "--cooldown" || flag == "-c" {
                let value = value_for("--cooldown", inline, &mut args)?;
                match value.parse::<u64>() {
                    Ok(secs) => cooldown = Some(secs),
                    Err(_) => {
                        return Err(ArgsError::InvalidValue {
                            flag: "--cooldown",
                            value,
                        });
                    }
                }
            } else {
                return Err(ArgsError::UnknownArgument(arg));
            }
        }

        if list {
            return Ok(Command::List);
        }
        Ok(Command::Run {
            game,
            runs,
            cooldown,
        })
    }
}

fn value_for(
    flag: &'static str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = String>,
) -> Result<String, ArgsError> {
    inline
        .or_else(|| rest.next())
        .ok_or(ArgsError::MissingValue(flag))
}

pub fn print_help() {
    println!("🗡️ Katana Game Benchmark Automation");
    println!();
    println!("USAGE:");
    println!("    katana-bench [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --game, -g <ID>       Game to benchmark (prompted when omitted)");
    println!("    --runs, -r <N>        Number of benchmark runs (default from game config)");
    println!("    --cooldown, -c <S>    Cooldown between runs in seconds (default from game config)");
    println!("    --list, -l            List available games");
    println!("    --help, -h            Show this help message");
    println!("    --version, -v         Show version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG              Log filter (default: info)");
    println!("    KATANA_ASSETS_DIR     Template assets directory (default: assets)");
    println!("    KATANA_STEAM_PATH     Steam install directory");
    println!("    KATANA_CS2_PRESET     CS2 preset to apply: low, medium, high or a JSON file");
    println!("    KATANA_LOG_FILE       Log file (default: katana_benchmark.log, empty disables)");
    println!();
    println!("EXAMPLES:");
    println!("    katana-bench --list");
    println!("    katana-bench --game cs2 --runs 3 --cooldown 60");
    println!("    katana-bench -g cs2");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, ArgsError> {
        Command::parse_from(args.iter().copied())
    }

    #[test]
    fn test_no_args_runs_interactively() {
        assert_eq!(
            parse(&[]),
            Ok(Command::Run {
                game: None,
                runs: None,
                cooldown: None
            })
        );
    }

    #[test]
    fn test_long_and_short_flags() {
        let expected = Ok(Command::Run {
            game: Some("cs2".to_string()),
            runs: Some(3),
            cooldown: Some(60),
        });
        assert_eq!(parse(&["--game", "cs2", "--runs", "3", "--cooldown", "60"]), expected);
        assert_eq!(parse(&["-g", "cs2", "-r", "3", "-c", "60"]), expected);
        assert_eq!(parse(&["--game=cs2", "--runs=3", "--cooldown=60"]), expected);
    }

    #[test]
    fn test_list_help_version() {
        assert_eq!(parse(&["--list"]), Ok(Command::List));
        assert_eq!(parse(&["-l", "-g", "cs2"]), Ok(Command::List));
        assert_eq!(parse(&["-h"]), Ok(Command::Help));
        assert_eq!(parse(&["--version"]), Ok(Command::Version));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse(&["--runs", "0"]),
            Err(ArgsError::InvalidValue {
                flag: "--runs",
                value: "0".to_string()
            })
        );
        assert_eq!(
            parse(&["-c", "-5"]),
            Err(ArgsError::InvalidValue {
                flag: "--cooldown",
                value: "-5".to_string()
            })
        );
        assert_eq!(parse(&["--game"]), Err(ArgsError::MissingValue("--game")));
        assert_eq!(
            parse(&["--fast"]),
            Err(ArgsError::UnknownArgument("--fast".to_string()))
        );
    }
}
