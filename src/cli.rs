//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use maze_game::Difficulty;

/// Walk a randomly generated maze from the top-left to the bottom-right corner
#[derive(Parser, Debug)]
#[command(name = "maze")]
#[command(version)]
pub struct Cli {
    /// Skip the menu and start at this difficulty
    #[arg(short, long, value_parser = parse_difficulty)]
    pub difficulty: Option<Difficulty>,

    /// Seed for the maze generator; random when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// File that receives log output (RUST_LOG sets the filter)
    #[arg(long, default_value = "maze.log")]
    pub log_file: PathBuf,
}

/// Case-insensitive difficulty name.
fn parse_difficulty(name: &str) -> Result<Difficulty, String> {
    Difficulty::ALL
        .into_iter()
        .find(|difficulty| difficulty.to_string().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown difficulty {name:?}, expected easy, medium or hard"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_difficulty_and_seed() {
        let cli = Cli::parse_from(["maze", "--difficulty", "hard", "--seed", "42"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.log_file, PathBuf::from("maze.log"));
    }

    #[test]
    fn difficulty_names_ignore_case() {
        let cli = Cli::parse_from(["maze", "-d", "MEDIUM"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Medium));
        assert_eq!(parse_difficulty("easy"), Ok(Difficulty::Easy));
        assert!(parse_difficulty("extreme").is_err());
        assert!(Cli::try_parse_from(["maze", "--difficulty", "extreme"]).is_err());
    }

    #[test]
    fn defaults_to_menu() {
        let cli = Cli::parse_from(["maze"]);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.seed, None);
    }
}
