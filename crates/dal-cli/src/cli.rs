use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dal_node::NodeType;

#[derive(Parser)]
#[command(
    name = "dal",
    about = "Data-availability blob/share codec",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Split blobs into namespace-ordered shares
    Split(SplitArgs),
    /// Parse raw shares and reassemble their sequences
    Parse(ParseArgs),
    /// Map a flat share index to its (row, col) grid cell
    Locate(LocateArgs),
    /// Create or show node configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct SplitArgs {
    /// JSON array of blobs: {"namespace": hex, "data": hex | "text": utf8, "share_version": n}
    #[arg(short, long)]
    pub input: PathBuf,
    /// Write one hex-encoded share per line to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// File with one hex-encoded share per line
    #[arg(short, long)]
    pub input: PathBuf,
    /// Row width used to report grid positions
    #[arg(long)]
    pub row_width: Option<usize>,
}

#[derive(Args)]
pub struct LocateArgs {
    #[arg(long)]
    pub row_width: usize,
    #[arg(long)]
    pub index: usize,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        #[arg(long, default_value = "dal.toml")]
        path: PathBuf,
        #[arg(long, default_value = "light")]
        node_type: NodeType,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration, or the defaults if no file is given
    Show {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_split() {
        let cli = Cli::try_parse_from(["dal", "split", "--input", "blobs.json"]).unwrap();
        if let Command::Split(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("blobs.json"));
            assert!(args.output.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_split_with_output() {
        let cli = Cli::try_parse_from(["dal", "split", "-i", "b.json", "-o", "s.hex"]).unwrap();
        if let Command::Split(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("s.hex")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_parse_with_row_width() {
        let cli = Cli::try_parse_from(["dal", "parse", "--input", "s.hex", "--row-width", "8"]).unwrap();
        if let Command::Parse(args) = cli.command {
            assert_eq!(args.row_width, Some(8));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_locate() {
        let cli = Cli::try_parse_from(["dal", "locate", "--row-width", "4", "--index", "9"]).unwrap();
        if let Command::Locate(args) = cli.command {
            assert_eq!((args.row_width, args.index), (4, 9));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn locate_requires_index() {
        assert!(Cli::try_parse_from(["dal", "locate", "--row-width", "4"]).is_err());
    }

    #[test]
    fn parse_config_init() {
        let cli = Cli::try_parse_from(["dal", "config", "init", "--node-type", "bridge", "--force"]).unwrap();
        if let Command::Config(ConfigArgs { action: ConfigAction::Init { path, node_type, force } }) = cli.command {
            assert_eq!(path, PathBuf::from("dal.toml"));
            assert_eq!(node_type, NodeType::Bridge);
            assert!(force);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn global_flags() {
        let cli = Cli::try_parse_from(["dal", "locate", "--row-width", "1", "--index", "0", "-v", "--format", "json"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
