use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shortlink_common::ViewMode;

#[derive(Parser, Debug)]
#[command(name = "shortlink", version, about = "Short-link admin console")]
pub struct Cli {
    /// Config file (defaults to ./shortlink.toml when present)
    #[arg(long, global = true, env = "SHORTLINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "SHORTLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// Ask the backend whether the stored session is still valid
    Check,
    /// Create an account
    Register(RegisterArgs),
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Show or switch the link listing between normal and recycle bin
    View { mode: Option<ViewMode> },
    Groups {
        #[command(subcommand)]
        command: GroupCommand,
    },
    Links {
        #[command(subcommand)]
        command: LinkCommand,
    },
    Recycle {
        #[command(subcommand)]
        command: RecycleCommand,
    },
    Stats {
        #[command(subcommand)]
        command: StatsCommand,
    },
    /// Geolocate an IP address (your own when omitted)
    Locate {
        ip: Option<String>,
        /// Ask the provider directly instead of the backend cache
        #[arg(long)]
        direct: bool,
    },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long, short)]
    pub username: String,
    #[arg(long, short, env = "SHORTLINK_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, default_value = "")]
    pub realname: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long)]
    pub mail: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Fetch the signed-in user's profile
    Show {
        /// Unmasked phone and mail
        #[arg(long)]
        actual: bool,
    },
    Update {
        #[arg(long)]
        realname: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        mail: Option<String>,
        #[arg(long, env = "SHORTLINK_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    List,
    Create { name: String },
    Rename { gid: String, name: String },
    Delete { gid: String },
    /// Reorder groups; gids in the desired order
    Sort {
        #[arg(required = true)]
        gids: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: i64,
    #[arg(long, default_value_t = 10)]
    pub size: i64,
}

#[derive(Args, Debug, Clone)]
pub struct ValidityArgs {
    /// Expiry as `YYYY-MM-DD HH:MM:SS`; permanent when omitted
    #[arg(long)]
    pub valid_until: Option<String>,
    #[arg(long)]
    pub describe: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// List links in a group (the recycle bin in recycle view)
    List {
        #[arg(long)]
        gid: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        gid: String,
        url: String,
        #[command(flatten)]
        validity: ValidityArgs,
    },
    Batch {
        #[arg(long)]
        gid: String,
        #[arg(required = true)]
        urls: Vec<String>,
        #[command(flatten)]
        validity: ValidityArgs,
    },
    Update {
        #[arg(long)]
        gid: String,
        full_short_url: String,
        url: String,
        #[command(flatten)]
        validity: ValidityArgs,
    },
    /// Fetch a page title through the backend
    Title { url: String },
}

#[derive(Args, Debug)]
pub struct LinkRef {
    #[arg(long)]
    pub gid: String,
    pub full_short_url: String,
}

#[derive(Subcommand, Debug)]
pub enum RecycleCommand {
    List {
        #[arg(long)]
        gid: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Move a link into the recycle bin
    Save(LinkRef),
    /// Restore a link from the recycle bin
    Recover(LinkRef),
    /// Delete a recycled link permanently
    Remove(LinkRef),
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DateRange {
    /// First day, `YYYY-MM-DD` (default: today)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day, `YYYY-MM-DD` (default: `--from`)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum StatsCommand {
    Link {
        #[command(flatten)]
        link: LinkRef,
        #[command(flatten)]
        range: DateRange,
    },
    Group {
        #[arg(long)]
        gid: String,
        #[command(flatten)]
        range: DateRange,
    },
    /// Individual visits of one link
    Access {
        #[command(flatten)]
        link: LinkRef,
        #[command(flatten)]
        range: DateRange,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Individual visits across a group
    GroupAccess {
        #[arg(long)]
        gid: String,
        #[command(flatten)]
        range: DateRange,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["shortlink", "groups", "sort", "g2", "g1"]).unwrap();
        match cli.command {
            Command::Groups { command: GroupCommand::Sort { gids } } => assert_eq!(gids, ["g2", "g1"]),
            other => panic!("unexpected {other:?}"),
        }

        let cli = Cli::try_parse_from(["shortlink", "view", "recycle"]).unwrap();
        assert!(matches!(cli.command, Command::View { mode: Some(ViewMode::Recycle) }));

        let cli = Cli::try_parse_from([
            "shortlink", "stats", "link", "--gid", "g1", "s.io/abc", "--from", "2024-05-01",
        ])
        .unwrap();
        match cli.command {
            Command::Stats { command: StatsCommand::Link { link, range } } => {
                assert_eq!(link.full_short_url, "s.io/abc");
                assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 5, 1));
                assert!(range.to.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
