use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pe", about = concat!("postedit v", env!("CARGO_PKG_VERSION"), " - edit posts in place"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (config, local storage, log)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List posts from the backend
    List,
    /// Edit a post without the TUI
    Edit(EditArgs),
    /// Show the signed-in user, or change it
    User(UserArgs),
}

#[derive(Args)]
pub struct EditArgs {
    /// Post ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New body
    #[arg(long)]
    pub body: Option<String>,
    /// New tags, '#'-separated (e.g. "red#blue")
    #[arg(long)]
    pub tags: Option<String>,
    /// New media URL (empty to clear)
    #[arg(long)]
    pub media: Option<String>,
}

#[derive(Args)]
pub struct UserArgs {
    /// Display name to store
    pub name: Option<String>,
    /// Access token sent as a bearer token (empty to clear)
    #[arg(long)]
    pub token: Option<String>,
    /// Per-user API base URL (empty to clear)
    #[arg(long = "api-base")]
    pub api_base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["pe"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn edit_args() {
        let cli = Cli::try_parse_from([
            "pe", "-C", "/tmp/x", "edit", "42", "--title", "New", "--tags", "a#b", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir.as_deref(), Some("/tmp/x"));
        let Some(Commands::Edit(args)) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.id, "42");
        assert_eq!(args.title.as_deref(), Some("New"));
        assert_eq!(args.body, None);
        assert_eq!(args.tags.as_deref(), Some("a#b"));
    }

    #[test]
    fn user_args() {
        let cli = Cli::try_parse_from(["pe", "user", "ada", "--token", "t"]).unwrap();
        let Some(Commands::User(args)) = cli.command else {
            panic!("expected user");
        };
        assert_eq!(args.name.as_deref(), Some("ada"));
        assert_eq!(args.token.as_deref(), Some("t"));
        assert_eq!(args.api_base, None);
    }

    #[test]
    fn edit_requires_id() {
        assert!(Cli::try_parse_from(["pe", "edit"]).is_err());
    }
}
