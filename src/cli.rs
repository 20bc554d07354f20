//! Command line interface for the server binary.

use clap::{Parser, Subcommand};

/// User and group administration web application
#[derive(Parser, Debug)]
#[command(name = "nure-web-lab")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web server (default)
    Serve,
    /// Clear the existing data and create new tables
    InitDb,
    /// Create a group
    AddGroup(AddGroupArgs),
    /// Grant or revoke the admin flag for an existing user
    SetAdmin(SetAdminArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddGroupArgs {
    /// Group name, at most 150 characters
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct SetAdminArgs {
    /// Username of an existing user
    pub username: String,

    /// Remove the admin flag instead of granting it
    #[arg(long)]
    pub revoke: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["nure-web-lab"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_init_db() {
        let cli = Cli::try_parse_from(["nure-web-lab", "init-db"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::InitDb)));
    }

    #[test]
    fn test_set_admin_revoke() {
        let cli = Cli::try_parse_from(["nure-web-lab", "set-admin", "alice", "--revoke"]).unwrap();
        match cli.command {
            Some(Commands::SetAdmin(args)) => {
                assert_eq!(args.username, "alice");
                assert!(args.revoke);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_add_group_requires_name() {
        assert!(Cli::try_parse_from(["nure-web-lab", "add-group"]).is_err());
    }
}
