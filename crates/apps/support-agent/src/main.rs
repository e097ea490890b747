//! support-agent - Gmail tools for a customer support workflow
//!
//! Each subcommand performs one short sequence of Gmail (or Emailit) calls
//! and prints the result in the requested format.

use std::process::ExitCode;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgGroup, Parser, Subcommand};

mod commands;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "support-agent",
    version,
    about = "Gmail support agent: read, search, reply, archive and label mail",
    after_help = "On first use a browser window opens for Gmail authorization.\n\
                  The token is saved in $TOKEN_DIR/token.json (default ~/.support-agent)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List messages from the inbox with filters
    ReadMessages {
        /// Show only unread messages
        #[arg(long)]
        unread: bool,
        /// Filter by sender
        #[arg(long, value_name = "EMAIL")]
        from: Option<String>,
        /// Filter by subject
        #[arg(long, value_name = "TEXT")]
        subject: Option<String>,
        /// Filter by label
        #[arg(long)]
        label: Option<String>,
        /// Maximum number of results
        #[arg(long, default_value_t = mail::query::DEFAULT_LIST_LIMIT)]
        limit: u32,
        #[arg(long, value_enum, default_value_t = OutputFormat::Simple)]
        output: OutputFormat,
    },
    /// Show a full conversation thread
    ReadThreads {
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        thread_id: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Simple)]
        output: OutputFormat,
    },
    /// Show one message with its body and attachments
    ReadMessageDetail {
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        message_id: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Detailed)]
        output: OutputFormat,
    },
    /// Search using Gmail query syntax
    #[command(after_help = "Example queries:\n  \
                            from:user@example.com\n  \
                            subject:\"important update\"\n  \
                            after:2024/1/1 before:2024/2/1\n  \
                            has:attachment\n  \
                            is:unread label:important")]
    SearchMessages {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = mail::query::DEFAULT_SEARCH_LIMIT)]
        limit: u32,
        #[arg(long, value_enum, default_value_t = OutputFormat::Simple)]
        output: OutputFormat,
    },
    /// Send a reply to a message
    ReplyMessage {
        /// Message being replied to
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        message_id: String,
        /// Reply text
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        body: String,
        /// Thread to post into (defaults to the original's thread)
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        thread_id: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Simple)]
        output: OutputFormat,
    },
    /// Archive a message or a whole thread
    #[command(group(ArgGroup::new("target").required(true).multiple(true).args(["message_id", "thread_id"])))]
    ArchiveMessage {
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        message_id: Option<String>,
        /// Takes precedence over --message-id
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        thread_id: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Simple)]
        output: OutputFormat,
    },
    /// Add or remove labels on a message or thread
    #[command(group(ArgGroup::new("target").required(true).multiple(true).args(["message_id", "thread_id"])))]
    #[command(group(ArgGroup::new("change").required(true).multiple(true).args(["add_label", "remove_label"])))]
    LabelMessage {
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        message_id: Option<String>,
        /// Takes precedence over --message-id
        #[arg(long, value_name = "ID", value_parser = NonEmptyStringValueParser::new())]
        thread_id: Option<String>,
        /// Comma-separated labels to add
        #[arg(long, value_name = "LABELS", value_parser = NonEmptyStringValueParser::new())]
        add_label: Option<String>,
        /// Comma-separated labels to remove
        #[arg(long, value_name = "LABELS", value_parser = NonEmptyStringValueParser::new())]
        remove_label: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Simple)]
        output: OutputFormat,
    },
    /// Manage the Emailit suppression list (needs EMAILIT_API_KEY)
    #[command(group(ArgGroup::new("action").required(true).args(["list", "check", "remove"])))]
    Suppressions {
        /// List all suppressions
        #[arg(long)]
        list: bool,
        /// Check whether an address is suppressed
        #[arg(long, value_name = "EMAIL", value_parser = NonEmptyStringValueParser::new())]
        check: Option<String>,
        /// Lift the suppression for an address
        #[arg(long, value_name = "EMAIL", value_parser = NonEmptyStringValueParser::new())]
        remove: Option<String>,
    },
    /// Authorize Gmail access and cache the token
    Login,
    /// Delete the cached token
    Logout,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();

    match command {
        Commands::ReadMessages {
            unread,
            from,
            subject,
            label,
            limit,
            output,
        } => {
            let filter = mail::ListFilter {
                unread,
                from,
                subject,
                label,
            };
            commands::read::read_messages(&commands::connect()?, &filter, limit, output, &mut out)
        }
        Commands::ReadThreads { thread_id, output } => {
            commands::read::read_thread(&commands::connect()?, &thread_id, output, &mut out)
        }
        Commands::ReadMessageDetail { message_id, output } => {
            commands::read::read_message_detail(&commands::connect()?, &message_id, output, &mut out)
        }
        Commands::SearchMessages {
            query,
            limit,
            output,
        } => commands::read::search_messages(&commands::connect()?, &query, limit, output, &mut out),
        Commands::ReplyMessage {
            message_id,
            body,
            thread_id,
            output,
        } => commands::write::reply(
            &commands::connect()?,
            &message_id,
            &body,
            thread_id.as_deref(),
            output,
            &mut out,
        ),
        Commands::ArchiveMessage {
            message_id,
            thread_id,
            output,
        } => commands::write::archive(
            &commands::connect()?,
            message_id.as_deref(),
            thread_id.as_deref(),
            output,
            &mut out,
        ),
        Commands::LabelMessage {
            message_id,
            thread_id,
            add_label,
            remove_label,
            output,
        } => commands::write::label(
            &commands::connect()?,
            message_id.as_deref(),
            thread_id.as_deref(),
            add_label.as_deref(),
            remove_label.as_deref(),
            output,
            &mut out,
        ),
        Commands::Suppressions {
            list,
            check,
            remove,
        } => {
            let client = mail::SuppressionClient::from_env()?;
            let action = if list {
                commands::suppressions::Action::List
            } else if let Some(email) = check {
                commands::suppressions::Action::Check(email)
            } else if let Some(email) = remove {
                commands::suppressions::Action::Remove(email)
            } else {
                anyhow::bail!("specify an action: --list, --check EMAIL or --remove EMAIL");
            };
            commands::suppressions::run(&client, action, &mut out)
        }
        Commands::Login => commands::auth::login(&mut out),
        Commands::Logout => commands::auth::logout(&mut out),
    }
}
