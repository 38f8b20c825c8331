//! ClinicalThread CLI - clinical discussion summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use clinicalthread::discussion::sample_discussion;
use clinicalthread::logging::{self, LogTarget};
use clinicalthread::session::CommentOutcome;
use clinicalthread::{ui, AnthropicClient, CommentId, Config, Discussion, Session};

#[derive(Parser)]
#[command(name = "clinicalthread")]
#[command(author, version, about = "TUI for reading and summarising clinical discussions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise the whole discussion
    Summarise,
    /// Summarise a single comment
    Comment {
        /// Comment id as shown by `list`
        id: i64,
    },
    /// Print the discussion
    List,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Summarise) => {
            logging::setup_logging(LogTarget::Stderr)?;
            let config = Config::load()?;
            let backend = AnthropicClient::new(&config)?;
            let mut session = Session::new(Discussion::with_comments(sample_discussion()));

            println!(
                "Summarising {} comments...\n",
                session.discussion().len()
            );
            if let Some(Err(kind)) = session.summarize_discussion(&backend).await {
                let notice = session.notice().map(|n| n.detail.clone()).unwrap_or_default();
                anyhow::bail!("{kind:?} failure: {notice}");
            }

            if let Some(summary) = session.discussion().discussion_summary() {
                println!("{}", "TL;DR".bold());
                println!("  {}\n", summary.tldr.italic());

                if !summary.consensus.is_empty() {
                    println!("{}", "Consensus Points".bold());
                    for point in &summary.consensus {
                        println!("  {} {}", "✓".green(), point);
                    }
                    println!();
                }

                if !summary.action_items.is_empty() {
                    println!("{}", "Action Items".bold());
                    for (index, item) in summary.action_items.iter().enumerate() {
                        println!("  {}. {}", index + 1, item);
                    }
                    println!();
                }

                if !summary.key_insights.is_empty() {
                    println!("{}", "Notable Expert Opinions".bold());
                    for insight in &summary.key_insights {
                        println!("  {}: {}", insight.author.cyan(), insight.insight);
                    }
                }
            }
        }
        Some(Commands::Comment { id }) => {
            logging::setup_logging(LogTarget::Stderr)?;
            let config = Config::load()?;
            let backend = AnthropicClient::new(&config)?;
            let mut session = Session::new(Discussion::with_comments(sample_discussion()));
            let id = CommentId(id);

            match session.summarize_comment(&backend, id).await {
                CommentOutcome::Unknown => anyhow::bail!("no comment with id {id}"),
                CommentOutcome::Failed(kind) => {
                    let notice = session.notice().map(|n| n.detail.clone()).unwrap_or_default();
                    anyhow::bail!("{kind:?} failure: {notice}");
                }
                CommentOutcome::Summarized | CommentOutcome::Cached | CommentOutcome::Busy => {}
            }

            let discussion = session.discussion();
            if let (Some(comment), Some(summary)) = (discussion.get(id), discussion.comment_summary(id)) {
                println!("{} ({})\n", comment.author.bold(), comment.specialty);
                println!("{}", summary.summary);
                println!("\n{} {}", "Key point:".green().bold(), summary.key_point);
            }
        }
        Some(Commands::List) => {
            let discussion = Discussion::with_comments(sample_discussion());
            println!(
                "{} replies · {} physicians\n",
                discussion.len(),
                discussion.participants()
            );
            for comment in discussion.comments() {
                println!(
                    "[{}] {} ({}) · {}",
                    comment.id,
                    comment.author.bold(),
                    comment.specialty,
                    comment.time.dimmed()
                );
                println!("    {}\n", comment.text);
            }
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "clinicalthread",
                &mut std::io::stdout(),
            );
        }
        None => {
            // Default: Launch the TUI
            let config = Config::load()?;
            logging::setup_logging(LogTarget::in_dir(&config.logging.dir))?;
            ui::run(&config).await?;
        }
    }

    Ok(())
}
