use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rain_core::{BundleInfo, Msg};

/// One console line, parsed with the command name as argv[0].
#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    /// Look up the bundles uploaded under an issue
    Issue { issue_id: Option<String> },
    /// Open the n-th bundle (1-based) of the last issue listing
    Pick { index: usize },
    /// Open a bundle by hash
    Bundle { hash: String, name: Option<String> },
    /// List recent bundles, or open the n-th one (1-based)
    Recent { index: Option<usize> },
    /// Close the active bundle
    Clear,
    /// Open a node of the file tree: directories toggle, files are selected
    Open { node_id: String },
    /// Show the file tree and the selected node
    Tree,
    /// Upload log files as a new bundle of an issue
    Upload {
        issue_code: Option<String>,
        /// Optional bundle name
        #[arg(long)]
        name: Option<String>,
        files: Vec<PathBuf>,
    },
    /// Search the logs of a bundle (defaults to the active one)
    Search {
        #[arg(long)]
        bundle: Option<String>,
        /// Restrict hits to one timeline; omit to search all
        #[arg(long)]
        timeline: Option<String>,
        /// Search terms; the previous query is reused when empty
        query: Vec<String>,
    },
    /// Check that the backend is reachable
    Ping,
    /// Show every panel
    Status,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

/// Part of the screen a command wants printed once its requests settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Issue,
    Upload,
    Recent,
    Tree,
    Search,
    Health,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch {
        msgs: Vec<Msg>,
        sections: Vec<Section>,
    },
    /// Usage or parse error text to print as is.
    Print(String),
    Quit,
}

impl Command {
    fn dispatch(msgs: Vec<Msg>, sections: &[Section]) -> Self {
        Command::Dispatch {
            msgs,
            sections: sections.to_vec(),
        }
    }
}

/// Parses a console line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Command> {
    let words = match split_words(line) {
        Ok(words) => words,
        Err(message) => return Some(Command::Print(message)),
    };
    if words.is_empty() {
        return None;
    }

    let command = match ReplLine::try_parse_from(words) {
        Ok(parsed) => to_command(parsed.command),
        Err(err) => Command::Print(err.render().to_string()),
    };
    Some(command)
}

fn to_command(command: ReplCommand) -> Command {
    use Section::*;

    match command {
        ReplCommand::Issue { issue_id } => Command::dispatch(
            vec![
                Msg::IssueInputChanged(issue_id.unwrap_or_default()),
                Msg::IssueLookupSubmitted,
            ],
            &[Issue],
        ),
        ReplCommand::Pick { index } => match one_based(index) {
            Some(index) => Command::dispatch(vec![Msg::IssueBundlePicked(index)], &[Issue, Tree]),
            None => Command::Print("Bundle numbers start at 1".to_string()),
        },
        ReplCommand::Bundle { hash, name } => Command::dispatch(
            vec![Msg::BundleSelected(BundleInfo::new(
                hash,
                name.unwrap_or_default(),
                None,
            ))],
            &[Tree],
        ),
        ReplCommand::Recent { index: None } => Command::dispatch(Vec::new(), &[Recent]),
        ReplCommand::Recent { index: Some(index) } => match one_based(index) {
            Some(index) => Command::dispatch(vec![Msg::RecentBundlePicked(index)], &[Tree]),
            None => Command::Print("Recent bundle numbers start at 1".to_string()),
        },
        ReplCommand::Clear => Command::dispatch(vec![Msg::BundleCleared], &[Tree]),
        ReplCommand::Open { node_id } => {
            Command::dispatch(vec![Msg::NodeClicked(node_id)], &[Tree])
        }
        ReplCommand::Tree => Command::dispatch(Vec::new(), &[Tree]),
        ReplCommand::Upload {
            issue_code,
            name,
            files,
        } => Command::dispatch(
            vec![
                Msg::UploadIssueChanged(issue_code.unwrap_or_default()),
                Msg::UploadBundleNameChanged(name.unwrap_or_default()),
                Msg::UploadFilesChosen(files),
                Msg::UploadSubmitted,
            ],
            &[Upload, Issue, Tree],
        ),
        ReplCommand::Search {
            bundle,
            timeline,
            query,
        } => {
            let mut msgs = Vec::new();
            if let Some(bundle) = bundle {
                msgs.push(Msg::SearchBundleChanged(bundle));
            }
            if !query.is_empty() {
                msgs.push(Msg::SearchQueryChanged(query.join(" ")));
            }
            msgs.push(Msg::SearchTimelineChanged(timeline.unwrap_or_default()));
            msgs.push(Msg::SearchSubmitted);
            Command::dispatch(msgs, &[Search])
        }
        ReplCommand::Ping => Command::dispatch(vec![Msg::HealthCheckRequested], &[Health]),
        ReplCommand::Status => Command::dispatch(
            Vec::new(),
            &[Health, Recent, Issue, Upload, Tree, Search],
        ),
        ReplCommand::Quit => Command::Quit,
    }
}

fn one_based(index: usize) -> Option<usize> {
    index.checked_sub(1)
}

/// Splits a line into words, honouring single and double quotes and backslash escapes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (Some('"') | None, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("Line ends with a dangling backslash".to_string()),
            },
            (Some(_), ch) => current.push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, ch) if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, ch) => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
