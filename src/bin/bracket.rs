use std::path::PathBuf;

use bracket_board::config::{BracketConfig, Sources};
use bracket_board::pipeline::load_bracket;
use bracket_board::render::text::{invite_text, priority_text, recipe_text};
use bracket_board::render::{render_svg, SvgTheme};
use bracket_board::resources::load_auxiliary;
use bracket_board::{BracketError, MatchKey, Size};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bracket", about = "Lay out and render a single-elimination bracket")]
struct Cli {
    /// JSON config file with `layout` and `sources` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Match-results CSV (path or URL)
    #[arg(long, global = true)]
    matches: Option<String>,
    /// Recipe book JSON (path or URL)
    #[arg(long, global = true)]
    recipes: Option<String>,
    /// Invite list JSON (path or URL)
    #[arg(long, global = true)]
    invites: Option<String>,
    /// Tab-delimited priority list (path or URL)
    #[arg(long, global = true)]
    priority: Option<String>,
}

impl From<SourceArgs> for Sources {
    fn from(args: SourceArgs) -> Self {
        Sources {
            matches: args.matches,
            recipes: args.recipes,
            invites: args.invites,
            priority: args.priority,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the bracket as SVG
    Render {
        /// Viewport width the columns are fitted to
        #[arg(long, default_value_t = 1600.0)]
        width: f32,
        /// Output file; stdout when omitted
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Show the recipe for a drink
    Recipe { name: String },
    /// Show the invite for a match
    Invite {
        #[arg(long)]
        round: u32,
        #[arg(long = "match")]
        number: u32,
    },
    /// Show the ranked priority list
    Priority,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BracketConfig::load(cli.config.as_deref())?;
    let sources = config
        .sources
        .overridden_by(cli.sources.into())
        .with_env_defaults();

    match cli.command {
        Command::Render { width, out } => {
            let viewport = Size::new(width, 0.0);
            let (bracket, _aux, err) = load_bracket(&sources, config.layout, viewport).await;
            let svg = render_svg(&bracket, &SvgTheme::default());
            match out {
                Some(path) => {
                    std::fs::write(&path, svg)?;
                    tracing::info!(path = %path.display(), "wrote bracket");
                }
                None => println!("{svg}"),
            }
            if let Some(err) = err {
                return Err(err.into());
            }
        }
        Command::Recipe { name } => {
            let aux = load_auxiliary(&sources).await;
            print!("{}", recipe_text(&aux.recipes.view(&name)));
        }
        Command::Invite { round, number } => {
            let aux = load_auxiliary(&sources).await;
            match aux.invites.get(MatchKey::new(round, number)) {
                Some(invite) => print!("{}", invite_text(invite)),
                None => println!("No invite for round {round}, match {number}."),
            }
        }
        Command::Priority => {
            if sources.priority.is_none() {
                return Err(BracketError::MissingSource("priority list").into());
            }
            let aux = load_auxiliary(&sources).await;
            print!("{}", priority_text(&aux.priority));
        }
    }

    Ok(())
}
