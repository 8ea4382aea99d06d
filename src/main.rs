use std::sync::Arc;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use gita_core::{
    probe_from_config, resolver_from_config, Config, GitaClient, ProbeMode, Resolution,
    SearchEngine, VerseBackend, VerseRef,
};

mod app;
mod browser;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use browser::SystemBrowser;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "gita")]
#[command(about = "Read random Bhagavad Gita verses and look up explanations")]
struct Cli {
    /// Verse server URL (overrides config and GITA_SERVER_URL)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Link check before explain: none, direct or proxy
    #[arg(long, global = true)]
    probe: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one random verse and print it
    Verse,
    /// Print the reference and search URLs for a verse
    Urls {
        chapter: u8,
        verse: u16,
    },
    /// Find a reachable explanation page for a verse
    Explain {
        chapter: u8,
        verse: u16,
    },
    /// Save the effective settings (including flags) to the config file
    SaveConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(probe) = cli.probe {
        config.probe = ProbeMode::from_str(&probe)
            .ok_or_else(|| anyhow!("Unknown probe mode '{}' (expected none, direct or proxy)", probe))?;
    }

    match cli.command {
        None => {
            logging::init_file(&Config::config_dir()?)?;
            run_tui(config).await
        }
        Some(command) => {
            logging::init_stderr();
            match command {
                Commands::Verse => print_verse(&config).await,
                Commands::Urls { chapter, verse } => print_urls(&config, parse_ref(chapter, verse)?),
                Commands::Explain { chapter, verse } => {
                    explain(&config, parse_ref(chapter, verse)?).await
                }
                Commands::SaveConfig => {
                    config.save()?;
                    println!("Saved {}", Config::config_path()?.display());
                    Ok(())
                }
            }
        }
    }
}

fn parse_ref(chapter: u8, verse: u16) -> Result<VerseRef> {
    let reference = VerseRef::new(chapter, verse);
    if !reference.is_valid() {
        return Err(anyhow!("Bhagavad Gita has no verse {}", reference));
    }
    Ok(reference)
}

async fn run_tui(config: Config) -> Result<()> {
    tracing::info!("starting against {} (probe: {})", config.server_url, config.probe.as_str());

    let mut events = EventHandler::new();
    let mut app = App::new(
        Arc::new(GitaClient::new(&config.server_url)),
        probe_from_config(&config),
        resolver_from_config(&config),
        Arc::new(SystemBrowser),
        events.sender(),
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    app.request_verse();
    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

async fn print_verse(config: &Config) -> Result<()> {
    let client = GitaClient::new(&config.server_url);
    let verse = client.fetch_verse().await?;

    println!("Chapter {}, Verse {}\n", verse.chapter, verse.verse_number);
    println!("{}", verse.text);
    if !verse.transliteration.is_empty() {
        println!("\n{}", verse.transliteration);
    }
    if !verse.meaning.is_empty() {
        println!("\n{}", verse.meaning);
    }
    Ok(())
}

fn print_urls(config: &Config, reference: VerseRef) -> Result<()> {
    let resolver = resolver_from_config(config);
    let (chapter, verse) = (reference.chapter, reference.verse);

    println!("primary:   {}", resolver.resolve_primary_url(chapter, verse));
    println!("secondary: {}", resolver.resolve_secondary_url(chapter, verse));
    println!("google:    {}", resolver.resolve_search_url(SearchEngine::Google, chapter, verse));
    println!("youtube:   {}", resolver.resolve_search_url(SearchEngine::YouTube, chapter, verse));
    Ok(())
}

async fn explain(config: &Config, reference: VerseRef) -> Result<()> {
    let resolver = resolver_from_config(config);

    let Some(probe) = probe_from_config(config) else {
        println!("{}", resolver.resolve_primary_url(reference.chapter, reference.verse));
        return Ok(());
    };

    match resolver.resolve_with_fallback(probe.as_ref(), reference).await {
        Resolution::Found(url) => {
            println!("{}", url);
            Ok(())
        }
        Resolution::NotFound => Err(anyhow!("No explanation available for verse {}", reference)),
    }
}
