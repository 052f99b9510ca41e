use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use plume_core::{
    APOLOGY_MESSAGE, ChatSession, CompletionApi, Config, DisplaySurface, GeminiClient,
    RenderedMessage, Role, ThemeStore, enhance,
};

#[derive(Debug, Parser)]
#[command(name = "plume", version, about = "Chat with the Gemini API from the terminal")]
struct Cli {
    /// Send a single message and exit; without it an interactive loop starts
    message: Option<String>,

    /// Print the raw reply text instead of rendered HTML
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> plume_core::Result<()> {
    let config = Config::load()?;
    let client = GeminiClient::new(&config);
    let theme_store = ThemeStore::at_default_location();
    if let Some(store) = &theme_store {
        log::debug!("theme preference: {}", store.load());
    }

    let mut session = ChatSession::new();
    let mut surface = ConsoleSurface { raw: cli.raw };

    if let Some(message) = cli.message {
        exchange(&mut session, &client, &mut surface, &message, cli.raw);
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        eprint!("> ");
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            return Ok(());
        }
        let input = line.trim();

        match input {
            "" => {}
            "/clear" => session.clear_conversation(&mut surface),
            "/theme" => toggle_theme(theme_store.as_ref()),
            _ => exchange(&mut session, &client, &mut surface, input, cli.raw),
        }
    }
}

fn exchange(
    session: &mut ChatSession,
    client: &dyn CompletionApi,
    surface: &mut ConsoleSurface,
    text: &str,
    raw: bool,
) {
    let Some(payload) = session.submit(text, surface) else {
        return;
    };

    match client.generate(&payload) {
        Ok(reply) => {
            session.complete(&reply, surface);
            if raw {
                println!("{}", reply.trim_end());
            }
        }
        Err(err) => {
            session.fail(&err, surface);
            if raw {
                println!("{APOLOGY_MESSAGE}");
            }
        }
    }
}

fn toggle_theme(store: Option<&ThemeStore>) {
    let Some(store) = store else {
        log::warn!("no config directory, theme preference not persisted");
        return;
    };
    match store.toggle() {
        Ok(theme) => println!("theme: {theme}"),
        Err(err) => log::warn!("could not persist theme preference: {err}"),
    }
}

struct ConsoleSurface {
    raw: bool,
}

impl DisplaySurface for ConsoleSurface {
    fn show_message(&mut self, message: &RenderedMessage) {
        // The user's own line is already on screen.
        if message.sender == Role::User || self.raw {
            return;
        }
        println!("{}", enhance(&message.html_body));
    }

    fn show_pending(&mut self) {
        eprintln!("L'IA réfléchit…");
    }

    fn clear_pending(&mut self) {}

    fn clear_all(&mut self) {
        eprintln!("(conversation effacée)");
    }
}
