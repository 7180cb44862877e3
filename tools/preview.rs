/// Preview: interactive shell for trying out a section bundle.
///
/// Usage: preview --bundle <path> [--subject <id>] [--config <path>]
///
/// Narration is printed to the terminal. Nothing finishes speaking on its
/// own: use `next` to complete the current sentence.
///
/// Commands:
///   show  print visible sections and proposals
///   reveal <id>  expand a proposed section
///   style <name>  switch presentation style
///   depth <short|normal|deep>  switch reading depth
///   interests <tag1,tag2>  replace the interest set
///   play | stop | toggle  control narration
///   seek <n>  play from global sentence n
///   next  finish the current sentence
///   help  list commands
///   quit  exit

use narrative_playback::core::config::EngineConfig;
use narrative_playback::core::playback::{Narrator, PlaybackState, UtteranceId};
use narrative_playback::core::session::NarrativeSession;
use narrative_playback::core::store::{MemoryContentStore, SectionBundle};
use narrative_playback::schema::profile::{
    DepthPreference, InterestTag, PresentationStyle, UserPreferenceProfile,
};
use narrative_playback::schema::section::SectionId;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Prints utterances instead of speaking them.
#[derive(Debug, Default)]
struct ConsoleNarrator {
    current: Option<UtteranceId>,
}

impl Narrator for ConsoleNarrator {
    fn speak(&mut self, utterance: UtteranceId, text: &str) {
        self.current = Some(utterance);
        println!("  >> [{}] {}", utterance.0, text);
    }

    fn cancel_all(&mut self) {
        if self.current.take().is_some() {
            println!("  >> (silenced)");
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut bundle_path = None;
    let mut subject = None;
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bundle" if i + 1 < args.len() => {
                i += 1;
                bundle_path = Some(args[i].clone());
            }
            "--subject" if i + 1 < args.len() => {
                i += 1;
                subject = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(bundle_path) = bundle_path else {
        eprintln!("ERROR: --bundle is required");
        print_usage();
        std::process::exit(1);
    };

    let bundle = match SectionBundle::load_from_ron(Path::new(&bundle_path)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("ERROR: Failed to load bundle: {}", e);
            std::process::exit(1);
        }
    };

    let subject = match subject.or_else(|| bundle.subjects().first().map(|s| s.to_string())) {
        Some(s) => s,
        None => {
            eprintln!("ERROR: Bundle has no sections");
            std::process::exit(1);
        }
    };

    let config = match config_path {
        Some(ref path) => match EngineConfig::load_from_ron(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let store = MemoryContentStore::from_bundle(bundle);
    let session = NarrativeSession::builder(ConsoleNarrator::default())
        .config(config)
        .from_store(&store, &subject)
        .and_then(|builder| builder.build());
    let mut session = match session {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("Subject: {}", subject);
    println!("Type 'help' for commands.\n");
    print_overview(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                session.stop();
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "show" => {
                print_overview(&session);
            }
            "reveal" => {
                if parts.len() < 2 {
                    println!("Usage: reveal <section-id>");
                    continue;
                }
                let id = SectionId::from(parts[1]);
                if session.reveal(&id) {
                    println!("Revealed '{}'", id);
                    print_overview(&session);
                } else {
                    println!("'{}' is not a hidden section", id);
                }
            }
            "style" => {
                if parts.len() < 2 {
                    println!(
                        "Current style: {}",
                        session.profile().presentation_style
                    );
                    continue;
                }
                session.set_style(PresentationStyle::new(parts[1]));
                println!("Style set to '{}'", parts[1]);
            }
            "depth" => {
                let depth = match parts.get(1).and_then(|s| DepthPreference::parse(s)) {
                    Some(d) => d,
                    None => {
                        println!("Usage: depth <short|normal|deep>");
                        println!("  Current: {}", session.profile().depth.name());
                        continue;
                    }
                };
                session.set_depth(depth);
                println!(
                    "Depth set to {} (~{:.1} min visible)",
                    depth.name(),
                    session.estimated_minutes()
                );
            }
            "interests" => {
                if parts.len() < 2 {
                    let names: Vec<&str> = InterestTag::ALL
                        .iter()
                        .map(|t| t.name())
                        .collect();
                    println!("Usage: interests <tag1,tag2,...>");
                    println!("  tags: {}", names.join(", "));
                    continue;
                }
                let mut interests = Vec::new();
                let mut unknown = Vec::new();
                for tag in parts[1].split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    match InterestTag::parse(tag) {
                        Some(t) => interests.push(t),
                        None => unknown.push(tag),
                    }
                }
                if !unknown.is_empty() {
                    println!("Unknown interest tags: {}", unknown.join(", "));
                    continue;
                }
                let current = session.profile().clone();
                session.set_profile(UserPreferenceProfile::new(
                    &interests,
                    current.depth,
                    current.presentation_style.name(),
                ));
                print_overview(&session);
            }
            "play" => {
                session.start();
                if !session.is_playing() {
                    println!("Nothing left to narrate.");
                }
            }
            "stop" => {
                session.stop();
            }
            "toggle" => {
                session.toggle();
            }
            "seek" => {
                match parts.get(1).and_then(|s| s.parse::<usize>().ok()) {
                    Some(n) => session.play_from(n),
                    None => println!("Usage: seek <sentence-index>"),
                }
            }
            "next" => {
                match session.narrator_mut().current.take() {
                    Some(utterance) => session.on_narration_complete(utterance),
                    None => println!("Nothing is being narrated."),
                }
                if let PlaybackState::Idle(at) = session.playback_state() {
                    println!("Idle at sentence {}", at);
                }
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn print_overview<N: Narrator>(session: &NarrativeSession<N>) {
    println!("\n--- Visible ---");
    for entry in session.visible_sections() {
        let first = session
            .section_reader_data(entry.id())
            .map(|d| d.start_sentence_index)
            .unwrap_or(0);
        println!("  [{:>3}] {} ({})", first, entry.display_title, entry.id());
    }
    let proposals = session.proposals();
    if !proposals.is_empty() {
        println!("--- Also available ---");
        for proposal in &proposals {
            println!("  {}: {}", proposal.id, proposal.teaser);
        }
    }
    println!(
        "--- {} sentences, ~{:.1} min, {:?} ---\n",
        session.sentences().len(),
        session.estimated_minutes(),
        session.playback_state()
    );
}

fn print_usage() {
    println!("Usage: preview --bundle <path> [--subject <id>] [--config <path>]");
    println!();
    println!("Options:");
    println!("  --bundle <path>    RON section bundle");
    println!("  --subject <id>     Subject to open (defaults to the first in the bundle)");
    println!("  --config <path>    Engine config RON file");
    println!();
    println!("Set RUST_LOG=narrative_playback=debug to see playback events.");
}

fn print_help() {
    println!("Commands:");
    println!("  show                        Print visible sections and proposals");
    println!("  reveal <id>                 Expand a proposed section");
    println!("  style <name>                Switch presentation style");
    println!("  depth <short|normal|deep>   Switch reading depth");
    println!("  interests <tag1,tag2>       Replace the interest set");
    println!("  play | stop | toggle        Control narration");
    println!("  seek <n>                    Play from global sentence n");
    println!("  next                        Finish the current sentence");
    println!("  help                        Show this help");
    println!("  quit                        Exit");
}
