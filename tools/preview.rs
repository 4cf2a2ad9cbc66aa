/// Preview — generate fruits and print the chat that introduces them.
///
/// Usage: preview [--kind apple|orange|both] [--count <n>] [--seed <n>]
///                [--config <generator.ron>] [--phrasebook <phrasebook.ron>] [--json]
///
/// Set RUST_LOG=debug to see generation and store events.

use chrono::Utc;
use fruit_matchmaker::core::generator::{FruitGenerator, GeneratorConfig};
use fruit_matchmaker::core::matching::best_match;
use fruit_matchmaker::core::narrator::Narrator;
use fruit_matchmaker::core::store::MatchmakingStore;
use fruit_matchmaker::core::summary::ProfileSummary;
use fruit_matchmaker::schema::fruit::{Fruit, FruitType};
use fruit_matchmaker::schema::record::{Conversation, RecordId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

struct Options {
    kinds: Vec<FruitType>,
    count: usize,
    seed: u64,
    config_path: Option<String>,
    phrasebook_path: Option<String>,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = parse_args(&args);

    let config = match &options.config_path {
        Some(path) => match GeneratorConfig::load_from_ron(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to load generator config: {}", e);
                process::exit(1);
            }
        },
        None => GeneratorConfig::default(),
    };
    let generator = match FruitGenerator::new(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let narrator = match &options.phrasebook_path {
        Some(path) => match Narrator::load_from_ron(Path::new(path)) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("ERROR: Failed to load phrasebook: {}", e);
                process::exit(1);
            }
        },
        None => Narrator::default(),
    };

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut store = MatchmakingStore::new();

    for _ in 0..options.count {
        for kind in &options.kinds {
            let conversation = Conversation::start(*kind, &generator, &narrator, &mut rng, Utc::now());
            store.add_conversation(conversation);
        }
    }

    if options.json {
        match serde_json::to_string_pretty(store.conversations()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("ERROR: Failed to serialize conversations: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for conversation in store.conversations() {
        print_conversation(conversation);
    }
    print_matches(&mut store, &mut rng);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        kinds: vec![FruitType::Apple],
        count: 1,
        seed: 42,
        config_path: None,
        phrasebook_path: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--kind" if i + 1 < args.len() => {
                i += 1;
                options.kinds = match args[i].as_str() {
                    "both" => FruitType::ALL.to_vec(),
                    other => match other.parse::<FruitType>() {
                        Ok(kind) => vec![kind],
                        Err(e) => {
                            eprintln!("ERROR: {}", e);
                            process::exit(1);
                        }
                    },
                };
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                options.count = args[i].parse().unwrap_or(1);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                options.seed = args[i].parse().unwrap_or(42);
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                options.config_path = Some(args[i].clone());
            }
            "--phrasebook" if i + 1 < args.len() => {
                i += 1;
                options.phrasebook_path = Some(args[i].clone());
            }
            "--json" => options.json = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn print_conversation(conversation: &Conversation) {
    println!("=== {} ({}) ===", conversation.id, conversation.fruit_type);
    for message in &conversation.messages {
        println!("[{:?}] {}", message.role, message.content);
    }
    if let Some(fruit) = &conversation.fruit {
        println!();
        print!("{}", ProfileSummary::of(fruit));
    }
    println!();
}

fn print_matches(store: &mut MatchmakingStore, rng: &mut StdRng) {
    let (orange_ids, oranges): (Vec<RecordId>, Vec<Fruit>) = store
        .fruits_by_type(FruitType::Orange)
        .into_iter()
        .map(|record| (record.id.clone(), record.fruit.clone()))
        .unzip();
    let apples: Vec<(RecordId, Fruit)> = store
        .fruits_by_type(FruitType::Apple)
        .into_iter()
        .map(|record| (record.id.clone(), record.fruit.clone()))
        .collect();
    if oranges.is_empty() || apples.is_empty() {
        return;
    }

    println!("=== Best matches ===");
    for (apple_id, apple) in apples {
        let Some((index, _)) = best_match(&apple, &oranges) else {
            continue;
        };
        let now = Utc::now();
        match store.propose_match(RecordId::generate(rng, now), &apple_id, &orange_ids[index], now) {
            Ok(m) => println!("{} + {}: {:.0}%", m.apple_id, m.orange_id, m.score * 100.0),
            Err(e) => eprintln!("ERROR: {}", e),
        }
    }
    println!("{} proposed", store.match_count());
}

fn print_usage() {
    println!("Usage: preview [options]");
    println!();
    println!("Options:");
    println!("  --kind <apple|orange|both>  Fruit type to generate (default: apple)");
    println!("  --count <n>                 Conversations per kind (default: 1)");
    println!("  --seed <n>                  RNG seed (default: 42)");
    println!("  --config <path>             Generator config RON file");
    println!("  --phrasebook <path>         Phrasebook RON file");
    println!("  --json                      Print conversations as JSON");
}
