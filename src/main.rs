use anyhow::{bail, Context};
use ast_filter::rules::RuleLoader;
use ast_filter::{parse, Condition};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::Value as JsonValue;
use std::fs;

const RULES_ENV: &str = "AST_FILTER_RULES";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a query and print its JSON form
    Parse {
        /// The query to parse
        #[arg(short, long)]
        query: String,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },
    /// Parse a query and print it back in query syntax
    Render {
        /// The query to render
        #[arg(short, long)]
        query: String,
    },
    /// Evaluate a query against a JSON object
    Match {
        /// The query to evaluate
        #[arg(short, long)]
        query: String,

        /// Path to a JSON file holding one object
        #[arg(short, long)]
        record: String,
    },
    /// Keep the elements of a JSON array that satisfy a query
    Filter {
        /// The query to evaluate
        #[arg(short, long)]
        query: String,

        /// Path to a JSON file holding an array of objects
        #[arg(short, long)]
        input: String,
    },
    /// Check whether a candidate query satisfies a reference query
    Compare {
        /// The reference query
        #[arg(short, long)]
        reference: String,

        /// The candidate query
        #[arg(short, long)]
        candidate: String,
    },
    /// List the rules a candidate query satisfies
    Rules {
        /// Path to the rule set file, defaults to $AST_FILTER_RULES
        #[arg(short, long)]
        rules: Option<String>,

        /// The candidate query
        #[arg(short, long)]
        candidate: String,
    },
}

fn read_json(path: &str) -> anyhow::Result<JsonValue> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path))
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Parse { query, pretty } => {
            let condition = parse(&query);
            let json = if pretty {
                serde_json::to_string_pretty(&condition)?
            } else {
                serde_json::to_string(&condition)?
            };
            println!("{}", json);
        }
        Commands::Render { query } => {
            println!("{}", parse(&query));
        }
        Commands::Match { query, record } => {
            let data = read_json(&record)?;
            let matched = parse(&query).matches_json(&data)?;
            println!("{}", matched);
        }
        Commands::Filter { query, input } => {
            let items = read_json(&input)?;
            let passed = parse(&query).filter_json(&items)?;
            println!("{}", serde_json::to_string_pretty(&passed)?);
        }
        Commands::Compare {
            reference,
            candidate,
        } => {
            let reference: Condition = parse(&reference);
            let matched = reference.matches_condition(&parse(&candidate))?;
            println!("{}", matched);
        }
        Commands::Rules { rules, candidate } => {
            let path = match rules.or_else(|| std::env::var(RULES_ENV).ok()) {
                Some(path) => path,
                None => bail!("no rule set given, pass --rules or set {}", RULES_ENV),
            };

            let rule_set = RuleLoader::new().load_rules(&path)?;
            log::info!("Loaded {} rule(s) from {}", rule_set.len(), path);

            let candidate = parse(&candidate);
            for rule in rule_set.matching_rules(&candidate)? {
                if rule.description.is_empty() {
                    println!("{}", rule.name);
                } else {
                    println!("{}\t{}", rule.name, rule.description);
                }
            }
        }
    }

    Ok(())
}
