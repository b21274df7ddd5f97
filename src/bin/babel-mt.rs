use babel_mt::{Config, MockClassifier, MockGenerator, Models, Translator, models_from_config};
use clap::{Arg, ArgMatches, Command};
use std::io::Read;
use std::sync::Arc;

fn text_arg() -> Arg {
    Arg::new("text")
        .help("Text to process (read from stdin when omitted)")
        .num_args(0..)
        .index(1)
}

/// All positional words joined by spaces, or stdin when there are none
fn input_text(matches: &ArgMatches) -> std::io::Result<String> {
    let words: Vec<&str> = matches
        .get_many::<String>("text")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("babel-mt")
        .version("0.1.0")
        .about("Detect the language of a text and translate it")
        .subcommand_required(true)
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock models instead of the inference backend")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log requests to the models")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("detect")
                .about("Print the detected language")
                .arg(text_arg())
                .arg(
                    Arg::new("probs")
                        .long("probs")
                        .short('p')
                        .help("Print every candidate language with its score")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("top")
                        .long("top")
                        .short('t')
                        .help("Number of candidates to print with --probs (default: all)")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate text, detecting the source language unless given")
                .arg(text_arg())
                .arg(
                    Arg::new("src")
                        .long("src")
                        .short('s')
                        .help("Source language code (default: detected)"),
                )
                .arg(
                    Arg::new("dst")
                        .long("dst")
                        .short('d')
                        .help("Target language code (default: en_XX)"),
                )
                .arg(
                    Arg::new("show-source")
                        .long("show-source")
                        .help("Also print the source language that was used")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .get_matches();

    let directive = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .init();

    let models = if matches.get_flag("mock") {
        Models::new(Arc::new(MockGenerator::suffix())).with_classifier(Arc::new(
            MockClassifier::fixed(&[("en-US", 0.9), ("fr-FR", 0.06), ("de-DE", 0.04)]),
        ))
    } else {
        let config = Config::from_env()?;
        models_from_config(&config)?
    };
    let translator = Translator::new(models);

    match matches.subcommand() {
        Some(("detect", sub)) => {
            let text = input_text(sub)?;
            let detector = translator
                .detector()
                .ok_or("language detection is disabled (BABEL_MT_DETECTION=false)")?;
            if sub.get_flag("probs") {
                let top = sub.get_one::<usize>("top").copied();
                for (label, score) in detector.detect_probs(&text, top).await? {
                    println!("{}\t{:.4}", label, score);
                }
            } else {
                println!("{}", detector.detect(&text).await?);
            }
        }
        Some(("translate", sub)) => {
            let text = input_text(sub)?;
            let source = sub.get_one::<String>("src").map(String::as_str);
            let target = sub.get_one::<String>("dst").map(String::as_str);
            let translation = translator
                .translate_and_detect(&text, source, target)
                .await?;
            if sub.get_flag("show-source") {
                eprintln!("{}", translation.source_language);
            }
            println!("{}", translation.text);
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
