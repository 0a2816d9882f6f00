use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use plotters::prelude::*;

use nothanks::simulation::DEFAULT_SEED;
use nothanks::visualize::{ReportOptions, render_report_with_options};
use nothanks::{
    GameSettings, RankingPolicy, Report, Roster, Simulation, SimulationConfig, render_outcome,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Ranking {
    /// Sort by score, ties broken by seat
    Stable,
    /// Equal scores collapse onto the last seat, as the original scoreboard did
    Collapse,
}

impl From<Ranking> for RankingPolicy {
    fn from(ranking: Ranking) -> Self {
        match ranking {
            Ranking::Stable => RankingPolicy::Stable,
            Ranking::Collapse => RankingPolicy::CollapseTies,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Run many No Thanks! games and report average position and score per bot."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 10_000)]
    games: usize,

    /// Base RNG seed (seating, decks and bot RNGs are derived from it)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long = "threads")]
    threads: Option<usize>,

    /// Games folded per reduction step
    #[arg(long = "batch-size", default_value_t = nothanks::simulation::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// How equal scores are ranked
    #[arg(long = "ranking", value_enum, default_value_t = Ranking::Stable)]
    ranking: Ranking,

    /// Tokens each player starts with
    #[arg(long = "tokens")]
    tokens: Option<u32>,

    /// Lowest card value
    #[arg(long = "min-card")]
    min_card: Option<u8>,

    /// Highest card value
    #[arg(long = "max-card")]
    max_card: Option<u8>,

    /// Cards dealt into the deck
    #[arg(long = "deck-size")]
    deck_size: Option<usize>,

    /// Print the placements of every game (runs single-threaded)
    #[arg(long = "show-games", action = ArgAction::SetTrue)]
    show_games: bool,

    /// Add position and score totals to the summary
    #[arg(long = "totals", action = ArgAction::SetTrue)]
    totals: bool,

    /// Write an SVG bar chart of average positions
    #[arg(long = "chart")]
    chart: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Player bot specs: e.g., lessdummy tracking (at least 2)
    #[arg(default_values_t = [String::from("lessdummy"), String::from("tracking")])]
    bots: Vec<String>,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let defaults = GameSettings::default();
    let settings = GameSettings {
        initial_tokens: args.tokens.unwrap_or(defaults.initial_tokens),
        min_card: args.min_card.unwrap_or(defaults.min_card),
        max_card: args.max_card.unwrap_or(defaults.max_card),
        deck_size: args.deck_size.unwrap_or(defaults.deck_size),
        ..defaults
    };
    let mut config = SimulationConfig::default()
        .with_games(args.games)
        .with_seed(args.seed)
        .with_settings(settings)
        .with_ranking(args.ranking.into())
        .with_batch_size(args.batch_size);
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let roster = Roster::from_specs(&args.bots)?;
    let simulation = Simulation::new(config, roster)?;
    log::info!(
        "simulating {} games with {} players: {}",
        args.games,
        args.bots.len(),
        args.bots.join(" ")
    );

    let started = Instant::now();
    let report = if args.show_games {
        let mut report = Report::default();
        for game in 0..args.games {
            let result = simulation.play(game);
            match &result {
                Ok(outcome) => print!("Game {game}\n{}", render_outcome(outcome)),
                Err(err) => println!("Game {game} skipped: {err}"),
            }
            report.absorb(result)?;
        }
        report.games_requested = args.games;
        report
    } else {
        simulation.run()?
    };
    log::info!("finished in {:.2?}", started.elapsed());

    let options = ReportOptions {
        show_totals: args.totals,
        ..ReportOptions::default()
    };
    println!("{}", render_report_with_options(&report, options));
    println!("There were {} seats per game", args.bots.len());

    if let Some(path) = &args.chart {
        render_bar_chart(path, &report)?;
        println!("Chart written to {}", path.display());
    }
    Ok(())
}

fn render_bar_chart(out: &PathBuf, report: &Report) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = report.bots.keys().cloned().collect();
    let values: Vec<f64> = report
        .bots
        .values()
        .map(|stats| stats.average_position())
        .collect();
    let max_value = values.iter().cloned().fold(1.0_f64, f64::max);

    let root = SVGBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "No Thanks! average position per bot (lower is better)",
            ("sans-serif", 28).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), 0.0f64..max_value + 0.5)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Average position")
        .x_desc("Bot")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()
        .map_err(|e| format!("{e}"))?;

    for (i, value) in values.iter().enumerate() {
        let rect = Rectangle::new([(i, 0.0), (i + 1, *value)], BLUE.filled());
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| format!("{e}"))?;
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
