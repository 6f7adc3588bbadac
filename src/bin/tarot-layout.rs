use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tarot_layout::{
    compose_spread, decode_images, draw_cards, write_grid, write_print_sheets, Deck, GridLayout,
    OrientedCard, SheetLayout, CELTIC_CROSS,
};

#[derive(Parser)]
#[command(name = "tarot-layout")]
#[command(about = "Lay out the art of a custom tarot deck", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw ten cards and lay them out as a Celtic Cross
    Spread {
        /// Deck JSON file
        deck: PathBuf,

        /// Where to write the spread PNG
        #[arg(short, long, default_value = "spread.png")]
        output: PathBuf,

        /// Seed the shuffle for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Leave a card out of the draw, e.g. the querent's significator (repeatable)
        #[arg(long = "exclude", value_name = "CARD NAME")]
        excluded: Vec<String>,
    },

    /// Tile every card onto printable A4 pages and bundle them as a PDF
    Sheets {
        /// Deck JSON file
        deck: PathBuf,

        /// Directory for the page PNGs and the PDF
        #[arg(short, long, default_value = "output_cards")]
        output: PathBuf,

        /// Print resolution in dots per inch
        #[arg(long, default_value_t = 300.0)]
        dpi: f32,
    },

    /// Lay one arcana group out as a dense grid
    Grid {
        /// Deck JSON file
        deck: PathBuf,

        #[arg(short, long, value_enum)]
        arcana: Arcana,

        /// Where to write the grid PNG; defaults to <arcana>_arcana_grid.png
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Arcana {
    Major,
    Minor,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over --debug
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("info")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Spread {
            deck,
            output,
            seed,
            excluded,
        } => spread(deck, output, seed, excluded),
        Commands::Sheets { deck, output, dpi } => sheets(deck, output, dpi),
        Commands::Grid {
            deck,
            arcana,
            output,
        } => grid(deck, arcana, output),
    }
}

fn load_deck(path: &Path) -> anyhow::Result<Deck> {
    Deck::load(path).with_context(|| format!("failed to load deck from {}", path.display()))
}

fn spread(
    deck: PathBuf,
    output: PathBuf,
    seed: Option<u64>,
    excluded: Vec<String>,
) -> anyhow::Result<()> {
    let deck = load_deck(&deck)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let excluded: Vec<&str> = excluded.iter().map(String::as_str).collect();
    let drawn = draw_cards(&deck, CELTIC_CROSS.len(), &excluded, &mut rng);
    anyhow::ensure!(
        drawn.len() == CELTIC_CROSS.len(),
        "the deck only has {} cards left to draw, a Celtic Cross needs {}",
        drawn.len(),
        CELTIC_CROSS.len()
    );

    let images = decode_images(drawn.iter().map(|d| d.card))?;
    let cards: Vec<OrientedCard> = images
        .iter()
        .zip(drawn.iter())
        .map(|(image, d)| OrientedCard {
            image,
            reversed: d.reversed,
        })
        .collect();

    let png = compose_spread(&cards)?;
    std::fs::write(&output, png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote spread to {}", output.display());

    for (position, d) in CELTIC_CROSS.iter().zip(drawn.iter()) {
        println!(
            "{}: {} ({})",
            position.name,
            d.card.name(),
            if d.reversed { "Reversed" } else { "Upright" }
        );
    }
    Ok(())
}

fn sheets(deck: PathBuf, output: PathBuf, dpi: f32) -> anyhow::Result<()> {
    let deck = load_deck(&deck)?;
    let images = decode_images(deck.cards())?;
    let layout = SheetLayout {
        dpi,
        ..SheetLayout::default()
    };
    let sheets = write_print_sheets(&images, &layout, &output)?;
    println!("{}", sheets.pdf.display());
    Ok(())
}

fn grid(deck: PathBuf, arcana: Arcana, output: Option<PathBuf>) -> anyhow::Result<()> {
    let deck = load_deck(&deck)?;
    let (cards, layout, default_output) = match arcana {
        Arcana::Major => (&deck.major_arcana, GridLayout::MAJOR, "major_arcana_grid.png"),
        Arcana::Minor => (&deck.minor_arcana, GridLayout::MINOR, "minor_arcana_grid.png"),
    };
    // only decode what the grid will show
    let shown = layout.card_count(cards.len());
    let images = decode_images(cards.iter().take(shown))?;
    let grid = layout.pack(&images)?;

    let output = output.unwrap_or_else(|| PathBuf::from(default_output));
    write_grid(&grid, &output)?;
    println!("{}", output.display());
    Ok(())
}
