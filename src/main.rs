use anyhow::{anyhow, Context, Result};
use clap::Parser;
use quantum_chess::core::{init_logging, GameConfig};
use quantum_chess::game::{BoardMeaning, Cell, ChessGame, GameSetup, PieceId};
use std::path::PathBuf;
use tracing::info;

/// Replay a sequence of quantum chess moves from the standard position
/// and print the resulting board meaning.
///
/// Moves are written as `e2e4` (classic) or `b1:a3,c3` (quantum). Prefix a
/// move with `ID@` to pick a specific piece id when several share a cell.
#[derive(Parser, Debug)]
#[command(name = "quantum-chess", version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for measurement sampling, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Print the board meaning as JSON
    #[arg(long)]
    json: bool,

    /// Moves to apply in order
    moves: Vec<String>,
}

/// A parsed move token
struct MoveToken {
    piece: Option<PieceId>,
    origin: Cell,
    targets: Vec<Cell>,
}

fn parse_cell(s: &str) -> Result<Cell> {
    Cell::from_algebraic(s).ok_or_else(|| anyhow!("invalid cell '{s}'"))
}

fn parse_move(token: &str) -> Result<MoveToken> {
    let (piece, rest) = match token.split_once('@') {
        Some((id, rest)) => {
            let id: u16 = id.parse().with_context(|| format!("invalid piece id in '{token}'"))?;
            (Some(PieceId(id)), rest)
        }
        None => (None, token),
    };

    let (origin, targets) = match rest.split_once(':') {
        Some((origin, targets)) => (
            parse_cell(origin)?,
            targets.split(',').map(parse_cell).collect::<Result<Vec<_>>>()?,
        ),
        None => {
            // Second cell starts at the next file letter
            let split = rest
                .char_indices()
                .skip(1)
                .find(|(_, c)| c.is_ascii_lowercase())
                .map(|(i, _)| i)
                .ok_or_else(|| anyhow!("invalid move '{token}'"))?;
            (parse_cell(&rest[..split])?, vec![parse_cell(&rest[split..])?])
        }
    };

    Ok(MoveToken {
        piece,
        origin,
        targets,
    })
}

/// Piece to move from `origin` when none was named: the most present one
fn default_piece(meaning: &BoardMeaning, origin: Cell) -> Result<PieceId> {
    meaning
        .at(origin)
        .iter()
        .max_by(|a, b| a.presence.total_cmp(&b.presence))
        .map(|p| p.id())
        .ok_or_else(|| anyhow!("no piece on {origin}"))
}

fn render(meaning: &BoardMeaning) -> String {
    let extent = meaning.extent();
    let mut out = String::new();

    for y in (0..extent.height).rev() {
        out.push_str(&format!("{:>2} ", y as u16 + 1));
        for x in 0..extent.width {
            let pieces = meaning.at(Cell::new(x, y));
            let cell = match pieces.iter().max_by(|a, b| a.presence.total_cmp(&b.presence)) {
                None => "  .  ".to_string(),
                Some(p) if !p.is_quantum() && pieces.len() == 1 => format!("  {}  ", p.piece.symbol()),
                Some(p) => format!("{}{:>3.0}%", p.piece.symbol(), p.presence * 100.0),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out.push_str("   ");
    for x in 0..extent.width {
        out.push_str(&format!("  {}  ", (b'a' + x) as char));
    }
    out.push('\n');

    if !meaning.captured().is_empty() {
        out.push_str("captured:");
        for p in meaning.captured() {
            out.push_str(&format!(" {}({:.0}%)", p.piece.symbol(), p.presence * 100.0));
        }
        out.push('\n');
    }

    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_or_default(&GameConfig::default_path()),
    };
    init_logging(&config.log_filter);
    info!(
        "[CONFIG] Board {}x{}, seed {:?}",
        config.board_width,
        config.board_height,
        cli.seed.or(config.rng_seed)
    );

    let setup = GameSetup::standard_on(config.extent())?;
    let mut game: ChessGame = setup.build()?;
    if let Some(seed) = cli.seed.or(config.rng_seed) {
        game = game.with_seed(seed);
    }

    for token in &cli.moves {
        let mv = parse_move(token)?;
        let piece = match mv.piece {
            Some(id) => id,
            None => default_piece(&game.meaning(), mv.origin)?,
        };
        let event = game
            .try_move(piece, mv.origin, &mv.targets)
            .with_context(|| format!("move '{token}' rejected"))?;
        for m in &event.measurements {
            info!("[REPLAY] Measured {}: {:?}", m.cell, m.occupant);
        }
    }

    let meaning = game.meaning();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&meaning)?);
    } else {
        print!("{}", render(&meaning));
        println!(
            "{} branches, total weight {}",
            game.state().branch_count(),
            game.state().total_weight()
        );
    }
    Ok(())
}
