use bazhai::mcp;
use bazhai::relation::{Relation, Severity};
use bazhai::session::{self, DoorPlacement, SelectionState, TransformSeed};
use bazhai::trigram::{Direction, FLOORS, Trigram};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bazhai")]
#[command(about = "Eight Mansions door and floor compatibility", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a unit against its building; omit selections to see what is
    /// still needed
    Evaluate {
        /// Door placement mode: centered or not-centered
        #[arg(short, long)]
        door: Option<DoorPlacement>,

        /// Base direction (sitting direction when centered, door direction
        /// otherwise), e.g. "north" or 北
        #[arg(short, long)]
        base: Option<Direction>,

        /// Facing direction, e.g. "south" or 南
        #[arg(short, long)]
        facing: Option<Direction>,

        /// Unit floor number
        #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..=30))]
        floor: Option<u32>,

        /// Unit door direction, e.g. "east" or 東
        #[arg(short, long)]
        unit: Option<Direction>,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the relation between two trigrams
    Classify {
        /// First trigram, e.g. "kan" or 坎
        a: Trigram,

        /// Second trigram, e.g. "li" or 離
        b: Trigram,
    },

    /// Walk a trigram up the element cycle to a floor
    Advance {
        /// Starting trigram, e.g. "qian" or 乾
        trigram: Trigram,

        /// Floor number, counting the start as floor 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..=30))]
        floor: u32,
    },

    /// List the eight directions with their trigrams
    Directions {
        /// Emit the tables as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the door placement modes
    Modes,

    /// Start MCP server for AI assistant integration (stdio transport)
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            door,
            base,
            facing,
            floor,
            unit,
            json,
        } => {
            let state = SelectionState {
                door_placement: door,
                base_direction: base,
                facing_direction: facing,
                floor,
                unit_direction: unit,
            };
            cmd_evaluate(&state, json)
        }
        Commands::Classify { a, b } => cmd_classify(a, b),
        Commands::Advance { trigram, floor } => cmd_advance(trigram, floor),
        Commands::Directions { json } => cmd_directions(json),
        Commands::Modes => cmd_modes(),
        Commands::Mcp => {
            std::process::exit(mcp::cmd_mcp());
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_evaluate(state: &SelectionState, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let derived = session::derive(state);

    if json {
        let report = serde_json::json!({
            "selection": state,
            "transform_seed": derived.transform.map(|seed| seed.detail()),
            "floor_hexagram": derived.floor_hexagram.map(|hexagram| hexagram.detail()),
            "verdict": derived.relation.map(|relation| serde_json::json!({
                "relation": relation.glyph(),
                "severity": relation.severity(),
                "color": relation.severity().color(),
                "description": relation.describe(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // The base-direction question depends on the door placement mode.
    let base_label = state
        .door_placement
        .map(DoorPlacement::base_prompt)
        .unwrap_or("住宅坐方位");

    if let Some(mode) = state.door_placement {
        println!("住宅大門置向: {} - {}", mode, mode.description());
    }
    if let Some(base) = state.base_direction {
        println!("{}: {} - {}", base_label, base, base.trigram().detail());
    }
    if let Some(facing) = state.facing_direction {
        println!("住宅朝向: {} - {}", facing, facing.trigram().detail());
    }

    match derived.transform {
        Some(seed) => println!("寄卦編宅結果: {}", seed.detail()),
        None => {
            if state.base_direction.is_none() {
                println!("尚未決定{base_label}，無法計算寄卦。");
            }
            if state.facing_direction.is_none() {
                println!("尚未決定住宅朝向，無法計算寄卦。");
            }
        }
    }

    if let (Some(floor), Some(hexagram)) = (state.floor, derived.floor_hexagram) {
        println!("{}樓 - {}", floor, hexagram.detail());
    } else if matches!(derived.transform, Some(TransformSeed::Prostrate)) {
        println!("寄卦為伏，無法推算樓層卦。");
    } else if derived.transform.is_some() && state.floor.is_none() {
        println!("尚未決定住戶樓層，無法推算樓層卦。");
    }

    if let Some(unit) = state.unit_direction {
        println!("住戶大門方位: {} - {}", unit, unit.trigram().detail());
    }

    match derived.relation {
        Some(relation) => {
            println!("相容性: {} [{}]", relation, severity_tag(relation.severity()));
            println!("{}", relation.describe());
        }
        None if derived.floor_hexagram.is_some() => {
            println!("尚未決定住戶大門方位，無法判斷相容性。");
        }
        None => {}
    }

    Ok(())
}

fn cmd_classify(a: Trigram, b: Trigram) -> Result<(), Box<dyn std::error::Error>> {
    let relation = Relation::classify(a, b);

    println!(
        "{} × {} → {} [{}]",
        a,
        b,
        relation,
        severity_tag(relation.severity())
    );
    if let Some(seed) = relation.transform_trigram() {
        println!("寄卦: {}", seed);
    }
    println!("{}", relation.describe());
    Ok(())
}

fn cmd_advance(trigram: Trigram, floor: u32) -> Result<(), Box<dyn std::error::Error>> {
    let result = trigram.advance(floor)?;
    println!("{}樓 - {}", floor, result.detail());
    Ok(())
}

fn cmd_directions(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let rows: Vec<_> = Direction::ALL
            .iter()
            .map(|direction| {
                let trigram = direction.trigram();
                serde_json::json!({
                    "direction": direction.glyph(),
                    "hexagram": trigram.glyph(),
                    "element": trigram.element(),
                    "polarity": trigram.polarity(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for direction in Direction::ALL {
        println!("{} - {}", direction, direction.trigram().detail());
    }
    eprintln!("\n樓層: {}-{}", FLOORS.start(), FLOORS.end());
    Ok(())
}

fn cmd_modes() -> Result<(), Box<dyn std::error::Error>> {
    for mode in DoorPlacement::ALL {
        println!("{} - {} ({})", mode, mode.description(), mode.base_prompt());
    }
    Ok(())
}

// === Helpers ===

/// Verdict marker shown next to the relation name.
fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Auspicious => "吉",
        Severity::Inauspicious => "凶",
        Severity::Neutral => "平",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_tags() {
        assert_eq!(severity_tag(Severity::Auspicious), "吉");
        assert_eq!(severity_tag(Severity::Inauspicious), "凶");
        assert_eq!(severity_tag(Severity::Neutral), "平");
    }

    #[test]
    fn test_cli_parses_full_evaluate() {
        let cli = Cli::try_parse_from([
            "bazhai", "evaluate", "--door", "centered", "--base", "north", "--facing", "south",
            "--floor", "12", "--unit", "east",
        ])
        .unwrap();

        match cli.command {
            Commands::Evaluate {
                door,
                base,
                facing,
                floor,
                unit,
                json,
            } => {
                assert_eq!(door, Some(DoorPlacement::Centered));
                assert_eq!(base, Some(Direction::North));
                assert_eq!(facing, Some(Direction::South));
                assert_eq!(floor, Some(12));
                assert_eq!(unit, Some(Direction::East));
                assert!(!json);
            }
            _ => panic!("expected evaluate command"),
        }
    }

    #[test]
    fn test_cli_rejects_floor_outside_selector() {
        assert!(Cli::try_parse_from(["bazhai", "advance", "qian", "31"]).is_err());
        assert!(Cli::try_parse_from(["bazhai", "advance", "qian", "0"]).is_err());
    }

    #[test]
    fn test_cli_parses_glyph_arguments() {
        let cli = Cli::try_parse_from(["bazhai", "classify", "坎", "離"]).unwrap();
        match cli.command {
            Commands::Classify { a, b } => {
                assert_eq!(a, Trigram::Kan);
                assert_eq!(b, Trigram::Li);
            }
            _ => panic!("expected classify command"),
        }
    }
}
