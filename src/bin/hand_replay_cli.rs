// src/bin/hand_replay_cli.rs

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::task::LocalSet;

use hand_replay::engine::{AmountConvention, ReplayConfig, ReplaySnapshot, StepOutcome};
use hand_replay::infra::parse_hand_json;
use hand_replay::ReplaySession;

/// Пошаговый реплей раздачи из JSON-файла.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Файл с историей раздачи (JSON).
    #[arg(required = true)]
    file: PathBuf,

    /// Пауза перед расчётом банка, мс.
    #[arg(long, default_value_t = ReplayConfig::standard().settle_delay_ms)]
    delay_ms: u64,

    /// Суммы в логе – докладываемые фишки, а не итоговая ставка на улице.
    #[arg(long)]
    increment: bool,
}

fn print_snapshot(label: &str, s: &ReplaySnapshot) {
    let board: Vec<String> = s.board.iter().map(|c| c.to_string()).collect();
    println!("{label}");
    println!("    phase={:?} | pot={} | board=[{}]", s.phase, s.pot, board.join(" "));
    for (name, stack) in &s.stacks {
        let bet = s.current_street_bets.get(name).copied().unwrap_or_default();
        let folded = if s.folded.contains(name) { " (fold)" } else { "" };
        println!("        {name}: stack={stack} bet={bet}{folded}");
    }
    for (name, cards) in &s.revealed_hands {
        let cards: Vec<String> = cards.iter().map(|c| c.to_string()).collect();
        println!("        показал {name}: {}", cards.join(" "));
    }
    if !s.winners.is_empty() {
        println!("        победители: {:?}", s.winners);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let raw = match std::fs::read_to_string(&args.file) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Не удалось прочитать {}: {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    };
    let hand = match parse_hand_json(&raw) {
        Ok(hand) => hand,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let convention = if args.increment {
        AmountConvention::Increment
    } else {
        AmountConvention::StreetTotal
    };
    let config = ReplayConfig::new(args.delay_ms, convention);

    LocalSet::new()
        .run_until(async move {
            println!("=== HAND REPLAY ===\n");

            let mut session = ReplaySession::new(hand, config);
            if let Err(err) = session.start() {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
            print_snapshot("start", &session.snapshot());

            loop {
                match session.step() {
                    Ok(StepOutcome::Action(applied)) => {
                        let a = &applied.action;
                        print_snapshot(
                            &format!("{} {} {}", a.player_name, a.kind, a.amount),
                            &session.snapshot(),
                        );
                        if let Some(anomaly) = applied.anomaly {
                            println!("    ! {anomaly}");
                        }
                    }
                    Ok(StepOutcome::StreetAdvanced { street, .. }) => {
                        print_snapshot(&format!("--- улица {street} ---"), &session.snapshot());
                    }
                    Ok(StepOutcome::Showdown(_)) => {
                        print_snapshot("--- шоудаун ---", &session.snapshot());
                        break;
                    }
                    Err(err) => {
                        eprintln!("{err}");
                        return ExitCode::FAILURE;
                    }
                }
            }

            match session.settled().await {
                Some(Ok(())) => print_snapshot("--- банк разыгран ---", &session.snapshot()),
                Some(Err(err)) => {
                    eprintln!("{err}");
                    return ExitCode::FAILURE;
                }
                None => {}
            }

            println!("\n=== HAND REPLAY DONE ===");
            ExitCode::SUCCESS
        })
        .await
}
