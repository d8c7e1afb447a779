// tests/engine_replay_tests.rs
//
// A. Основной цикл реплея: start / step / settle.
//
//  1) start засевает блайнды, не расходуя step
//  2) heads-up: raise + call после блайндов (итоговые ставки на улице)
//  3) то же при трактовке сумм как докладываемых фишек
//  4) переход улиц: банк копится, ставки улицы сбрасываются, борд растёт
//  5) полный проход до шоудауна и расчёт банка
//  6) блайнды ищутся по типу, а не по позиции
//  7) журнал действий и события
//  8) reset посреди раздачи возвращает всё к началу

use hand_replay::domain::{
    Action, ActionKind, Card, Chips, GameInfo, HandHistory, Player, PotOutcome, PotShare, Street,
    StreetName,
};
use hand_replay::engine::{
    AmountConvention, HandReplay, ReplayConfig, ReplayEventKind, ReplayPhase, StepOutcome,
};

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn c(token: &str) -> Card {
    token.parse().unwrap()
}

fn act(player: &str, kind: ActionKind, amount: u64) -> Action {
    Action::new(player, kind, Chips(amount))
}

/// Heads-up, стеки 100/100, блайнды 1/2.
/// Префлоп: SB 1, BB 2, P1 raise 6, P2 call 6 → банк 12.
/// Флоп: чек-чек. Тёрн: P2 bet 10, P1 call 10 → банк 32. Ривер: чек-чек.
fn heads_up_hand() -> HandHistory {
    use ActionKind::*;

    HandHistory {
        game_info: GameInfo {
            hand_id: Some("HU-1".to_string()),
            small_blind: Chips(1),
            big_blind: Chips(2),
            table_size: 2,
            dealer_seat: Some(1),
        },
        players: vec![
            Player::new(1, "P1", Chips(100))
                .hero()
                .with_position("SB")
                .with_hole_cards([c("Ah"), c("Kd")]),
            Player::new(2, "P2", Chips(100)).with_position("BB"),
        ],
        streets: vec![
            Street::new(
                StreetName::Preflop,
                vec![],
                vec![
                    act("P1", PostSmallBlind, 1),
                    act("P2", PostBigBlind, 2),
                    act("P1", Raise, 6),
                    act("P2", Call, 6),
                ],
            ),
            Street::new(
                StreetName::Flop,
                vec![c("2c"), c("7d"), c("Js")],
                vec![Action::check("P2"), Action::check("P1")],
            ),
            Street::new(
                StreetName::Turn,
                vec![c("9h")],
                vec![act("P2", Bet, 10), act("P1", Call, 10)],
            ),
            Street::new(
                StreetName::River,
                vec![c("3s")],
                vec![Action::check("P2"), Action::check("P1")],
            ),
        ],
        pot_outcome: PotOutcome {
            amount: Chips(32),
            distribution: vec![
                PotShare {
                    player_name: "P1".to_string(),
                    amount: Chips(32),
                },
                PotShare {
                    player_name: "P2".to_string(),
                    amount: Chips(0),
                },
            ],
        },
    }
}

fn started(hand: HandHistory, config: ReplayConfig) -> HandReplay {
    let mut replay = HandReplay::new(hand, config);
    replay.start().expect("валидная раздача должна стартовать");
    replay
}

fn stack(replay: &HandReplay, name: &str) -> Chips {
    replay.current_stacks()[name]
}

//
// ============= ТЕСТ 1: блайнды при старте ============
//
#[test]
fn start_seeds_blinds_without_consuming_step() {
    let replay = started(heads_up_hand(), ReplayConfig::standard());

    assert_eq!(replay.phase(), ReplayPhase::Active);
    assert_eq!(replay.current_pot(), Chips(3));
    assert_eq!(stack(&replay, "P1"), Chips(99));
    assert_eq!(stack(&replay, "P2"), Chips(98));
    assert_eq!(replay.current_street_bets()["P1"], Chips(1));
    assert_eq!(replay.current_street_bets()["P2"], Chips(2));
    assert!(replay.current_board().is_empty());
    assert!(replay.has_next_action());
}

//
// ============= ТЕСТ 2: heads-up, итоговые ставки ============
//
#[test]
fn heads_up_raise_and_call_street_total() {
    let mut replay = started(heads_up_hand(), ReplayConfig::standard());

    // Первый step – это raise, блайнды уже учтены.
    match replay.step().unwrap() {
        StepOutcome::Action(applied) => {
            assert_eq!(applied.action.kind, ActionKind::Raise);
            assert_eq!(applied.index, 2);
            // raise to 6 при уже поставленном SB 1 → докладывает 5
            assert_eq!(applied.debited, Chips(5));
            assert!(applied.anomaly.is_none());
        }
        other => panic!("ожидали действие, получили {other:?}"),
    }
    assert_eq!(replay.current_pot(), Chips(8));
    assert_eq!(replay.current_street_bets()["P1"], Chips(6));

    match replay.step().unwrap() {
        StepOutcome::Action(applied) => {
            assert_eq!(applied.action.kind, ActionKind::Call);
            assert_eq!(applied.debited, Chips(4));
        }
        other => panic!("ожидали действие, получили {other:?}"),
    }

    assert_eq!(replay.current_pot(), Chips(12));
    assert_eq!(stack(&replay, "P1"), Chips(94));
    assert_eq!(stack(&replay, "P2"), Chips(94));
    assert_eq!(replay.current_street_bets()["P2"], Chips(6));
    assert_eq!(replay.contributed_by("P1"), Chips(6));
    assert_eq!(replay.contributed_by("P2"), Chips(6));
    assert_eq!(replay.contributed_by("Nobody"), Chips::ZERO);
}

//
// ============= ТЕСТ 3: heads-up, суммы как докладка ============
//
#[test]
fn heads_up_raise_and_call_increment() {
    let config = ReplayConfig::standard().with_amount_convention(AmountConvention::Increment);
    let mut replay = started(heads_up_hand(), config);

    replay.step().unwrap();
    // Отметка улицы перезаписывается суммой действия, а не накапливается.
    assert_eq!(replay.current_street_bets()["P1"], Chips(6));

    replay.step().unwrap();

    assert_eq!(replay.current_pot(), Chips(15));
    assert_eq!(stack(&replay, "P1"), Chips(93));
    assert_eq!(stack(&replay, "P2"), Chips(92));
    assert_eq!(replay.current_street_bets()["P1"], Chips(6));
    assert_eq!(replay.current_street_bets()["P2"], Chips(6));
}

//
// ============= ТЕСТ 4: переход улиц ============
//
#[test]
fn street_advance_keeps_pot_and_clears_street_bets() {
    let mut replay = started(heads_up_hand(), ReplayConfig::standard());
    replay.step().unwrap();
    replay.step().unwrap();

    let outcome = replay.step().unwrap();
    assert_eq!(
        outcome,
        StepOutcome::StreetAdvanced {
            street: 1,
            cards: vec![c("2c"), c("7d"), c("Js")],
        }
    );
    assert_eq!(replay.current_pot(), Chips(12));
    assert!(replay.current_street_bets().is_empty());
    assert_eq!(replay.current_board(), &[c("2c"), c("7d"), c("Js")]);
    assert_eq!(replay.current_street().map(|s| &s.name), Some(&StreetName::Flop));

    // чек-чек, затем тёрн
    replay.step().unwrap();
    replay.step().unwrap();
    replay.step().unwrap();
    assert_eq!(replay.current_board().len(), 4);
    assert_eq!(replay.current_board()[3], c("9h"));
}

//
// ============= ТЕСТ 5: полный проход + расчёт ============
//
#[test]
fn full_hand_reaches_showdown_and_settles() {
    let hand = heads_up_hand();
    let total_before = hand.total_starting_chips();
    let mut replay = started(hand, ReplayConfig::standard());

    let mut ticket = None;
    for _ in 0..64 {
        match replay.step().unwrap() {
            StepOutcome::Showdown(t) => {
                ticket = Some(t);
                break;
            }
            _ => continue,
        }
    }
    let ticket = ticket.expect("раздача должна дойти до шоудауна");

    assert_eq!(replay.phase(), ReplayPhase::Showdown);
    assert!(!replay.has_next_action());
    assert_eq!(replay.current_pot(), Chips(32));
    assert_eq!(stack(&replay, "P1"), Chips(84));
    assert_eq!(stack(&replay, "P2"), Chips(84));
    assert_eq!(replay.current_board().len(), 5);

    let snap = replay.snapshot();
    assert!(snap.winners.contains("P1"));
    assert!(!snap.winners.contains("P2"), "нулевая выплата – не победитель");

    replay.settle(ticket).unwrap();

    assert!(replay.is_complete());
    assert_eq!(replay.current_pot(), Chips::ZERO);
    assert_eq!(stack(&replay, "P1"), Chips(116));
    assert_eq!(stack(&replay, "P2"), Chips(84));
    assert_eq!(replay.snapshot().chips_in_play(), total_before);
}

//
// ============= ТЕСТ 6: блайнды по типу ============
//
#[test]
fn blinds_found_by_kind_not_position() {
    use ActionKind::*;

    let mut hand = heads_up_hand();
    // Перед блайндами – посторонний чек, и BB записан раньше SB.
    hand.streets[0].actions = vec![
        Action::check("P2"),
        act("P2", PostBigBlind, 2),
        act("P1", PostSmallBlind, 1),
        act("P1", Raise, 6),
        act("P2", Call, 6),
    ];

    let mut replay = started(hand, ReplayConfig::standard());
    assert_eq!(replay.current_pot(), Chips(3));

    // check, потом блайнды пропускаются, потом raise
    assert!(matches!(
        replay.step().unwrap(),
        StepOutcome::Action(ref a) if a.action.kind == Check
    ));
    match replay.step().unwrap() {
        StepOutcome::Action(a) => {
            assert_eq!(a.action.kind, Raise);
            assert_eq!(a.index, 3);
        }
        other => panic!("ожидали raise, получили {other:?}"),
    }
    assert_eq!(replay.current_pot(), Chips(8));
}

#[test]
fn only_first_blind_of_each_kind_is_seeded() {
    use ActionKind::*;

    let mut hand = heads_up_hand();
    // Второй SB (например, мёртвый блайнд) не засевается и не применяется в step.
    hand.streets[0].actions.insert(2, act("P2", PostSmallBlind, 1));

    let mut replay = started(hand, ReplayConfig::standard());
    assert_eq!(replay.current_pot(), Chips(3));

    replay.step().unwrap();
    replay.step().unwrap();
    assert_eq!(replay.current_pot(), Chips(12));
}

#[test]
fn hand_without_blinds_starts_with_empty_pot() {
    let mut hand = heads_up_hand();
    hand.streets[0].actions.retain(|a| !a.kind.is_blind());

    let replay = started(hand, ReplayConfig::standard());
    assert_eq!(replay.current_pot(), Chips::ZERO);
    assert!(replay.current_street_bets().is_empty());
}

//
// ============= ТЕСТ 7: журнал действий и события ============
//
#[test]
fn action_log_includes_seeded_blinds_and_played_actions() {
    let mut replay = started(heads_up_hand(), ReplayConfig::standard());

    let log: Vec<ActionKind> = replay.action_log().iter().map(|(_, a)| a.kind).collect();
    assert_eq!(log, vec![ActionKind::PostSmallBlind, ActionKind::PostBigBlind]);

    replay.step().unwrap();
    replay.step().unwrap();
    replay.step().unwrap(); // флоп
    replay.step().unwrap(); // чек P2

    let log: Vec<(usize, &str)> = replay
        .action_log()
        .iter()
        .map(|(street, a)| (*street, a.player_name.as_str()))
        .collect();
    assert_eq!(
        log,
        vec![(0, "P1"), (0, "P2"), (0, "P1"), (0, "P2"), (1, "P2")]
    );
}

#[test]
fn events_record_every_transition() {
    let mut replay = started(heads_up_hand(), ReplayConfig::standard());
    let ticket = loop {
        if let StepOutcome::Showdown(t) = replay.step().unwrap() {
            break t;
        }
    };
    replay.settle(ticket).unwrap();

    let events = replay.events();
    assert!(matches!(events[0].kind, ReplayEventKind::ReplayStarted { generation: 1 }));
    let blinds = events
        .iter()
        .filter(|e| matches!(e.kind, ReplayEventKind::BlindPosted { .. }))
        .count();
    assert_eq!(blinds, 2);
    let streets = events
        .iter()
        .filter(|e| matches!(e.kind, ReplayEventKind::StreetAdvanced { .. }))
        .count();
    assert_eq!(streets, 3);
    assert!(events
        .iter()
        .any(|e| matches!(&e.kind, ReplayEventKind::PotAwarded { player, amount } if player == "P1" && *amount == Chips(32))));
    assert_eq!(events.last().map(|e| &e.kind), Some(&ReplayEventKind::ReplayCompleted));

    // Индексы событий идут подряд.
    for (i, e) in events.iter().enumerate() {
        assert_eq!(e.index as usize, i);
    }
}

//
// ============= ТЕСТ 8: reset ============
//
#[test]
fn reset_mid_hand_restores_initial_state() {
    let mut replay = started(heads_up_hand(), ReplayConfig::standard());
    let initial = replay.snapshot();

    for _ in 0..5 {
        replay.step().unwrap();
    }
    assert_ne!(replay.snapshot(), initial);

    replay.reset().unwrap();
    assert_eq!(replay.snapshot(), initial);
    assert_eq!(replay.generation(), 2);
    assert!(replay.anomalies().is_empty());
}

#[test]
fn play_out_runs_to_completion() {
    let mut replay = started(heads_up_hand(), ReplayConfig::instant());
    let end = replay.play_out().unwrap();

    assert_eq!(end.phase, ReplayPhase::Complete);
    assert_eq!(end.pot, Chips::ZERO);
    assert_eq!(end.stack_of("P1"), Some(Chips(116)));
}

#[test]
fn config_profiles_and_partial_json() {
    use hand_replay::engine::ReplayProfile;

    assert_eq!(ReplayConfig::default(), ReplayConfig::standard());
    assert_eq!(ReplayConfig::from_profile(ReplayProfile::Standard).settle_delay_ms, 1_500);
    assert_eq!(
        ReplayConfig::from_profile(ReplayProfile::Instant).settle_delay(),
        std::time::Duration::ZERO
    );

    // Недостающие поля берутся из стандартного профиля.
    let cfg: ReplayConfig =
        serde_json::from_str(r#"{ "amount_convention": "increment" }"#).unwrap();
    assert_eq!(cfg.settle_delay_ms, 1_500);
    assert_eq!(cfg.amount_convention, AmountConvention::Increment);

    // Слишком большая пауза упирается в u64::MAX, а не обрезается по модулю.
    let huge = ReplayConfig::standard().with_settle_delay(std::time::Duration::MAX);
    assert_eq!(huge.settle_delay_ms, u64::MAX);
    let exact = ReplayConfig::standard().with_settle_delay(std::time::Duration::from_millis(250));
    assert_eq!(exact.settle_delay_ms, 250);
}
