use std::fmt::Write;

use crate::game::{Game, GameOutcome};
use crate::observer::GameEvent;
use crate::simulation::Report;

/// Fine tune the aggregate table.
#[derive(Clone, Copy, Debug)]
pub struct ReportOptions {
    pub show_totals: bool,
    pub label_width: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_totals: false,
            label_width: 12,
        }
    }
}

/// One-line description of a table event.
pub fn describe_event(event: &GameEvent<'_>) -> String {
    match event {
        GameEvent::Started { seating, deck_size } => {
            format!(
                "starting game with {} players ({}) and {deck_size} cards",
                seating.len(),
                seating.join(", ")
            )
        }
        GameEvent::CardRevealed { card, remaining } => {
            format!("new card in play {card} ({remaining} left in deck)")
        }
        GameEvent::NoThanks {
            player,
            card,
            pool,
            tokens_left,
        } => format!(
            "player {player} said no thanks to {card}; pool is {pool}, player has {tokens_left} tokens"
        ),
        GameEvent::CardTaken {
            player,
            card,
            tokens,
        } => format!("player {player} took card {card} for {tokens} tokens"),
        GameEvent::Cheated(violation) => format!("aborting game: {violation}"),
        GameEvent::Finished { placements } => {
            let summary = placements
                .iter()
                .map(|p| format!("{}#{}={}", p.identifier, p.seat, p.score))
                .collect::<Vec<_>>()
                .join(" ");
            format!("game over: {summary}")
        }
    }
}

/// Ranking lines of a finished game, e.g. `#1 place; -11 points: always-take#1`.
pub fn render_outcome(outcome: &GameOutcome) -> String {
    let mut out = String::new();
    for placement in &outcome.placements {
        let _ = writeln!(
            out,
            "#{} place; {} points: {}#{}",
            placement.position, placement.score, placement.identifier, placement.seat
        );
    }
    out
}

/// Per-seat ledgers of a game in progress or just finished.
pub fn render_table(game: &Game) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Phase: {:?}", game.phase());
    match game.card_in_play() {
        Some(card) => {
            let _ = writeln!(
                out,
                "Card in play: {card} with {} tokens  |  Deck: {}",
                game.tokens_in_play(),
                game.cards_remaining()
            );
        }
        None => {
            let _ = writeln!(out, "Card in play: -  |  Deck: {}", game.cards_remaining());
        }
    }
    for (player, identifier) in game.players().iter().zip(game.seating()) {
        let mut cards = player.cards().to_vec();
        cards.sort_unstable();
        let cards = cards
            .iter()
            .map(|c| c.value().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let marker = if player.id() == game.current_player() {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{marker} P{} {identifier:<12} tokens: {:>2}  score: {:>4}  cards: [{cards}]",
            player.id(),
            player.tokens(),
            player.score()
        );
    }
    out
}

pub fn render_report(report: &Report) -> String {
    render_report_with_options(report, ReportOptions::default())
}

pub fn render_report_with_options(report: &Report, options: ReportOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "General results for {} games, {} games skipped due to cheating",
        report.games_requested, report.skipped
    );
    let width = options.label_width;
    for (identifier, stats) in &report.bots {
        let _ = write!(
            out,
            "Bot: {identifier:<width$} seats: {:>7}  average position: {:>6.3}  average score: {:>7.3}",
            stats.seats,
            stats.average_position(),
            stats.average_score()
        );
        if options.show_totals {
            let _ = write!(
                out,
                "  total position: {}  total score: {}",
                stats.total_position, stats.total_score
            );
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::game::Placement;

    #[test]
    fn outcome_lines_follow_positions() {
        let outcome = GameOutcome {
            placements: vec![
                Placement {
                    seat: 1,
                    identifier: "tracking".into(),
                    score: -11,
                    position: 1,
                },
                Placement {
                    seat: 0,
                    identifier: "dummy".into(),
                    score: 19,
                    position: 2,
                },
            ],
        };
        assert_eq!(
            render_outcome(&outcome),
            "#1 place; -11 points: tracking#1\n#2 place; 19 points: dummy#0\n"
        );
    }

    #[test]
    fn table_marks_the_active_seat() -> Result<(), crate::error::GameError> {
        use crate::bot::Bot;
        use crate::bots::AlwaysTakeBot;
        use crate::game::GameBuilder;

        let bots: Vec<Box<dyn Bot>> = vec![
            Box::new(AlwaysTakeBot::named("first")),
            Box::new(AlwaysTakeBot::named("second")),
        ];
        let mut game = GameBuilder::new(bots)?
            .with_fixed_seating()
            .with_deck(vec![Card::new(5), Card::new(6)])
            .build()?;
        game.run()?;
        let table = render_table(&game);
        assert!(table.contains("Phase: GameOver"));
        assert!(table.contains("* P0 first"));
        assert!(table.contains("cards: [5 6]"));
        assert!(table.contains("score:   -6"));
        Ok(())
    }

    #[test]
    fn decline_event_mentions_pool() {
        let text = describe_event(&GameEvent::NoThanks {
            player: 2,
            card: Card::new(17),
            pool: 3,
            tokens_left: 8,
        });
        assert!(text.contains("#17"));
        assert!(text.contains("pool is 3"));
    }
}
