//! Rules compilation: name lookup, cross-references and error reporting.

use card_referee::components::Performable;
use card_referee::core::CompileError;
use card_referee::document::{DocumentKind, PluginLibrary};
use card_referee::rules::GameRules;

const DECK: &str = "
    size 8
    faces 1 2 3 4
    groups red black
    cards all
";

const BOARD: &str = "
    cardpile hand
    owner player
    cardpile draw
    cardpile discard
";

fn compile(rules: &str) -> Result<GameRules, CompileError> {
    let mut library = PluginLibrary::new();
    library
        .add_text(DocumentKind::Deck, "small", DECK)?
        .add_text(DocumentKind::Board, "table", BOARD)?
        .add_text(DocumentKind::Rules, "game", rules)?;
    GameRules::compile(&library, "game")
}

const FULL: &str = "
    name Test Game
    players 2 4
    deck small
    board table
    direction-of-play counterclockwise

    action draw
    put-top pile.draw pile.hand
    Take the top card of the draw pile.
    action discard
    put pile.hand pile.discard card
    action pass
    end-turn
    end-action

    controlled-action draw-twice
    allow draw
    repeat 2
    end-controlled-action

    condition draw-empty
    check-if-empty pile.draw
    condition not can-draw
    draw-empty
    end-condition

    phase setup
    do draw-twice
    do pass
    phase play
    allow
    can-draw draw then pass
    allow discard
    end-allow
    end-phase

    start-phase play
";

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_every_declared_name_resolves() {
    let rules = compile(FULL).unwrap();
    let graph = rules.components();

    for name in ["draw", "discard", "pass"] {
        let id = graph.actions().lookup(name).unwrap();
        assert_eq!(graph.action(id).unwrap().name, name);
        assert!(matches!(graph.performable(name), Some(Performable::Action(_))));
    }
    let id = graph.controlled_actions().lookup("draw-twice").unwrap();
    assert_eq!(graph.controlled(id).unwrap().name, "draw-twice");

    for name in ["draw-empty", "can-draw"] {
        let id = graph.conditions().lookup(name).unwrap();
        assert_eq!(graph.condition(id).unwrap().name, name);
    }
    for name in ["setup", "play"] {
        let id = graph.phases().lookup(name).unwrap();
        assert_eq!(graph.phase(id).unwrap().name, name);
    }
    assert!(graph.performable("shuffle-all").is_none());
}

#[test]
fn test_header_fields() {
    let rules = compile(FULL).unwrap();
    assert_eq!(rules.title(), "test game");
    assert_eq!((rules.min_players(), rules.max_players()), (2, 4));
    assert_eq!(
        rules.direction(),
        card_referee::core::Direction::Counterclockwise
    );
    let play = rules.components().phases().lookup("play").unwrap();
    assert_eq!(rules.start_phase(), play);
    assert!(rules.brief().is_none());

    let draw = rules.components().actions().lookup("draw").unwrap();
    assert_eq!(
        rules.components().action(draw).unwrap().description.as_deref(),
        Some("take the top card of the draw pile.")
    );
}

#[test]
fn test_phase_sections() {
    let rules = compile(FULL).unwrap();
    let graph = rules.components();
    let setup = graph.phase(graph.phases().lookup("setup").unwrap()).unwrap();
    assert_eq!(setup.start.len(), 2);
    assert!(setup.allowed.is_empty());

    let play = graph.phase(graph.phases().lookup("play").unwrap()).unwrap();
    assert_eq!(play.allowed.len(), 2);
    assert!(play.allowed[0].precondition.is_some());
    assert_eq!(play.allowed[0].responses.len(), 1);
    assert!(play.allowed[1].precondition.is_none());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unknown_precondition_is_unresolved() {
    let rules = FULL.replace("can-draw draw then pass", "no-such-condition draw");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::UnresolvedReference { kind: "condition", .. })
    ));
}

#[test]
fn test_unknown_action_in_phase() {
    let rules = FULL.replace("allow discard", "allow juggle");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::UnresolvedReference { kind: "action", .. })
    ));
}

#[test]
fn test_duplicate_names_rejected() {
    let rules = FULL.replace("action pass\n", "action draw\n");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::DuplicateComponent { kind: "action", .. })
    ));

    let rules = FULL.replace("controlled-action draw-twice", "controlled-action draw");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::DuplicateComponent { .. })
    ));
}

#[test]
fn test_bad_statement_rejected() {
    let rules = FULL.replace("check-if-empty pile.draw", "wibble pile.draw");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::InvalidConditionalStatement { .. })
    ));
}

#[test]
fn test_wrong_arity_rejected() {
    let rules = FULL.replace("put-top pile.draw pile.hand", "put-top pile.draw");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::InvalidNumberOfParameters { expected: 2, actual: 1, .. })
    ));
}

#[test]
fn test_unknown_pile_rejected() {
    let rules = FULL.replace("pile.discard card", "pile.graveyard card");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::UnresolvedReference { kind: "cardpile", .. })
    ));
}

#[test]
fn test_missing_end_keyword() {
    let rules = FULL.replace("end-condition", "");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::MissingKeyword { .. })
    ));
}

#[test]
fn test_missing_referenced_documents() {
    let rules = FULL.replace("deck small", "deck huge");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::UnresolvedReference { kind: "deck", .. })
    ));
    let rules = FULL.replace("board table", "");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::MissingKeyword { .. })
    ));
}

#[test]
fn test_bad_player_counts() {
    for players in ["players 0", "players 4 2", "players many"] {
        let rules = FULL.replace("players 2 4", players);
        assert!(
            matches!(compile(&rules), Err(CompileError::InvalidParameter { .. })),
            "{players} should be rejected"
        );
    }
}

#[test]
fn test_controlled_self_reference_rejected() {
    let rules = FULL.replace("allow draw\n", "allow draw-twice\n");
    assert!(matches!(
        compile(&rules),
        Err(CompileError::InvalidComponent { .. })
    ));
}

#[test]
fn test_start_phase_defaults_to_first() {
    let rules = FULL.replace("start-phase play", "");
    let rules = compile(&rules).unwrap();
    let setup = rules.components().phases().lookup("setup").unwrap();
    assert_eq!(rules.start_phase(), setup);
}
