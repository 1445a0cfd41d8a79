//! MCTS integration tests across the game variants.

use std::time::Duration;

use mcts_arena::core::{GameRng, GameState, Move, Team, TeamMap};
use mcts_arena::error::OracleError;
use mcts_arena::games::abduction::{AbductionState, Piece};
use mcts_arena::games::territory::TerritoryBuilder;
use mcts_arena::games::{AnyState, GameKind, GameRegistry, GameSetup, GridState, TerritoryState};
use mcts_arena::mcts::{
    Mcts, MctsConfig, NodeId, SearchBudget, SearchOracle, SearchTree, SelectionPolicy,
};

fn budget(iterations: u32) -> SearchBudget {
    SearchBudget::unbounded().with_max_iterations(iterations)
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_oracle_returns_legal_move_for_every_game() {
    let registry = GameRegistry::new();
    let oracle = Mcts::new(MctsConfig::default());
    let mut rng = GameRng::new(4);

    for kind in GameKind::ALL {
        let state = registry.create(kind, &GameSetup::default(), &mut rng).unwrap();
        let outcome = oracle.search(&state, &budget(150)).unwrap();
        assert!(state.is_legal(&outcome.mv), "{kind}: {} is illegal", outcome.mv);
        assert_eq!(outcome.stats.iterations, 150);
        assert_eq!(outcome.tree.root().visits(), 150);
        assert_eq!(outcome.tree.root().label(), state.label());
    }
}

#[test]
fn test_terminal_state_is_rejected() {
    let state = ["0", "4", "1", "3", "2"]
        .iter()
        .try_fold(GridState::new(), |s, t| s.make_move(&Move::from(*t)))
        .unwrap();
    let err = Mcts::new(MctsConfig::default())
        .search(&state, &budget(10))
        .unwrap_err();
    assert!(matches!(err, OracleError::NoLegalMoves { .. }));
}

#[test]
fn test_time_budget_stops_search() {
    let state = TerritoryBuilder::new().build(&mut GameRng::new(1)).unwrap();
    let limit = SearchBudget::unbounded().with_max_time(Duration::from_millis(30));

    let outcome = Mcts::new(MctsConfig::default()).search(&state, &limit).unwrap();
    assert!(state.is_legal(&outcome.mv));
    assert!(outcome.stats.iterations > 0);
    assert!(outcome.stats.time_us < 2_000_000);
}

// =============================================================================
// Move Quality
// =============================================================================

#[test]
fn test_finds_master_capture() {
    let mut board = [None; 25];
    board[12] = Some(Piece::Master(Team::A));
    board[7] = Some(Piece::Master(Team::B));
    board[20] = Some(Piece::Student(Team::A));
    board[3] = Some(Piece::Student(Team::B));
    let hands = TeamMap::new(|t| if t == Team::A { [2, 5] } else { [6, 10] });
    let state = AbductionState::from_parts(board, Team::A, hands, 4, 0).unwrap();

    let outcome = Mcts::new(MctsConfig::default()).search(&state, &budget(800)).unwrap();
    assert_eq!(outcome.mv, Move::from("2,12,7"));
}

#[test]
fn test_territory_prefers_bigger_region() {
    // 0 1 1 1
    // 2 1 1 1
    // 2 2 2 3
    // Colour 1 wins the game 7 to 5, colour 2 loses it 5 to 7.
    let state = TerritoryState::from_board(
        3,
        4,
        4,
        vec![0, 1, 1, 1, 2, 1, 1, 1, 2, 2, 2, 3],
        Team::A,
    )
    .unwrap();

    let outcome = Mcts::new(MctsConfig::default()).search(&state, &budget(1000)).unwrap();
    assert_eq!(outcome.mv, Move::from("1"));
}

// =============================================================================
// Tree Inspection
// =============================================================================

#[test]
fn test_child_visits_sum_to_root() {
    let state = AnyState::from(GridState::new());
    let outcome = Mcts::new(MctsConfig::default()).search(&state, &budget(300)).unwrap();
    let root = outcome.tree.root();

    let child_visits: u32 = root.children().map(|c| c.visits()).sum();
    assert_eq!(child_visits, root.visits());

    let ranked = root.children_by_visits();
    assert!(ranked.windows(2).all(|w| w[0].visits() >= w[1].visits()));
    assert_eq!(ranked[0].mv(), Some(&outcome.mv));
    assert!(root.child(&outcome.mv).is_some());

    let stats = root.stats(1);
    assert_eq!(stats.visits, 300);
    assert_eq!(stats.children.map(|c| c.len()), Some(root.children().count()));
}

#[test]
fn test_tree_stats() {
    let outcome = Mcts::new(MctsConfig::default())
        .search(&GridState::new(), &budget(200))
        .unwrap();
    let stats = outcome.tree.stats();
    assert_eq!(stats.node_count, outcome.tree.len());
    assert!(stats.max_depth >= 1);
    assert_eq!(stats.node_count, outcome.stats.nodes_expanded as usize + 1);
}

// =============================================================================
// Custom Policies
// =============================================================================

/// Always descends into the first child.
#[derive(Clone, Copy, Debug, Default)]
struct FirstChild;

impl SelectionPolicy for FirstChild {
    fn select(&self, tree: &SearchTree, parent: NodeId, _exploration: f64) -> Option<NodeId> {
        tree.get(parent).children.first().copied()
    }
}

#[test]
fn test_custom_selection_policy() {
    let oracle = Mcts::new(MctsConfig::default()).with_selection(FirstChild);
    let state = GridState::new();
    let outcome = oracle.search(&state, &budget(50)).unwrap();

    assert!(state.is_legal(&outcome.mv));
    // Once the root is expanded every iteration goes down the first child.
    let root = outcome.tree.root();
    let first = root.children().next().unwrap();
    assert_eq!(first.visits(), 50 - 8);
}

#[test]
fn test_node_stats_serialize() {
    let outcome = Mcts::new(MctsConfig::default())
        .search(&GridState::new(), &budget(100))
        .unwrap();
    let json = serde_json::to_value(outcome.tree.root().stats(1)).unwrap();

    assert_eq!(json["visits"], 100);
    assert!(json["move"].is_null());
    let children = json["children"].as_array().unwrap();
    assert_eq!(children.len(), 9);
    assert!(children.iter().all(|c| c["move"].is_string()));
    assert!(children.iter().all(|c| c["children"].is_null()));
}
