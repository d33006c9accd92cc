//! The `deal … deal-end` block.
//!
//! ```text
//! deal
//! shuffle 2
//! direction clockwise
//! collate true
//! player-piles hand 5
//! common-piles discard 1 draw all
//! deal-end
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{CompileError, CompileResult, Direction};
use crate::document::RuleDocument;
use crate::zones::{BoardLayout, PileOwner, PileSlot};

/// Default number of shuffle passes when `shuffle` is absent.
pub const DEFAULT_SHUFFLE_PASSES: u32 = 1;

/// How many cards a pile receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealCount {
    Exactly(u32),
    /// Everything left in the deck.
    All,
}

impl DealCount {
    /// Has a pile that already received `dealt` cards had its share?
    #[must_use]
    pub fn is_satisfied(self, dealt: u32) -> bool {
        match self {
            DealCount::Exactly(n) => dealt >= n,
            DealCount::All => false,
        }
    }
}

/// One `<pile> <count>` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPair {
    pub slot: PileSlot,
    pub count: DealCount,
}

/// Compiled dealing procedure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealConfig {
    /// Shuffle passes before dealing. Zero deals in catalog order.
    pub shuffle_passes: u32,
    pub direction: Direction,
    /// Round-robin one card per player before advancing a pile's count.
    pub collate: bool,
    pub player_piles: Vec<DealPair>,
    pub common_piles: Vec<DealPair>,
}

impl Default for DealConfig {
    fn default() -> Self {
        Self {
            shuffle_passes: DEFAULT_SHUFFLE_PASSES,
            direction: Direction::Clockwise,
            collate: false,
            player_piles: Vec::new(),
            common_piles: Vec::new(),
        }
    }
}

impl DealConfig {
    /// Compile the lines between `deal` and `deal-end`.
    ///
    /// Pile names must be declared on the board with the matching owner
    /// (`player-piles` lists player piles, `common-piles` common ones).
    pub fn compile(block: &RuleDocument, layout: &BoardLayout) -> CompileResult<Self> {
        let document = block.identity();
        let invalid = |keyword: &str, value: &str| CompileError::InvalidParameter {
            document: document.clone(),
            keyword: keyword.to_string(),
            value: value.to_string(),
        };

        let mut config = Self::default();
        if let Some(passes) = block.params_for("shuffle") {
            config.shuffle_passes = passes.parse().map_err(|_| invalid("shuffle", passes))?;
        }
        if let Some(direction) = block.params_for("direction") {
            config.direction =
                Direction::from_keyword(direction).ok_or_else(|| invalid("direction", direction))?;
        }
        if let Some(collate) = block.params_for("collate") {
            config.collate = match collate {
                "true" | "yes" | "" => true,
                "false" | "no" => false,
                other => return Err(invalid("collate", other)),
            };
        }
        for index in block.positions("player-piles") {
            let params = block.check_params_at(index, "player-piles")?;
            config
                .player_piles
                .extend(Self::pairs(block, layout, "player-piles", params, PileOwner::Player)?);
        }
        for index in block.positions("common-piles") {
            let params = block.check_params_at(index, "common-piles")?;
            config
                .common_piles
                .extend(Self::pairs(block, layout, "common-piles", params, PileOwner::Common)?);
        }

        let deal_all = config
            .player_piles
            .iter()
            .chain(&config.common_piles)
            .filter(|pair| pair.count == DealCount::All)
            .count();
        if deal_all > 1 {
            return Err(CompileError::MultipleDealAll { document });
        }
        Ok(config)
    }

    fn pairs(
        block: &RuleDocument,
        layout: &BoardLayout,
        keyword: &str,
        params: &str,
        owner: PileOwner,
    ) -> CompileResult<Vec<DealPair>> {
        let tokens: Vec<&str> = params.split_whitespace().collect();
        if tokens.len() % 2 != 0 {
            return Err(CompileError::InvalidParameter {
                document: block.identity(),
                keyword: keyword.to_string(),
                value: params.to_string(),
            });
        }
        tokens
            .chunks(2)
            .map(|pair| {
                let (name, count) = (pair[0], pair[1]);
                let slot = layout
                    .slot(name)
                    .ok_or_else(|| CompileError::UnresolvedReference {
                        kind: "cardpile",
                        name: name.to_string(),
                        referenced_by: format!("{} {}", block.identity(), keyword),
                    })?;
                if layout.spec(slot).policy.owner != owner {
                    return Err(CompileError::InvalidComponent {
                        kind: "cardpile",
                        component: name.to_string(),
                        reason: format!("cannot be dealt by `{}`", keyword),
                    });
                }
                let count = match count {
                    "all" => DealCount::All,
                    n => DealCount::Exactly(n.parse().map_err(|_| CompileError::InvalidParameter {
                        document: block.identity(),
                        keyword: keyword.to_string(),
                        value: n.to_string(),
                    })?),
                };
                Ok(DealPair { slot, count })
            })
            .collect()
    }
}
