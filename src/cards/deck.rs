//! Decks: the immutable card catalog plus a deal cursor.
//!
//! ## Deck documents
//!
//! ```text
//! size 52
//! faces ace 2 3 4 5 6 7 8 9 10 jack queen king
//! grouping suit
//! groups hearts diamonds clubs spades
//! cards all
//! ```
//!
//! Instead of `cards all`, the `cards` line may be followed by one tuple
//! per line: `face[,group][,quantity]`, 0-based indices into `faces` and
//! `groups`. The quantity field is present only with `specify-quantity`.

use std::sync::Arc;

use crate::core::{CompileError, CompileResult, GameRng};
use crate::document::RuleDocument;

use super::card::{Card, CardId};
use super::intern::Interner;

/// A deck of cards.
#[derive(Clone, Debug)]
pub struct Deck {
    name: String,
    catalog: Vec<Card>,
    faces: Vec<Arc<str>>,
    groups: Vec<Arc<str>>,
    grouping: Option<String>,
    /// Catalog indices in deal order.
    order: Vec<usize>,
    cursor: usize,
}

impl Deck {
    /// Build a deck directly from cards. The deal order is catalog order.
    pub fn from_cards(name: impl Into<String>, cards: Vec<Card>) -> Self {
        let mut faces: Vec<Arc<str>> = Vec::new();
        let mut groups: Vec<Arc<str>> = Vec::new();
        for card in &cards {
            if !faces.iter().any(|f| &**f == card.face()) {
                faces.push(Arc::clone(card.face_symbol()));
            }
            if let Some(group) = card.group_symbol() {
                if !groups.iter().any(|g| g == group) {
                    groups.push(Arc::clone(group));
                }
            }
        }
        let order = (0..cards.len()).collect();
        Self {
            name: name.into(),
            catalog: cards,
            faces,
            groups,
            grouping: None,
            order,
            cursor: 0,
        }
    }

    /// Compile a deck document.
    pub fn compile(doc: &RuleDocument, interner: &mut Interner) -> CompileResult<Self> {
        let document = doc.identity();
        let size_text = doc.check_params_for("size")?;
        let size: usize = size_text.parse().map_err(|_| CompileError::InvalidParameter {
            document: document.clone(),
            keyword: "size".to_string(),
            value: size_text.to_string(),
        })?;
        if size > u16::MAX as usize {
            return Err(CompileError::InvalidParameter {
                document,
                keyword: "size".to_string(),
                value: size_text.to_string(),
            });
        }

        let faces: Vec<Arc<str>> = doc
            .check_params_for("faces")?
            .split_whitespace()
            .map(|f| interner.intern(f))
            .collect();
        let groups: Vec<Arc<str>> = doc
            .params_for("groups")
            .unwrap_or("")
            .split_whitespace()
            .map(|g| interner.intern(g))
            .collect();
        let grouping = doc
            .params_for("grouping")
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        let with_quantity = doc.index_of("specify-quantity").is_some();

        let cards_line = doc.check_index_of("cards")?;
        let mut catalog: Vec<Card> = Vec::with_capacity(size);
        let push = |face: &Arc<str>, group: Option<&Arc<str>>, catalog: &mut Vec<Card>| {
            let id = CardId::new(catalog.len().min(u16::MAX as usize) as u16);
            catalog.push(Card::new(id, Arc::clone(face), group.cloned()));
        };

        if doc.params_at(cards_line) == "all" {
            for face in &faces {
                if groups.is_empty() {
                    push(face, None, &mut catalog);
                }
                for group in &groups {
                    push(face, Some(group), &mut catalog);
                }
            }
        } else {
            let fields = 1 + usize::from(!groups.is_empty()) + usize::from(with_quantity);
            for line in &doc.lines()[cards_line + 1..] {
                let parts: Vec<&str> = line.split(',').map(str::trim).collect();
                if groups.is_empty() && parts.len() == fields + 1 {
                    return Err(CompileError::InvalidTypeReference {
                        document: document.clone(),
                        expected: "group index (deck declares no groups)".to_string(),
                        name: parts[1].to_string(),
                    });
                }
                if parts.len() != fields {
                    return Err(CompileError::InvalidParameter {
                        document: document.clone(),
                        keyword: "cards".to_string(),
                        value: line.clone(),
                    });
                }
                let index = |text: &str, list: &[Arc<str>], what: &str| -> CompileResult<usize> {
                    text.parse::<usize>()
                        .ok()
                        .filter(|&i| i < list.len())
                        .ok_or_else(|| CompileError::InvalidTypeReference {
                            document: document.clone(),
                            expected: what.to_string(),
                            name: text.to_string(),
                        })
                };
                let face = &faces[index(parts[0], &faces, "face index")?];
                let group = if groups.is_empty() {
                    None
                } else {
                    Some(&groups[index(parts[1], &groups, "group index")?])
                };
                let quantity = if with_quantity {
                    let text = parts[fields - 1];
                    text.parse::<usize>().map_err(|_| CompileError::InvalidParameter {
                        document: document.clone(),
                        keyword: "quantity".to_string(),
                        value: text.to_string(),
                    })?
                } else {
                    1
                };
                for _ in 0..quantity {
                    if catalog.len() > size {
                        break;
                    }
                    push(face, group, &mut catalog);
                }
            }
        }

        if catalog.len() != size {
            return Err(CompileError::CountMismatch {
                document,
                what: "cards".to_string(),
                expected: size,
                actual: catalog.len(),
            });
        }

        log::debug!("compiled deck `{}` with {} cards", doc.name(), size);
        let order = (0..catalog.len()).collect();
        Ok(Self {
            name: doc.name().to_string(),
            catalog,
            faces,
            groups,
            grouping,
            order,
            cursor: 0,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of cards in the catalog.
    #[must_use]
    pub fn size(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.catalog
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.catalog.get(id.index())
    }

    #[must_use]
    pub fn faces(&self) -> &[Arc<str>] {
        &self.faces
    }

    #[must_use]
    pub fn groups(&self) -> &[Arc<str>] {
        &self.groups
    }

    /// Label of the group attribute (e.g. `suit`), if declared.
    #[must_use]
    pub fn grouping(&self) -> Option<&str> {
        self.grouping.as_deref()
    }

    #[must_use]
    pub fn has_face(&self, name: &str) -> bool {
        self.faces.iter().any(|f| &**f == name)
    }

    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| &**g == name)
    }

    /// Cards not yet dealt.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// Next card in deal order.
    pub fn deal(&mut self) -> Option<Card> {
        let index = *self.order.get(self.cursor)?;
        self.cursor += 1;
        Some(self.catalog[index].clone())
    }

    /// Restore catalog order and rewind the cursor.
    pub fn rewind(&mut self) {
        self.order = (0..self.catalog.len()).collect();
        self.cursor = 0;
    }

    /// Rewind, then shuffle the deal order `passes` times.
    pub fn shuffle(&mut self, rng: &mut GameRng, passes: u32) {
        self.rewind();
        rng.shuffle_passes(&mut self.order, passes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;

    fn compile(text: &str) -> CompileResult<Deck> {
        let doc = RuleDocument::parse(DocumentKind::Deck, "test", text).unwrap();
        Deck::compile(&doc, &mut Interner::new())
    }

    #[test]
    fn test_cards_all() {
        let deck = compile(
            "size 52\nfaces a 2 3 4 5 6 7 8 9 10 j q k\ngroups h d c s\ncards all\n",
        )
        .unwrap();
        assert_eq!(deck.size(), 52);
        assert_eq!(deck.remaining(), 52);
        assert_eq!(deck.cards()[1].to_string(), "a of d");
        assert!(deck.has_face("q"));
        assert!(deck.has_group("s"));
    }

    #[test]
    fn test_tuples_with_quantity() {
        let deck = compile(
            "size 5\nfaces one two\ngrouping colour\ngroups red blue\nspecify-quantity\ncards\n0,0,2\n1,1,3\n",
        )
        .unwrap();
        assert_eq!(deck.size(), 5);
        assert_eq!(deck.grouping(), Some("colour"));
        let faces: Vec<_> = deck.cards().iter().map(|c| c.face()).collect();
        assert_eq!(faces, vec!["one", "one", "two", "two", "two"]);
        assert!(deck.cards()[0].same_attributes(&deck.cards()[1]));
        assert_ne!(deck.cards()[0].id(), deck.cards()[1].id());
    }

    #[test]
    fn test_size_mismatch() {
        let err = compile("size 3\nfaces x y\ncards all\n").unwrap_err();
        assert!(matches!(
            err,
            CompileError::CountMismatch { expected: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn test_bad_index() {
        let err = compile("size 1\nfaces x\ngroups g\ncards\n0,4\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidTypeReference { .. }));
    }

    #[test]
    fn test_wrong_tuple_width() {
        let err = compile("size 1\nfaces x\ncards\n0,0,0\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidParameter { .. }));
    }

    #[test]
    fn test_group_index_without_groups() {
        let err = compile("size 1\nfaces x\ncards\n0,0\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidTypeReference { .. }));
        let err = compile("size 2\nfaces x\nspecify-quantity\ncards\n0,1,2\n").unwrap_err();
        assert!(matches!(err, CompileError::InvalidTypeReference { name, .. } if name == "1"));
    }

    #[test]
    fn test_missing_faces() {
        let err = compile("size 1\ncards all\n").unwrap_err();
        assert!(matches!(err, CompileError::MissingKeyword { .. }));
    }

    #[test]
    fn test_deal_and_shuffle() {
        let mut deck = compile("size 10\nfaces 0 1 2 3 4 5 6 7 8 9\ncards all\n").unwrap();
        let first = deck.deal().unwrap();
        assert_eq!(first.face(), "0");
        assert_eq!(deck.remaining(), 9);

        let mut rng = GameRng::new(11);
        deck.shuffle(&mut rng, 2);
        assert_eq!(deck.remaining(), 10);
        let mut dealt: Vec<String> = std::iter::from_fn(|| deck.deal())
            .map(|c| c.face().to_string())
            .collect();
        assert!(deck.deal().is_none());
        dealt.sort();
        assert_eq!(dealt.len(), 10);
        assert_eq!(dealt[0], "0");
    }
}
