#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub multiverse_id: String,
    pub name: String,
    pub mana_cost: String,
    pub converted_mana_cost: String,
    pub card_type: String,
    pub card_text: String,
    pub flavor_text: String,
    pub power: String,
    pub toughness: String,
    pub loyalty: String,
    pub rarity: String,
    pub card_number: String,
    pub artist: String,
}

impl Card {
    pub fn is_planeswalker(&self) -> bool {
        self.card_type.contains("Planeswalker")
    }

    /// Column values in `CARDS` insert order.
    pub fn columns(&self) -> [&str; 13] {
        [
            &self.multiverse_id,
            &self.name,
            &self.mana_cost,
            &self.converted_mana_cost,
            &self.card_type,
            &self.card_text,
            &self.flavor_text,
            &self.power,
            &self.toughness,
            &self.loyalty,
            &self.rarity,
            &self.card_number,
            &self.artist,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSet {
    pub name: String,
    pub cards: Vec<Card>,
}

impl CardSet {
    /// Returns `None` when the trimmed name is empty.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(CardSet {
            name: name.to_string(),
            cards: Vec::new(),
        })
    }
}
