use crate::card::{Card, CardSet};

pub const SETS_FILE_NAME: &str = "sets.sql";

const CARD_COLUMNS: &str = "multiverse_id, name, mana_cost, converted_mana_cost, card_type, \
card_text, flavor_text, power, toughness, loyalty, rarity, card_number, artist";

pub fn escape(value: &str) -> String {
    value.replace('\'', "''").trim().to_string()
}

pub fn render_sets(sets: &[CardSet]) -> String {
    sets.iter()
        .map(|set| {
            format!(
                "INSERT INTO CARD_SETS (name) VALUES ('{}');\n",
                escape(&set.name)
            )
        })
        .collect()
}

pub fn render_cards(set: &CardSet) -> String {
    let mut cards: Vec<&Card> = set.cards.iter().collect();
    cards.sort_by_key(|card| leading_integer(&card.multiverse_id));

    cards.into_iter().map(render_card).collect()
}

fn render_card(card: &Card) -> String {
    let values: Vec<String> = card
        .columns()
        .iter()
        .map(|value| format!("'{}'", escape(value)))
        .collect();

    format!(
        "INSERT INTO CARDS ({}) VALUES ({});\n",
        CARD_COLUMNS,
        values.join(", ")
    )
}

/// Integer value of the leading decimal digits, 0 when there are none.
/// Runs too long for a `u64` saturate, so they still sort after shorter ones.
fn leading_integer(value: &str) -> u64 {
    let value = value.trim();
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Output file name for a set: apostrophes dropped, the rest reduced to a
/// lowercase snake_case slug.
pub fn set_file_name(set_name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in set_name.chars().filter(|c| *c != '\'') {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
        } else if let Some(ascii) = transliterate(c) {
            current.push_str(ascii);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    format!("{}.sql", words.join("_"))
}

fn transliterate(c: char) -> Option<&'static str> {
    let ascii = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' => "c",
        'È' | 'É' | 'Ê' | 'Ë' | 'è' | 'é' | 'ê' | 'ë' => "e",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'ì' | 'í' | 'î' | 'ï' => "i",
        'Ñ' | 'ñ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ý' | 'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(ascii)
}
