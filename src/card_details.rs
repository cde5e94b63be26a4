use crate::api::Fetcher;
use crate::card::Card;
use crate::error::Error;
use crate::markup::card_text_html;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const ROW_PREFIX: &str = "#ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_";
const LOYALTY_MARKER: &str = "Loyalty:";
const POWER_TOUGHNESS_MARKER: &str = "P/T:";

/// One optional region of the detail page. A rule whose selector matches
/// nothing leaves its field empty.
struct FieldRule {
    selector: Selector,
    extract: fn(&[ElementRef]) -> String,
    slot: fn(&mut Card) -> &mut String,
}

fn row(rest: &str) -> Selector {
    Selector::parse(&format!("{}{}", ROW_PREFIX, rest)).unwrap()
}

lazy_static! {
    static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule {
            selector: Selector::parse("#aspnetForm").unwrap(),
            extract: multiverse_id,
            slot: |card| &mut card.multiverse_id,
        },
        FieldRule {
            selector: row("nameRow .value"),
            extract: plain_text,
            slot: |card| &mut card.name,
        },
        FieldRule {
            selector: row("manaRow .value img"),
            extract: symbol_alts,
            slot: |card| &mut card.mana_cost,
        },
        FieldRule {
            selector: row("cmcRow .value"),
            extract: plain_text,
            slot: |card| &mut card.converted_mana_cost,
        },
        FieldRule {
            selector: row("typeRow .value"),
            extract: type_line,
            slot: |card| &mut card.card_type,
        },
        FieldRule {
            selector: row("textRow .value"),
            extract: rules_text,
            slot: |card| &mut card.card_text,
        },
        FieldRule {
            selector: row("flavorRow .value"),
            extract: flavor_text,
            slot: |card| &mut card.flavor_text,
        },
        FieldRule {
            selector: row("rarityRow .value"),
            extract: plain_text,
            slot: |card| &mut card.rarity,
        },
        FieldRule {
            selector: row("numberRow .value"),
            extract: plain_text,
            slot: |card| &mut card.card_number,
        },
        FieldRule {
            selector: row("artistRow .value"),
            extract: plain_text,
            slot: |card| &mut card.artist,
        },
    ];
    static ref STAT_LABEL: Selector = row("ptRow .label");
    static ref STAT_VALUE: Selector = row("ptRow .value");
    static ref SET_SYMBOL_LINK: Selector = row("currentSetSymbol a");
    static ref CARD_TEXT_BOX: Selector = Selector::parse("div.cardtextbox").unwrap();
    static ref LONG_DASH: Regex = Regex::new(r"\s*—\s*").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCard {
    pub card: Card,
    /// Set named by the page's set symbol, for logging only.
    pub set_name: String,
}

pub fn extract(document: &Html) -> ExtractedCard {
    let mut card = Card::default();

    for rule in FIELD_RULES.iter() {
        let matches: Vec<ElementRef> = document.select(&rule.selector).collect();
        if !matches.is_empty() {
            *(rule.slot)(&mut card) = (rule.extract)(&matches);
        }
    }

    let label = selected_text(document, &STAT_LABEL);
    let value = selected_text(document, &STAT_VALUE);
    if let (Some(label), Some(value)) = (label, value) {
        apply_stats(&mut card, &label, &value);
    }

    let set_name = document
        .select(&SET_SYMBOL_LINK)
        .nth(1)
        .map(|link| link.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    ExtractedCard { card, set_name }
}

pub async fn fetch_card<F: Fetcher>(fetcher: &F, url: &Url, verbose: bool) -> Result<Card, Error> {
    let body = fetcher.fetch(url).await.map_err(|source| Error::Extract {
        url: url.to_string(),
        source,
    })?;

    let ExtractedCard { card, set_name } = extract(&Html::parse_document(&body));
    if verbose {
        if set_name.is_empty() {
            info!("Retrieved card {} \"{}\"", card.multiverse_id, card.name);
        } else {
            info!(
                "Retrieved card {} \"{}\" ({})",
                card.multiverse_id, card.name, set_name
            );
        }
    }
    Ok(card)
}

/// Loyalty belongs to planeswalkers, power and toughness to everything else.
fn apply_stats(card: &mut Card, label: &str, value: &str) {
    if card.is_planeswalker() {
        if label.contains(LOYALTY_MARKER) {
            card.loyalty = value.trim().to_string();
        }
    } else if label.contains(POWER_TOUGHNESS_MARKER) {
        let (power, toughness) = value.split_once('/').unwrap_or((value, ""));
        card.power = power.trim().to_string();
        card.toughness = toughness.trim().to_string();
    }
}

fn selected_text(document: &Html, selector: &Selector) -> Option<String> {
    let mut matches = document.select(selector).peekable();
    matches.peek()?;
    Some(
        matches
            .flat_map(|element| element.text())
            .collect::<String>()
            .trim()
            .to_string(),
    )
}

fn plain_text(elements: &[ElementRef]) -> String {
    elements
        .iter()
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn multiverse_id(elements: &[ElementRef]) -> String {
    elements[0]
        .value()
        .attr("action")
        .and_then(|action| action.rsplit_once('='))
        .map(|(_, id)| id.to_string())
        .unwrap_or_default()
}

fn symbol_alts(elements: &[ElementRef]) -> String {
    elements
        .iter()
        .filter_map(|img| img.value().attr("alt"))
        .collect::<Vec<_>>()
        .join(";")
}

fn type_line(elements: &[ElementRef]) -> String {
    let text = plain_text(elements).replace(['\r', '\n', '"'], "");
    LONG_DASH.replace_all(&text, " &mdash; ").into_owned()
}

fn rules_text(elements: &[ElementRef]) -> String {
    text_boxes(elements).replace(['\r', '\n'], "")
}

fn flavor_text(elements: &[ElementRef]) -> String {
    text_boxes(elements)
}

/// Re-parses the region's markup and serializes every card text box in it.
fn text_boxes(elements: &[ElementRef]) -> String {
    let inner: String = elements.iter().map(|element| element.inner_html()).collect();
    let fragment = Html::parse_fragment(inner.trim());
    fragment.select(&CARD_TEXT_BOX).map(card_text_html).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><form id="aspnetForm" action="Details.aspx?multiverseid=3188">{}</form></body></html>"#,
            rows
        ))
    }

    fn value_row(id: &str, label: &str, value: &str) -> String {
        format!(
            r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_{}" class="row">
                 <div class="label">{}</div>
                 <div class="value">{}</div>
               </div>"#,
            id, label, value
        )
    }

    #[test]
    fn creature_fields_are_extracted() {
        let rows = [
            value_row("nameRow", "Card Name:", "\n    Balduvian War-Makers"),
            value_row(
                "manaRow",
                "Mana Cost:",
                r#"<img src="x?name=4&amp;type=symbol" alt="4"><img src="x?name=R&amp;type=symbol" alt="Red">"#,
            ),
            value_row("cmcRow", "Converted Mana Cost:", " 5 "),
            value_row("typeRow", "Types:", "\n  Creature  — Human Warrior"),
            value_row(
                "textRow",
                "Card Text:",
                r#"<div class="cardtextbox">Haste</div><div class="cardtextbox"><i>Rampage 1</i></div>"#,
            ),
            value_row(
                "flavorRow",
                "Flavor Text:",
                "<div class=\"cardtextbox\"><i>Line one\nline two</i></div>",
            ),
            value_row("ptRow", "P/T:", "3 / 3"),
            value_row("rarityRow", "Rarity:", "<span>Common</span>"),
            value_row("numberRow", "Card Number:", "106"),
            value_row("artistRow", "Artist:", "<a href='#'>Mike Kimble</a>"),
            r##"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_currentSetSymbol"><a href="#"><img alt="Alliances"></a><a href="#">Alliances</a></div>"##.to_string(),
        ]
        .concat();

        let extracted = extract(&detail_page(&rows));
        let card = extracted.card;

        assert_eq!(card.multiverse_id, "3188");
        assert_eq!(card.name, "Balduvian War-Makers");
        assert_eq!(card.mana_cost, "4;Red");
        assert_eq!(card.converted_mana_cost, "5");
        assert_eq!(card.card_type, "Creature &mdash; Human Warrior");
        assert_eq!(card.card_text, "Haste<em>Rampage 1</em>");
        assert_eq!(card.flavor_text, "<em>Line one\nline two</em>");
        assert_eq!(card.power, "3");
        assert_eq!(card.toughness, "3");
        assert_eq!(card.loyalty, "");
        assert_eq!(card.rarity, "Common");
        assert_eq!(card.card_number, "106");
        assert_eq!(card.artist, "Mike Kimble");
        assert_eq!(extracted.set_name, "Alliances");
    }

    #[test]
    fn planeswalker_gets_loyalty_only() {
        let rows = [
            value_row("typeRow", "Types:", "Planeswalker  — Jace"),
            value_row("ptRow", "Loyalty:", " 3 "),
        ]
        .concat();

        let card = extract(&detail_page(&rows)).card;

        assert_eq!(card.loyalty, "3");
        assert_eq!(card.power, "");
        assert_eq!(card.toughness, "");
    }

    #[test]
    fn mismatched_stat_label_populates_nothing() {
        let walker = [
            value_row("typeRow", "Types:", "Planeswalker  — Garruk"),
            value_row("ptRow", "P/T:", "3 / 3"),
        ]
        .concat();
        let creature = [
            value_row("typeRow", "Types:", "Creature  — Elf"),
            value_row("ptRow", "Loyalty:", "4"),
        ]
        .concat();

        for rows in [walker, creature] {
            let card = extract(&detail_page(&rows)).card;
            assert_eq!(
                (card.power.as_str(), card.toughness.as_str(), card.loyalty.as_str()),
                ("", "", "")
            );
        }
    }

    #[test]
    fn missing_regions_default_to_empty() {
        let extracted = extract(&Html::parse_document("<html><body></body></html>"));

        assert_eq!(extracted, ExtractedCard::default());
    }

    #[test]
    fn rules_text_symbols_are_local_and_single_line() {
        let rows = value_row(
            "textRow",
            "Card Text:",
            "<div class=\"cardtextbox\"><img src=\"/Handlers/Image.ashx?size=small&amp;name=tap&amp;type=symbol\" alt=\"Tap\" align=\"absbottom\">: Add\none mana.</div>",
        );

        let card = extract(&detail_page(&rows)).card;

        assert_eq!(
            card.card_text,
            r#"<img alt="Tap" src="/assets/symbols/tap.png">: Addone mana."#
        );
    }

    #[test]
    fn flavor_text_symbols_are_local() {
        let rows = value_row(
            "flavorRow",
            "Flavor Text:",
            "<div class=\"cardtextbox\"><i>Pay </i><img src=\"/Handlers/Image.ashx?name=W&amp;type=symbol\" alt=\"White\" align=\"absbottom\"></div>",
        );

        let card = extract(&detail_page(&rows)).card;

        assert_eq!(
            card.flavor_text,
            r#"<em>Pay </em><img alt="White" src="/assets/symbols/W.png">"#
        );
    }

    #[test]
    fn single_set_symbol_link_leaves_set_name_empty() {
        let rows = r##"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_currentSetSymbol"><a href="#">Alliances</a></div>"##;

        let extracted = extract(&detail_page(rows));

        assert_eq!(extracted.set_name, "");
    }

    #[test]
    fn star_power_without_slash_keeps_toughness_empty() {
        let mut card = Card {
            card_type: "Creature — Avatar".to_string(),
            ..Card::default()
        };

        apply_stats(&mut card, "P/T:", "*");

        assert_eq!(card.power, "*");
        assert_eq!(card.toughness, "");
    }
}
