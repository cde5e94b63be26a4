#![allow(dead_code)]

use gatherer_sql::{ConflictPrompt, FetchError, Fetcher};
use inquire::InquireError;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use url::Url;

/// Serves canned pages by exact URL; anything else is a 404.
#[derive(Default)]
pub struct PageFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl PageFetcher {
    pub fn with_page(mut self, url: &Url, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for PageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Answers prompts from a script and records what was shown. Quits once the
/// script runs out.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: usize,
    pub shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&str]) -> Self {
        ScriptedPrompt {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..ScriptedPrompt::default()
        }
    }
}

impl ConflictPrompt for ScriptedPrompt {
    fn ask(&mut self, _destination: &Path) -> Result<String, InquireError> {
        self.asked += 1;
        Ok(self.answers.pop_front().unwrap_or_else(|| "q".to_string()))
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}

pub fn listing_page(items: &str, paging: &str) -> String {
    format!(
        r#"<html><body>
             <div id="ctl00_ctl00_ctl00_MainContent_SubContent_topPagingControlsContainer">{}</div>
             <table class="cardItemTable">{}</table>
           </body></html>"#,
        paging, items
    )
}

pub fn card_item(multiverse_id: &str, other_printings: &[(&str, &str)]) -> String {
    let others: String = other_printings
        .iter()
        .map(|(id, alt)| {
            format!(
                r#"<a href="../Card/Details.aspx?multiverseid={}"><img alt="{}" src="../../Handlers/Image.ashx?type=symbol"></a>"#,
                id, alt
            )
        })
        .collect();
    format!(
        r#"<tr class="cardItem"><td>
             <span class="cardTitle"><a href="../Card/Details.aspx?multiverseid={}">Card {}</a></span>
             <div class="setVersions"><div class="otherSetSection">{}</div></div>
           </td></tr>"#,
        multiverse_id, multiverse_id, others
    )
}

pub fn detail_page(multiverse_id: &str, name: &str, card_type: &str, stat: Option<(&str, &str)>) -> String {
    let stat_row = stat
        .map(|(label, value)| {
            format!(
                r#"<div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_ptRow"><div class="label">{}</div><div class="value">{}</div></div>"#,
                label, value
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><form id="aspnetForm" action="Details.aspx?multiverseid={}">
             <div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_nameRow"><div class="value">{}</div></div>
             <div id="ctl00_ctl00_ctl00_MainContent_SubContent_SubContent_typeRow"><div class="value">{}</div></div>
             {}
           </form></body></html>"#,
        multiverse_id, name, card_type, stat_row
    )
}
