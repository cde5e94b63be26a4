//! Walks the paginated search results of one set and collects the card
//! detail links found on each page.

use crate::api::{join_url, Catalog, Fetcher};
use crate::error::Error;
use lazy_static::lazy_static;
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use url::Url;

lazy_static! {
    static ref CARD_ITEM: Selector = Selector::parse(".cardItem").unwrap();
    static ref CARD_TITLE_LINK: Selector = Selector::parse(".cardTitle a").unwrap();
    static ref OTHER_PRINTING_LINK: Selector =
        Selector::parse(".setVersions .otherSetSection a").unwrap();
    static ref IMG: Selector = Selector::parse("img").unwrap();
    static ref PAGING_LINK: Selector =
        Selector::parse("#ctl00_ctl00_ctl00_MainContent_SubContent_topPagingControlsContainer a")
            .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    Title,
    /// A printing listed under another card entry whose set symbol names the
    /// set being crawled.
    OtherPrinting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    pub url: Url,
    pub source: LinkSource,
}

#[derive(Debug, Default)]
pub struct ListingPage {
    pub links: Vec<CardLink>,
    pub next: Option<Url>,
}

/// Parses one listing page. Links that cannot be resolved are logged and
/// dropped.
pub fn parse_listing(document: &Html, page_url: &Url, set_name: &str) -> ListingPage {
    let mut page = ListingPage::default();

    for item in document.select(&CARD_ITEM) {
        for link in item.select(&CARD_TITLE_LINK) {
            push_link(&mut page.links, page_url, link, LinkSource::Title);
        }

        for link in item.select(&OTHER_PRINTING_LINK) {
            let alt = link
                .select(&IMG)
                .next()
                .and_then(|img| img.value().attr("alt"));

            if matches!(alt, Some(alt) if alt.contains(set_name)) {
                push_link(&mut page.links, page_url, link, LinkSource::OtherPrinting);
            }
        }
    }

    page.next = next_page(document, page_url);
    page
}

fn push_link(links: &mut Vec<CardLink>, page_url: &Url, link: ElementRef, source: LinkSource) {
    let Some(href) = link.value().attr("href") else {
        return;
    };
    match join_url(page_url, href) {
        Ok(url) => links.push(CardLink { url, source }),
        Err(err) => warn!("Ignoring card link on {}: {}", page_url, err),
    }
}

fn next_page(document: &Html, page_url: &Url) -> Option<Url> {
    let forward = document
        .select(&PAGING_LINK)
        .find(|link| link.text().collect::<String>().trim().ends_with('>'))?;

    let next = join_url(page_url, forward.value().attr("href")?).ok()?;
    if &next == page_url {
        debug!("Paging control on {} points back at itself", page_url);
        return None;
    }
    Some(next)
}

/// Lazily fetches the listing pages of one set, one page per call.
pub struct ListingPages<'a, F> {
    fetcher: &'a F,
    set_name: String,
    next: Option<Url>,
}

impl<'a, F: Fetcher> ListingPages<'a, F> {
    pub fn new(fetcher: &'a F, catalog: &Catalog, set_name: &str) -> Result<Self, Error> {
        Ok(ListingPages {
            fetcher,
            set_name: set_name.to_string(),
            next: Some(catalog.set_listing(set_name)?),
        })
    }

    /// `Ok(None)` once the last page has been consumed. A failed fetch ends
    /// the walk; later calls return `Ok(None)`.
    pub async fn next_page(&mut self) -> Result<Option<Vec<CardLink>>, Error> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        debug!("Fetching listing page {}", url);
        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| Error::Crawl {
                set: self.set_name.clone(),
                url: url.to_string(),
                source,
            })?;

        let page = parse_listing(&Html::parse_document(&body), &url, &self.set_name);
        self.next = page.next;
        Ok(Some(page.links))
    }
}
