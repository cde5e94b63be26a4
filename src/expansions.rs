use crate::api::{Catalog, Fetcher};
use crate::card::CardSet;
use crate::error::Error;
use lazy_static::lazy_static;
use log::{debug, info};
use scraper::{Html, Selector};

lazy_static! {
    static ref SET_OPTION: Selector =
        Selector::parse("select#ctl00_ctl00_MainContent_Content_SearchControls_setAddText option")
            .unwrap();
}

/// Resolves the sets to process: the explicit names when any were given,
/// otherwise every set offered by the catalog's search form.
pub async fn resolve<F: Fetcher>(
    fetcher: &F,
    catalog: &Catalog,
    explicit_names: &[String],
) -> Result<Vec<CardSet>, Error> {
    if !explicit_names.is_empty() {
        return Ok(from_names(explicit_names.iter().map(String::as_str)));
    }

    let url = catalog.landing_page()?;
    info!("Discovering sets from {}", url);
    let body = fetcher
        .fetch(&url)
        .await
        .map_err(|source| Error::Discovery {
            url: url.to_string(),
            source,
        })?;

    let names = set_names(&Html::parse_document(&body));
    debug!("Landing page offered {} set options", names.len());
    Ok(from_names(names.iter().map(String::as_str)))
}

pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<CardSet> {
    names.into_iter().filter_map(CardSet::new).collect()
}

fn set_names(document: &Html) -> Vec<String> {
    document
        .select(&SET_OPTION)
        .filter_map(|option| option.value().attr("value"))
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().to_string())
        .collect()
}
